//! Net retention per exposure under the facultative and obligatory treaties

use rayon::prelude::*;

use crate::exposure::ExposureColumns;
use crate::treaty::TreatyTables;

/// Applies frozen treaty tables to exposures
///
/// Holds only a shared borrow of the tables, so one calculator can be used
/// from many threads at once.
#[derive(Debug, Clone, Copy)]
pub struct NetRetentionCalculator<'a> {
    tables: &'a TreatyTables,
}

impl<'a> NetRetentionCalculator<'a> {
    pub fn new(tables: &'a TreatyTables) -> Self {
        Self { tables }
    }

    /// Amount retained after the facultative layer for `facultative_code`
    ///
    /// Codes that resolve to no layer pass the sum insured through.
    #[inline]
    pub fn facultative_retained(&self, sum_insured: f64, facultative_code: i64) -> f64 {
        match self.tables.facultative.layer(facultative_code) {
            Some(layer) => layer.retained(sum_insured),
            None => sum_insured,
        }
    }

    /// Amount retained after the facultative layer and the risk-basis surplus treaty
    #[inline]
    pub fn net_retained(&self, sum_insured: f64, facultative_code: i64) -> f64 {
        let facultative = self.facultative_retained(sum_insured, facultative_code);
        let surplus = &self.tables.obligatory.risk;
        if surplus.is_configured() {
            surplus.retained(facultative)
        } else {
            facultative
        }
    }

    /// Net retention for every exposure, in input order
    pub fn net_retained_all(&self, exposures: &ExposureColumns) -> Vec<f64> {
        exposures
            .sum_insured
            .iter()
            .zip(&exposures.facultative_code)
            .map(|(&sum_insured, &code)| self.net_retained(sum_insured, code))
            .collect()
    }

    /// Parallel [`net_retained_all`](Self::net_retained_all); output order matches input
    pub fn par_net_retained_all(&self, exposures: &ExposureColumns) -> Vec<f64> {
        exposures
            .sum_insured
            .par_iter()
            .zip(exposures.facultative_code.par_iter())
            .map(|(&sum_insured, &code)| self.net_retained(sum_insured, code))
            .collect()
    }
}
