//! Exposure records in row and columnar form

use crate::treaty::NO_FACULTATIVE_CODE;

/// Fixed column map of the exposure file (0-indexed, `;`-delimited)
pub mod columns {
    pub const START_DATE: usize = 0;
    pub const END_DATE: usize = 1;
    pub const SUM_INSURED: usize = 2;
    pub const RENEWED: usize = 3;
    pub const COUNTRY: usize = 4;
    pub const FACULTATIVE_CODE: usize = 5;
    pub const LATITUDE: usize = 6;
    pub const LONGITUDE: usize = 7;
    pub const REGION_CODE: usize = 8;
    pub const ADDRESS_ID: usize = 9;

    /// Fields read per row; anything after the address id is never scanned
    pub const FIELDS: usize = ADDRESS_ID + 1;

    /// Rows with fewer fields are skipped
    pub const MIN_FIELDS: usize = 9;
}

/// Facultative code assigned to blank codes in bulk columnar loads
///
/// Streaming loads use `0` instead; the two defaults are kept apart on
/// purpose until the intended behaviour is confirmed.
pub const EMPTY_CODE_SENTINEL: i64 = NO_FACULTATIVE_CODE;

/// Facultative code assigned to blank codes in streaming loads
pub const STREAMING_EMPTY_CODE: i64 = 0;

/// A single insured fire risk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exposure {
    /// Gross sum insured before any cession
    pub sum_insured: f64,

    /// Index into the facultative layer table
    pub facultative_code: i64,

    pub latitude: f64,
    pub longitude: f64,

    /// Region (voivodeship) code
    pub region_code: i64,

    /// Address identifier, `0` when the column is absent
    pub address_id: i64,
}

/// Exposure portfolio stored column by column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExposureColumns {
    pub sum_insured: Vec<f64>,
    pub facultative_code: Vec<i64>,
    pub latitude: Vec<f64>,
    pub longitude: Vec<f64>,
    pub region_code: Vec<i64>,
    pub address_id: Vec<i64>,
}

impl ExposureColumns {
    /// Pre-size every column for `rows` exposures
    pub fn with_capacity(rows: usize) -> Self {
        Self {
            sum_insured: Vec::with_capacity(rows),
            facultative_code: Vec::with_capacity(rows),
            latitude: Vec::with_capacity(rows),
            longitude: Vec::with_capacity(rows),
            region_code: Vec::with_capacity(rows),
            address_id: Vec::with_capacity(rows),
        }
    }

    pub fn push(&mut self, exposure: &Exposure) {
        self.sum_insured.push(exposure.sum_insured);
        self.facultative_code.push(exposure.facultative_code);
        self.latitude.push(exposure.latitude);
        self.longitude.push(exposure.longitude);
        self.region_code.push(exposure.region_code);
        self.address_id.push(exposure.address_id);
    }

    pub fn len(&self) -> usize {
        self.sum_insured.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sum_insured.is_empty()
    }

    /// Exposure at `index`, or `None` if any column is shorter than that
    pub fn get(&self, index: usize) -> Option<Exposure> {
        Some(Exposure {
            sum_insured: *self.sum_insured.get(index)?,
            facultative_code: *self.facultative_code.get(index)?,
            latitude: *self.latitude.get(index)?,
            longitude: *self.longitude.get(index)?,
            region_code: *self.region_code.get(index)?,
            address_id: *self.address_id.get(index)?,
        })
    }

    /// Exposures in input order
    pub fn iter(&self) -> impl Iterator<Item = Exposure> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    pub fn total_sum_insured(&self) -> f64 {
        self.sum_insured.iter().sum()
    }
}

impl FromIterator<Exposure> for ExposureColumns {
    fn from_iter<I: IntoIterator<Item = Exposure>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut columns = Self::with_capacity(iter.size_hint().0);
        for exposure in iter {
            columns.push(&exposure);
        }
        columns
    }
}
