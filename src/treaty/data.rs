//! Treaty tables consumed by the net retention calculator

/// Facultative code meaning "no layer applies"; never resolves to a layer
pub const NO_FACULTATIVE_CODE: i64 = 99_999;

/// Lower tier bound marking an obligatory treaty as not configured
pub const UNCONFIGURED_BOUND: f64 = -1.0;

/// Raw pair stored for one facultative row
///
/// For quota-share rows `retention` is the retained share and `capacity`
/// the absolute retention cap; for excess-of-loss rows they are the
/// retention limit and the layer capacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerTerms {
    pub retention: f64,
    pub capacity: f64,
}

/// One resolved facultative layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FacultativeLayer {
    /// Proportional cession with a retention floor
    QuotaShare { retained_share: f64, retention: f64 },
    /// Cession of the band between `limit` and `limit + capacity`
    ExcessOfLoss { limit: f64, capacity: f64 },
}

impl FacultativeLayer {
    /// Amount retained after this layer
    #[inline]
    pub fn retained(&self, sum_insured: f64) -> f64 {
        match *self {
            FacultativeLayer::QuotaShare { retained_share, retention } => {
                let rest = (1.0 - retained_share) * sum_insured - retention;
                sum_insured * retained_share + if rest > 0.0 { rest } else { 0.0 }
            }
            FacultativeLayer::ExcessOfLoss { limit, capacity } => {
                let below = if sum_insured < limit { sum_insured } else { limit };
                let above = sum_insured - limit - capacity;
                below + if above > 0.0 { above } else { 0.0 }
            }
        }
    }
}

/// Facultative layers indexed by facultative code
///
/// Terms are kept in source row order. Whether index `i` is quota-share is
/// decided by the companion flag table, which is keyed by the row ids the
/// loader recorded for rows without a retention amount.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacultativeTable {
    terms: Vec<LayerTerms>,
    quota_share: Vec<bool>,
}

impl FacultativeTable {
    /// Build the table, flagging every in-range id in `quota_share_ids`
    pub fn new(terms: Vec<LayerTerms>, quota_share_ids: &[i64]) -> Self {
        let mut quota_share = vec![false; terms.len()];
        for &id in quota_share_ids {
            if let Ok(index) = usize::try_from(id) {
                if let Some(flag) = quota_share.get_mut(index) {
                    *flag = true;
                }
            }
        }
        Self { terms, quota_share }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn is_quota_share(&self, index: usize) -> bool {
        self.quota_share.get(index).copied().unwrap_or(false)
    }

    /// Layer for `code`, or `None` if no facultative layer applies
    #[inline]
    pub fn layer(&self, code: i64) -> Option<FacultativeLayer> {
        if code == NO_FACULTATIVE_CODE {
            return None;
        }
        let index = usize::try_from(code).ok()?;
        let terms = self.terms.get(index)?;

        Some(if self.is_quota_share(index) {
            FacultativeLayer::QuotaShare {
                retained_share: terms.retention,
                retention: terms.capacity,
            }
        } else {
            FacultativeLayer::ExcessOfLoss {
                limit: terms.retention,
                capacity: terms.capacity,
            }
        })
    }
}

/// Two-tier surplus treaty for one basis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurplusTreaty {
    /// First retention breakpoint (p1); negative means not configured
    pub lower: f64,
    /// Second retention breakpoint (p2)
    pub upper: f64,
    /// Share applied to p1 when the amount falls between the tiers
    pub tier2_share: f64,
    /// Share applied to amounts at or below p1
    pub tier1_share: f64,
}

impl Default for SurplusTreaty {
    fn default() -> Self {
        Self {
            lower: UNCONFIGURED_BOUND,
            upper: UNCONFIGURED_BOUND,
            tier2_share: 0.0,
            tier1_share: 0.0,
        }
    }
}

impl SurplusTreaty {
    pub fn is_configured(&self) -> bool {
        self.lower >= 0.0
    }

    /// Amount retained under the surplus tiers
    #[inline]
    pub fn retained(&self, amount: f64) -> f64 {
        if amount <= self.lower {
            self.tier1_share * amount
        } else if amount <= self.upper {
            self.tier2_share * self.lower
        } else {
            amount - (self.upper - self.lower)
        }
    }
}

/// Portfolio-wide obligatory treaty
///
/// Only the risk basis feeds the calculation; the event basis is loaded so
/// it is available for inspection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ObligatoryTreaty {
    pub risk: SurplusTreaty,
    pub event: SurplusTreaty,
}

/// All treaty data for a run, frozen once loaded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreatyTables {
    pub facultative: FacultativeTable,
    pub obligatory: ObligatoryTreaty,
}
