//! Fixed column maps of the treaty files (0-indexed, `;`-delimited)

/// Facultative layer rows
pub mod facultative {
    pub const ROW_ID: usize = 0;
    /// Blank for quota-share layers
    pub const RETENTION_AMOUNT: usize = 1;
    pub const RETENTION_PERCENTAGE: usize = 2;
    pub const CAPACITY: usize = 3;

    /// Fields read per row; also the minimum a usable row must have
    pub const FIELDS: usize = 4;
}

/// Obligatory surplus rows
pub mod obligatory {
    /// Column triple describing one treaty basis
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BasisColumns {
        pub tier_lower: usize,
        pub tier_upper: usize,
        pub share: usize,
    }

    pub const RISK: BasisColumns = BasisColumns {
        tier_lower: 5,
        tier_upper: 6,
        share: 7,
    };

    pub const EVENT: BasisColumns = BasisColumns {
        tier_lower: 9,
        tier_upper: 10,
        share: 11,
    };

    /// Fields read per row
    pub const FIELDS: usize = 12;

    /// Data rows consumed after the header; the rest of the file is ignored
    pub const MAX_ROWS: usize = 2;
}
