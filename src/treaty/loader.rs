//! Load facultative layers and the obligatory treaty from `;`-delimited files
//!
//! Both files use comma decimals and a header row. The facultative and
//! obligatory data may live in the same file, read twice with different
//! column maps.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use log::{debug, info, warn};

use super::columns::{facultative, obligatory};
use super::{FacultativeTable, LayerTerms, ObligatoryTreaty, SurplusTreaty, TreatyTables};
use crate::error::{read_error, Error, Result};
use crate::parse::{DataLines, Fields, NumericMode, ParseNumberError};
use crate::progress::ProgressObserver;

/// One facultative data row
#[derive(Debug, Clone, Copy, PartialEq)]
struct FacultativeRow {
    row_id: i64,
    retention_amount: Option<f64>,
    retention_percentage: Option<f64>,
    capacity: f64,
}

impl FacultativeRow {
    fn from_fields(fields: &Fields<'_>, mode: NumericMode) -> std::result::Result<Self, ParseNumberError> {
        let field = |index| fields.get(index).unwrap_or_default();

        // Row ids may be written with a decimal part; they are truncated
        let row_id = mode.parse_f64(field(facultative::ROW_ID))? as i64;

        Ok(Self {
            row_id,
            retention_amount: optional_number(fields, facultative::RETENTION_AMOUNT, mode)?,
            retention_percentage: optional_number(fields, facultative::RETENTION_PERCENTAGE, mode)?,
            capacity: mode.parse_f64(field(facultative::CAPACITY))?,
        })
    }
}

/// Load the facultative layer table from a file
pub fn load_facultative<P: AsRef<Path>>(
    path: P,
    mode: NumericMode,
    progress: &mut dyn ProgressObserver,
) -> Result<FacultativeTable> {
    let path = path.as_ref();
    let reader = open(path)?;
    let table = read_facultative(reader, mode, progress).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded {} facultative layers from {}", table.len(), path.display());
    Ok(table)
}

/// Load the facultative layer table from any reader
pub fn load_facultative_from_reader<R: Read>(
    reader: R,
    mode: NumericMode,
    progress: &mut dyn ProgressObserver,
) -> Result<FacultativeTable> {
    read_facultative(BufReader::new(reader), mode, progress).map_err(read_error)
}

/// Load the obligatory treaty from a file
pub fn load_obligatory<P: AsRef<Path>>(
    path: P,
    mode: NumericMode,
    progress: &mut dyn ProgressObserver,
) -> Result<ObligatoryTreaty> {
    let path = path.as_ref();
    let reader = open(path)?;
    let treaty = read_obligatory(reader, mode, progress).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        "Loaded obligatory treaty from {} (risk basis configured: {})",
        path.display(),
        treaty.risk.is_configured()
    );
    Ok(treaty)
}

/// Load the obligatory treaty from any reader
pub fn load_obligatory_from_reader<R: Read>(
    reader: R,
    mode: NumericMode,
    progress: &mut dyn ProgressObserver,
) -> Result<ObligatoryTreaty> {
    read_obligatory(BufReader::new(reader), mode, progress).map_err(read_error)
}

impl TreatyTables {
    /// Load both treaty tables; the two paths may name the same file
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        facultative_path: P,
        obligatory_path: Q,
        mode: NumericMode,
        progress: &mut dyn ProgressObserver,
    ) -> Result<Self> {
        Ok(Self {
            facultative: load_facultative(facultative_path, mode, progress)?,
            obligatory: load_obligatory(obligatory_path, mode, progress)?,
        })
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path).map(BufReader::new).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn read_facultative<R: BufRead>(
    reader: R,
    mode: NumericMode,
    progress: &mut dyn ProgressObserver,
) -> io::Result<FacultativeTable> {
    let mut rows = DataLines::new(reader, facultative::FIELDS)?;
    let mut terms = Vec::new();
    let mut quota_share_ids = Vec::new();
    let mut skipped = 0usize;

    while let Some(fields) = rows.next_row()? {
        progress.advance();

        if fields.len() < facultative::FIELDS || fields.is_blank(facultative::ROW_ID) {
            skipped += 1;
            continue;
        }
        let row = match FacultativeRow::from_fields(&fields, mode) {
            Ok(row) => row,
            Err(err) => {
                debug!("Skipping facultative row: {}", err);
                skipped += 1;
                continue;
            }
        };

        match row.retention_amount {
            None => {
                terms.push(LayerTerms {
                    retention: row.retention_percentage.unwrap_or(0.0),
                    capacity: row.capacity,
                });
                quota_share_ids.push(row.row_id);
            }
            Some(amount) => terms.push(LayerTerms {
                retention: amount,
                capacity: row.capacity,
            }),
        }
    }

    if skipped > 0 {
        debug!("Skipped {} facultative rows", skipped);
    }
    Ok(FacultativeTable::new(terms, &quota_share_ids))
}

fn read_obligatory<R: BufRead>(
    reader: R,
    mode: NumericMode,
    progress: &mut dyn ProgressObserver,
) -> io::Result<ObligatoryTreaty> {
    let mut rows = DataLines::new(reader, obligatory::FIELDS)?;
    let mut treaty = ObligatoryTreaty::default();

    // First row: tier-1 shares only
    if let Some(fields) = rows.next_row()? {
        progress.advance();
        for (basis, columns) in [
            (&mut treaty.risk, obligatory::RISK),
            (&mut treaty.event, obligatory::EVENT),
        ] {
            match optional_number(&fields, columns.share, mode) {
                Ok(share) => basis.tier1_share = share.unwrap_or(0.0),
                Err(err) => warn!("Ignoring obligatory tier-1 share: {}", err),
            }
        }
    }

    // Second row: tier bounds and tier-2 shares
    if let Some(fields) = rows.next_row()? {
        progress.advance();
        for (basis, columns) in [
            (&mut treaty.risk, obligatory::RISK),
            (&mut treaty.event, obligatory::EVENT),
        ] {
            match read_tiers(&fields, columns, mode) {
                Ok(tiers) => apply_tiers(basis, tiers),
                Err(err) => warn!("Ignoring obligatory tier bounds: {}", err),
            }
        }
    }

    Ok(treaty)
}

/// Tier bounds and tier-2 share of one basis; `None` when the lower bound is blank
type Tiers = Option<(f64, f64, f64)>;

fn read_tiers(
    fields: &Fields<'_>,
    columns: obligatory::BasisColumns,
    mode: NumericMode,
) -> std::result::Result<Tiers, ParseNumberError> {
    let Some(lower) = optional_number(fields, columns.tier_lower, mode)? else {
        return Ok(None);
    };
    let upper = optional_number(fields, columns.tier_upper, mode)?.unwrap_or(0.0);
    let share = optional_number(fields, columns.share, mode)?.unwrap_or(0.0);
    Ok(Some((lower, upper, share)))
}

fn apply_tiers(basis: &mut SurplusTreaty, tiers: Tiers) {
    if let Some((lower, upper, share)) = tiers {
        basis.lower = lower;
        basis.upper = upper;
        basis.tier2_share = share;
    }
}

fn optional_number(
    fields: &Fields<'_>,
    index: usize,
    mode: NumericMode,
) -> std::result::Result<Option<f64>, ParseNumberError> {
    match fields.get(index) {
        Some(bytes) if !bytes.is_empty() => mode.parse_f64(bytes).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{NoProgress, ProgressCounter};
    use crate::treaty::{FacultativeLayer, UNCONFIGURED_BOUND};
    use approx::assert_relative_eq;

    const TREATY_FILE: &str = "\
Lp;Kwota;Procent;Pojemnosc;;DolnaR;GornaR;UdzialR;;DolnaZ;GornaZ;UdzialZ
0;;0,3;1000;;;;1,0;;;;0,9
1;5000;;2000;;10000;50000;0,8;;20000;80000;0,7
2;;0,5;0;;;;;;;;
3;7500,5;;2500;;;;;;;;
";

    fn assert_quota_share(layer: Option<FacultativeLayer>, share: f64, cap: f64) {
        match layer {
            Some(FacultativeLayer::QuotaShare { retained_share, retention }) => {
                assert_relative_eq!(retained_share, share, epsilon = 1e-12);
                assert_relative_eq!(retention, cap, epsilon = 1e-12);
            }
            other => panic!("expected quota-share layer, got {:?}", other),
        }
    }

    fn assert_excess_of_loss(layer: Option<FacultativeLayer>, expected_limit: f64, expected_capacity: f64) {
        match layer {
            Some(FacultativeLayer::ExcessOfLoss { limit, capacity }) => {
                assert_relative_eq!(limit, expected_limit, epsilon = 1e-12);
                assert_relative_eq!(capacity, expected_capacity, epsilon = 1e-12);
            }
            other => panic!("expected excess-of-loss layer, got {:?}", other),
        }
    }

    #[test]
    fn test_facultative_classification() {
        let table = load_facultative_from_reader(TREATY_FILE.as_bytes(), NumericMode::Lenient, &mut NoProgress).unwrap();

        assert_eq!(table.len(), 4);
        assert_quota_share(table.layer(0), 0.3, 1000.0);
        assert_excess_of_loss(table.layer(1), 5000.0, 2000.0);
        assert_quota_share(table.layer(2), 0.5, 0.0);
        assert_excess_of_loss(table.layer(3), 7500.5, 2500.0);
        assert!(table.layer(4).is_none());
    }

    #[test]
    fn test_facultative_flags_use_row_ids() {
        // The quota-share row with id 5 lies outside the 2-entry table, so no
        // flag is set and position 1 resolves as excess-of-loss
        let input = "h\n0;100;;10\n5;;0,4;10\n";
        let table = load_facultative_from_reader(input.as_bytes(), NumericMode::Lenient, &mut NoProgress).unwrap();

        assert_eq!(table.len(), 2);
        assert!(!table.is_quota_share(0));
        assert!(!table.is_quota_share(1));
        assert_excess_of_loss(table.layer(1), 0.4, 10.0);
    }

    #[test]
    fn test_facultative_skips_short_rows() {
        let input = "h\n0;;0,3;1000\n1;2\n;;;\n2;;0,2;10\n";
        let mut progress = ProgressCounter::new(1.0);
        let table = load_facultative_from_reader(input.as_bytes(), NumericMode::Lenient, &mut progress).unwrap();

        assert_eq!(table.len(), 2);
        // Every data row advances progress, including skipped ones
        assert_relative_eq!(progress.value(), 4.0);
    }

    #[test]
    fn test_facultative_strict_mode_skips_bad_rows() {
        let input = "h\n0;;0,3;1000\n1;;0,3x;1000\n2;400;;100\n";
        let strict = load_facultative_from_reader(input.as_bytes(), NumericMode::Strict, &mut NoProgress).unwrap();
        assert_eq!(strict.len(), 2);
        assert_excess_of_loss(strict.layer(1), 400.0, 100.0);

        let lenient = load_facultative_from_reader(input.as_bytes(), NumericMode::Lenient, &mut NoProgress).unwrap();
        assert_eq!(lenient.len(), 3);
    }

    #[test]
    fn test_obligatory_two_rows() {
        let mut progress = ProgressCounter::new(0.5);
        let treaty = load_obligatory_from_reader(TREATY_FILE.as_bytes(), NumericMode::Lenient, &mut progress).unwrap();

        assert_eq!(treaty.risk.lower, 10000.0);
        assert_eq!(treaty.risk.upper, 50000.0);
        assert_relative_eq!(treaty.risk.tier2_share, 0.8, epsilon = 1e-12);
        assert_relative_eq!(treaty.risk.tier1_share, 1.0, epsilon = 1e-12);

        assert_eq!(treaty.event.lower, 20000.0);
        assert_eq!(treaty.event.upper, 80000.0);
        assert_relative_eq!(treaty.event.tier2_share, 0.7, epsilon = 1e-12);
        assert_relative_eq!(treaty.event.tier1_share, 0.9, epsilon = 1e-12);

        // Only two rows are consumed
        assert_relative_eq!(progress.value(), 1.0);
    }

    #[test]
    fn test_obligatory_missing_rows_stay_unconfigured() {
        let treaty = load_obligatory_from_reader("h\n".as_bytes(), NumericMode::Lenient, &mut NoProgress).unwrap();
        assert!(!treaty.risk.is_configured());
        assert!(!treaty.event.is_configured());

        let one_row = "h\n0;;0,3;1000;;;;0,5\n";
        let treaty = load_obligatory_from_reader(one_row.as_bytes(), NumericMode::Lenient, &mut NoProgress).unwrap();
        assert!(!treaty.risk.is_configured());
        assert_eq!(treaty.risk.tier1_share, 0.5);
    }

    #[test]
    fn test_obligatory_blank_lower_bound_is_unconfigured() {
        let input = "h\n;;;;;;;1\n;;;;;;40000;0,5\n";
        let treaty = load_obligatory_from_reader(input.as_bytes(), NumericMode::Lenient, &mut NoProgress).unwrap();
        assert!(!treaty.risk.is_configured());
        assert_eq!(treaty.risk.tier1_share, 1.0);
    }

    #[test]
    fn test_obligatory_strict_mode_drops_only_bad_basis() {
        let input = "h\n;;;;;;;1;;;;0,9\n;;;;;10x00;50000;0,8;;20000;80000;0,7\n";
        let treaty = load_obligatory_from_reader(input.as_bytes(), NumericMode::Strict, &mut NoProgress).unwrap();

        assert!(!treaty.risk.is_configured());
        assert_eq!(treaty.risk.upper, UNCONFIGURED_BOUND);
        assert_eq!(treaty.risk.tier1_share, 1.0);

        assert_eq!(treaty.event.lower, 20000.0);
        assert_eq!(treaty.event.upper, 80000.0);
        assert_relative_eq!(treaty.event.tier2_share, 0.7, epsilon = 1e-12);
        assert_relative_eq!(treaty.event.tier1_share, 0.9, epsilon = 1e-12);

        // Lenient mode truncates the same field instead
        let lenient = load_obligatory_from_reader(input.as_bytes(), NumericMode::Lenient, &mut NoProgress).unwrap();
        assert_eq!(lenient.risk.lower, 10.0);
    }

    #[test]
    fn test_obligatory_ignores_later_rows() {
        let input = "h\n;;;;;;;1\n;;;;;100;200;0,5\n;;;;;999;9999;0,1\n";
        let treaty = load_obligatory_from_reader(input.as_bytes(), NumericMode::Lenient, &mut NoProgress).unwrap();
        assert_eq!(treaty.risk.lower, 100.0);
        assert_eq!(treaty.risk.upper, 200.0);
        assert_eq!(treaty.risk.tier2_share, 0.5);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = load_facultative("does/not/exist.csv", NumericMode::Lenient, &mut NoProgress).unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
        assert!(err.to_string().contains("does/not/exist.csv"));

        let err = load_obligatory("does/not/exist.csv", NumericMode::Lenient, &mut NoProgress).unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
    }
}
