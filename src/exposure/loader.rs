//! Load exposure portfolios from `;`-delimited, comma-decimal files
//!
//! Two modes share one row parser:
//! - streaming: a handler is called per parsed row, nothing is retained
//! - bulk: rows are collected into pre-sized [`ExposureColumns`]
//!
//! Rows with too few fields, or that fail strict numeric parsing, are
//! skipped silently. Streaming also skips rows whose sum insured,
//! coordinates or region hold no digits at all, even in lenient mode.
//! Only a file that cannot be opened is fatal.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use log::{debug, info};

use super::data::{columns, Exposure, ExposureColumns, EMPTY_CODE_SENTINEL, STREAMING_EMPTY_CODE};
use crate::error::{read_error, Error, Result};
use crate::parse::{DataLines, Fields, NumericMode, ParseNumberError};

/// Reader buffer size; exposure files run to millions of rows
const READ_BUFFER_BYTES: usize = 1 << 20;

/// Row counts from one load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Non-empty data rows seen after the header
    pub rows_read: usize,
    /// Rows dropped for too few fields or unparseable numbers
    pub rows_skipped: usize,
}

impl LoadStats {
    pub fn rows_loaded(&self) -> usize {
        self.rows_read - self.rows_skipped
    }
}

/// How one ingestion mode treats blank or digit-free fields
#[derive(Debug, Clone, Copy)]
struct RowRules {
    /// Facultative code for a blank code field
    empty_code: i64,
    /// Reject rows whose required numeric fields hold no digits
    require_digits: bool,
}

const STREAMING_RULES: RowRules = RowRules {
    empty_code: STREAMING_EMPTY_CODE,
    require_digits: true,
};

const BULK_RULES: RowRules = RowRules {
    empty_code: EMPTY_CODE_SENTINEL,
    require_digits: false,
};

impl Exposure {
    /// Parse one split row under `rules`
    fn from_fields(
        fields: &Fields<'_>,
        mode: NumericMode,
        rules: RowRules,
    ) -> std::result::Result<Self, ParseNumberError> {
        let field = |index| fields.get(index).unwrap_or_default();
        let required_f64 = |index| {
            if rules.require_digits {
                mode.parse_f64_required(field(index))
            } else {
                mode.parse_f64(field(index))
            }
        };

        let facultative_code = if fields.is_blank(columns::FACULTATIVE_CODE) {
            rules.empty_code
        } else {
            mode.parse_i64(field(columns::FACULTATIVE_CODE))?
        };
        let address_id = if fields.is_blank(columns::ADDRESS_ID) {
            0
        } else {
            mode.parse_i64(field(columns::ADDRESS_ID))?
        };

        let region_code = if rules.require_digits {
            mode.parse_i64_required(field(columns::REGION_CODE))?
        } else {
            mode.parse_i64(field(columns::REGION_CODE))?
        };

        Ok(Self {
            sum_insured: required_f64(columns::SUM_INSURED)?,
            facultative_code,
            latitude: required_f64(columns::LATITUDE)?,
            longitude: required_f64(columns::LONGITUDE)?,
            region_code,
            address_id,
        })
    }
}

/// Stream exposures from a file into `handler`
pub fn for_each_exposure<P, F>(path: P, mode: NumericMode, handler: F) -> Result<LoadStats>
where
    P: AsRef<Path>,
    F: FnMut(&Exposure),
{
    let path = path.as_ref();
    let reader = open(path)?;
    let stats = read_rows(reader, mode, STREAMING_RULES, handler).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        "Streamed {} exposures from {} ({} rows skipped)",
        stats.rows_loaded(),
        path.display(),
        stats.rows_skipped
    );
    Ok(stats)
}

/// Stream exposures from any reader into `handler`
pub fn for_each_exposure_from_reader<R, F>(reader: R, mode: NumericMode, handler: F) -> Result<LoadStats>
where
    R: Read,
    F: FnMut(&Exposure),
{
    read_rows(BufReader::new(reader), mode, STREAMING_RULES, handler).map_err(read_error)
}

/// Load a whole exposure file into columns sized for `expected_rows`
pub fn load_exposure_columns<P: AsRef<Path>>(
    path: P,
    mode: NumericMode,
    expected_rows: usize,
) -> Result<ExposureColumns> {
    let path = path.as_ref();
    let reader = open(path)?;
    let (columns, stats) = read_columns(reader, mode, expected_rows).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded {} exposures from {}", columns.len(), path.display());
    debug!("{} exposure rows skipped", stats.rows_skipped);
    Ok(columns)
}

/// Load exposures from any reader into columns sized for `expected_rows`
pub fn load_exposure_columns_from_reader<R: Read>(
    reader: R,
    mode: NumericMode,
    expected_rows: usize,
) -> Result<ExposureColumns> {
    read_columns(BufReader::new(reader), mode, expected_rows)
        .map(|(columns, _)| columns)
        .map_err(read_error)
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(|file| BufReader::with_capacity(READ_BUFFER_BYTES, file))
        .map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })
}

fn read_columns<R: BufRead>(
    reader: R,
    mode: NumericMode,
    expected_rows: usize,
) -> io::Result<(ExposureColumns, LoadStats)> {
    let mut columns = ExposureColumns::with_capacity(expected_rows);
    let stats = read_rows(reader, mode, BULK_RULES, |exposure| columns.push(exposure))?;
    Ok((columns, stats))
}

fn read_rows<R, F>(reader: R, mode: NumericMode, rules: RowRules, mut handler: F) -> io::Result<LoadStats>
where
    R: BufRead,
    F: FnMut(&Exposure),
{
    let mut rows = DataLines::new(reader, columns::FIELDS)?;
    let mut stats = LoadStats::default();

    while let Some(fields) = rows.next_row()? {
        stats.rows_read += 1;
        if fields.len() < columns::MIN_FIELDS {
            stats.rows_skipped += 1;
            continue;
        }
        match Exposure::from_fields(&fields, mode, rules) {
            Ok(exposure) => handler(&exposure),
            Err(_) => stats.rows_skipped += 1,
        }
    }

    Ok(stats)
}
