//! Result file writer
//!
//! One `;`-delimited row per exposure, in input order, with the net retained
//! amount in the last column.

use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::error::{Error, Result};
use crate::exposure::ExposureColumns;

pub const RESULT_HEADER: [&str; 7] = ["SU", "F", "lat", "lon", "woj", "adres", "SU_Netto"];

/// Write results to `path`
pub fn write_results<P: AsRef<Path>>(path: P, exposures: &ExposureColumns, net_retained: &[f64]) -> Result<()> {
    let path = path.as_ref();
    let to_error = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = WriterBuilder::new().delimiter(b';').from_path(path).map_err(to_error)?;
    write_rows(&mut writer, exposures, net_retained).map_err(to_error)
}

/// Write results to any writer
pub fn write_results_to<W: Write>(out: W, exposures: &ExposureColumns, net_retained: &[f64]) -> csv::Result<()> {
    let mut writer = WriterBuilder::new().delimiter(b';').from_writer(out);
    write_rows(&mut writer, exposures, net_retained)
}

fn write_rows<W: Write>(
    writer: &mut csv::Writer<W>,
    exposures: &ExposureColumns,
    net_retained: &[f64],
) -> csv::Result<()> {
    debug_assert_eq!(exposures.len(), net_retained.len());

    writer.write_record(RESULT_HEADER)?;
    for (exposure, net) in exposures.iter().zip(net_retained) {
        writer.write_record([
            exposure.sum_insured.to_string(),
            exposure.facultative_code.to_string(),
            exposure.latitude.to_string(),
            exposure.longitude.to_string(),
            exposure.region_code.to_string(),
            exposure.address_id.to_string(),
            net.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
