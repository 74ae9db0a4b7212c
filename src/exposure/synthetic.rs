//! Deterministic synthetic portfolios for throughput runs
//!
//! Row `i` has a sum insured of 100 000 + (i mod 50 000), facultative code
//! i mod 5, coordinates stepping through a small grid near (50, 19), and
//! region and address codes i mod 11.

use std::io::{self, Write};

use super::data::{Exposure, ExposureColumns};

/// Header written by [`write_portfolio`], matching the exposure input layout
pub const PORTFOLIO_HEADER: &str =
    "DataPoczatku;DataKonca;SumaUbezpieczenia;Odnowione;Kraj;ReasekuracjaF;Szerokosc;Dlugosc;WojUjednolicone;AdresLosowy";

/// The `index`-th synthetic exposure
pub fn synthetic_exposure(index: usize) -> Exposure {
    let grid = (index % 1000) as f64 * 0.0001;
    Exposure {
        sum_insured: 100_000.0 + (index % 50_000) as f64,
        facultative_code: (index % 5) as i64,
        latitude: 50.0 + grid,
        longitude: 19.0 + grid,
        region_code: (index % 11) as i64,
        address_id: (index % 11) as i64,
    }
}

/// A synthetic portfolio of `rows` exposures
pub fn synthetic_portfolio(rows: usize) -> ExposureColumns {
    (0..rows).map(synthetic_exposure).collect()
}

/// Write a synthetic portfolio in the exposure file format (comma decimals)
pub fn write_portfolio<W: Write>(mut out: W, rows: usize) -> io::Result<()> {
    writeln!(out, "{}", PORTFOLIO_HEADER)?;
    for index in 0..rows {
        let exposure = synthetic_exposure(index);
        writeln!(
            out,
            "2025-01-01;2025-12-31;{};0;PL;{};{};{};{};{}",
            comma_decimal(exposure.sum_insured, 2),
            exposure.facultative_code,
            comma_decimal(exposure.latitude, 6),
            comma_decimal(exposure.longitude, 6),
            exposure.region_code,
            exposure.address_id,
        )?;
    }
    out.flush()
}

fn comma_decimal(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value).replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposure::load_exposure_columns_from_reader;
    use crate::parse::NumericMode;
    use approx::assert_relative_eq;

    #[test]
    fn test_synthetic_rows() {
        let portfolio = synthetic_portfolio(50_003);
        assert_eq!(portfolio.len(), 50_003);
        assert_eq!(portfolio.sum_insured[0], 100_000.0);
        assert_eq!(portfolio.sum_insured[50_001], 100_001.0);
        assert_eq!(portfolio.facultative_code[7], 2);
        assert_eq!(portfolio.region_code[12], 1);
        assert_relative_eq!(portfolio.latitude[1001], 50.0001, epsilon = 1e-12);
    }

    #[test]
    fn test_written_portfolio_loads_back() {
        let mut buffer = Vec::new();
        write_portfolio(&mut buffer, 25).unwrap();

        let loaded = load_exposure_columns_from_reader(&buffer[..], NumericMode::Strict, 25).unwrap();
        let expected = synthetic_portfolio(25);
        assert_eq!(loaded.len(), 25);
        assert_eq!(loaded.facultative_code, expected.facultative_code);
        assert_eq!(loaded.address_id, expected.address_id);
        for (got, want) in loaded.latitude.iter().zip(&expected.latitude) {
            assert_relative_eq!(*got, *want, epsilon = 1e-9);
        }
        for (got, want) in loaded.sum_insured.iter().zip(&expected.sum_insured) {
            assert_relative_eq!(*got, *want, epsilon = 1e-9);
        }
    }
}
