//! Batch driver: load treaties, load exposures, compute, write

use std::time::{Duration, Instant};

use log::{debug, info};

use super::NetRetentionCalculator;
use crate::config::BatchConfig;
use crate::error::Result;
use crate::exposure::{load_exposure_columns, synthetic_portfolio, ExposureColumns};
use crate::output::write_results;
use crate::progress::ProgressObserver;
use crate::treaty::TreatyTables;

/// Everything a finished batch produced
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub tables: TreatyTables,
    pub exposures: ExposureColumns,
    /// Net retained amount per exposure, aligned with `exposures`
    pub net_retained: Vec<f64>,
    pub elapsed: Duration,
}

impl BatchOutcome {
    pub fn len(&self) -> usize {
        self.net_retained.len()
    }

    pub fn is_empty(&self) -> bool {
        self.net_retained.is_empty()
    }

    pub fn total_net_retained(&self) -> f64 {
        self.net_retained.iter().sum()
    }
}

/// Run one batch as described by `config`
pub fn run_batch(config: &BatchConfig, progress: &mut dyn ProgressObserver) -> Result<BatchOutcome> {
    let start = Instant::now();

    let tables = TreatyTables::load(
        &config.treaty_path,
        config.obligatory_path(),
        config.numeric_mode,
        progress,
    )?;
    debug!("Treaties loaded in {:?}", start.elapsed());

    let exposures = match config.generated_rows {
        Some(rows) => {
            info!("Generating {} synthetic exposures", rows);
            synthetic_portfolio(rows)
        }
        None => load_exposure_columns(&config.exposure_path, config.numeric_mode, config.expected_rows)?,
    };
    debug!("Exposures ready after {:?}", start.elapsed());

    let net_retained = compute(&tables, &exposures, config.parallel);
    let elapsed = start.elapsed();
    info!(
        "Computed net retention for {} exposures in {} ms ({:.3} s)",
        net_retained.len(),
        elapsed.as_millis(),
        elapsed.as_secs_f64()
    );

    if let Some(path) = &config.output_path {
        write_results(path, &exposures, &net_retained)?;
        info!("Results written to {}", path.display());
    }

    Ok(BatchOutcome {
        tables,
        exposures,
        net_retained,
        elapsed,
    })
}

/// Net retention for `exposures`, sequentially or across the rayon pool
pub fn compute(tables: &TreatyTables, exposures: &ExposureColumns, parallel: bool) -> Vec<f64> {
    let calculator = NetRetentionCalculator::new(tables);
    if parallel {
        calculator.par_net_retained_all(exposures)
    } else {
        calculator.net_retained_all(exposures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::progress::{NoProgress, ProgressCounter};
    use std::fs;
    use std::path::PathBuf;

    /// Per-test scratch directory under the system temp dir
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("fire_reinsurance_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const TREATY_FILE: &str = "\
Lp;Kwota;Procent;Pojemnosc;;DolnaR;GornaR;UdzialR;;DolnaZ;GornaZ;UdzialZ
0;;0,5;0;;;;1;;;;1
1;5000;;2000;;10000;50000;0,5;;;;
";

    const EXPOSURE_FILE: &str = "\
DataPoczatku;DataKonca;SumaUbezpieczenia;Odnowione;Kraj;ReasekuracjaF;Szerokosc;Dlugosc;WojUjednolicone;AdresLosowy
2024-01-01;2024-12-31;8000;1;PL;1;52,1;21,2;14;1
2024-01-01;2024-12-31;30000;1;PL;;52,1;21,2;14;2
2024-01-01;2024-12-31;100;1;PL
2024-01-01;2024-12-31;4000;1;PL;0;52,1;21,2;14;3
";

    #[test]
    fn test_run_batch_end_to_end() {
        let dir = scratch_dir("batch");
        let treaty_path = dir.join("treaty.csv");
        let exposure_path = dir.join("exposures.csv");
        let output_path = dir.join("out.csv");
        fs::write(&treaty_path, TREATY_FILE).unwrap();
        fs::write(&exposure_path, EXPOSURE_FILE).unwrap();

        let config = BatchConfig {
            treaty_path,
            exposure_path,
            output_path: Some(output_path.clone()),
            expected_rows: 4,
            ..BatchConfig::default()
        };
        let mut progress = ProgressCounter::new(1.0);
        let outcome = run_batch(&config, &mut progress).unwrap();

        // 2 facultative rows + 2 obligatory rows
        assert_eq!(progress.value(), 4.0);
        assert_eq!(outcome.len(), 3);
        // XoL leaves 6000; below p1 so tier-1 share 1.0 keeps it
        assert_eq!(outcome.net_retained[0], 6000.0);
        // No layer; 30000 between tiers: 0.5 * 10000
        assert_eq!(outcome.net_retained[1], 5000.0);
        // Quota-share 0.5 with no floor keeps 4000
        assert_eq!(outcome.net_retained[2], 4000.0);

        let written = fs::read_to_string(&output_path).unwrap();
        assert_eq!(written.lines().count(), 4);
        assert!(written.lines().nth(2).unwrap().ends_with(";5000"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_obligatory_treaty_from_separate_file() {
        let dir = scratch_dir("separate");
        let facultative_path = dir.join("facultative.csv");
        let obligatory_path = dir.join("obligatory.csv");
        let exposure_path = dir.join("exposures.csv");
        fs::write(&facultative_path, "Lp;Kwota;Procent;Pojemnosc\n0;;0,5;0\n1;5000;;2000\n").unwrap();
        fs::write(&obligatory_path, "h\n;;;;;;;1;;;;\n;;;;;10000;50000;0,5;;;;\n").unwrap();
        fs::write(&exposure_path, EXPOSURE_FILE).unwrap();

        let config = BatchConfig {
            treaty_path: facultative_path,
            obligatory_path: Some(obligatory_path),
            exposure_path,
            output_path: None,
            expected_rows: 4,
            ..BatchConfig::default()
        };
        let outcome = run_batch(&config, &mut NoProgress).unwrap();

        assert_eq!(outcome.tables.facultative.len(), 2);
        assert_eq!(outcome.tables.obligatory.risk.lower, 10_000.0);
        assert_eq!(outcome.tables.obligatory.risk.upper, 50_000.0);
        assert_eq!(outcome.net_retained, vec![6000.0, 5000.0, 4000.0]);

        // The facultative file alone carries no obligatory columns
        let config = BatchConfig { obligatory_path: None, ..config };
        let outcome = run_batch(&config, &mut NoProgress).unwrap();
        assert!(!outcome.tables.obligatory.risk.is_configured());
        assert_eq!(outcome.net_retained[1], 30_000.0);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_generated_portfolio_skips_exposure_file() {
        let dir = scratch_dir("generated");
        let treaty_path = dir.join("treaty.csv");
        fs::write(&treaty_path, TREATY_FILE).unwrap();

        let config = BatchConfig {
            treaty_path,
            exposure_path: dir.join("never_read.csv"),
            output_path: None,
            generated_rows: Some(1_000),
            parallel: false,
            ..BatchConfig::default()
        };
        let outcome = run_batch(&config, &mut NoProgress).unwrap();

        assert_eq!(outcome.len(), 1_000);
        assert_eq!(outcome.exposures.len(), 1_000);
        assert_eq!(compute(&outcome.tables, &outcome.exposures, true), outcome.net_retained);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_treaty_file_aborts() {
        let config = BatchConfig {
            treaty_path: PathBuf::from("missing/treaty.csv"),
            output_path: None,
            ..BatchConfig::default()
        };
        let err = run_batch(&config, &mut NoProgress).unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
    }
}
