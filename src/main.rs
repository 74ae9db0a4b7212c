//! Fire Reinsurance CLI
//!
//! Computes net retention for an exposure portfolio under the configured
//! facultative and obligatory treaties

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fire_reinsurance::{run_batch, BatchConfig, NumericMode, ProgressCounter};

#[derive(Debug, Parser)]
#[command(name = "fire_reinsurance", version, about = "Net retention for fire-risk exposure portfolios")]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Facultative layer file
    #[arg(long)]
    treaty: Option<PathBuf>,

    /// Obligatory treaty file (defaults to the facultative file)
    #[arg(long)]
    obligatory: Option<PathBuf>,

    /// Exposure portfolio file
    #[arg(long)]
    exposures: Option<PathBuf>,

    /// Result file
    #[arg(long, conflicts_with = "no_output")]
    output: Option<PathBuf>,

    /// Skip writing the result file
    #[arg(long)]
    no_output: bool,

    /// Skip rows with malformed numbers instead of truncating them
    #[arg(long)]
    strict: bool,

    /// Compute on the current thread only
    #[arg(long)]
    sequential: bool,

    /// Row count hint for pre-sizing exposure columns
    #[arg(long)]
    expected_rows: Option<usize>,

    /// Use this many synthetic exposures instead of the exposure file
    #[arg(long)]
    generate: Option<usize>,
}

impl Cli {
    fn into_config(self) -> Result<BatchConfig> {
        let mut config = match &self.config {
            Some(path) => BatchConfig::from_json_path(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => BatchConfig::default(),
        };

        if let Some(path) = self.treaty {
            config.treaty_path = path;
        }
        if let Some(path) = self.obligatory {
            config.obligatory_path = Some(path);
        }
        if let Some(path) = self.exposures {
            config.exposure_path = path;
        }
        if let Some(path) = self.output {
            config.output_path = Some(path);
        }
        if self.no_output {
            config.output_path = None;
        }
        if self.strict {
            config.numeric_mode = NumericMode::Strict;
        }
        if self.sequential {
            config.parallel = false;
        }
        if let Some(rows) = self.expected_rows {
            config.expected_rows = rows;
        }
        if let Some(rows) = self.generate {
            config.generated_rows = Some(rows);
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let config = Cli::parse().into_config()?;
    let mut progress = ProgressCounter::new(config.progress_step);

    let outcome = run_batch(&config, &mut progress).context("Reinsurance batch failed")?;

    println!("Fire Reinsurance v{}", env!("CARGO_PKG_VERSION"));
    println!("=========================\n");
    println!("Facultative layers:  {}", outcome.tables.facultative.len());
    println!("Obligatory treaty:   {}", if outcome.tables.obligatory.risk.is_configured() { "configured" } else { "none" });
    println!("Exposures:           {}", outcome.len());
    println!("Total sum insured:   {:.2}", outcome.exposures.total_sum_insured());
    println!("Total net retained:  {:.2}", outcome.total_net_retained());
    println!(
        "OK: {} records, {} ms ({:.3} s)",
        outcome.len(),
        outcome.elapsed.as_millis(),
        outcome.elapsed.as_secs_f64()
    );
    if let Some(path) = &config.output_path {
        println!("\nFull results written to: {}", path.display());
    }

    Ok(())
}
