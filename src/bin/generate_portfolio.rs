//! Write a synthetic exposure portfolio for throughput runs
//!
//! Usage: cargo run --release --bin generate_portfolio -- --rows 5000000 --output dane_input.csv

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use fire_reinsurance::exposure::write_portfolio;

#[derive(Debug, Parser)]
#[command(name = "generate_portfolio", about = "Write a synthetic exposure file")]
struct Args {
    /// Number of exposure rows
    #[arg(long, default_value_t = 1_000_000)]
    rows: usize,

    /// Destination file
    #[arg(long, default_value = "dane_input.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    write_portfolio(BufWriter::with_capacity(1 << 20, file), args.rows)
        .with_context(|| format!("Failed writing {}", args.output.display()))?;

    println!("Wrote {} exposures to {} in {:?}", args.rows, args.output.display(), start.elapsed());
    Ok(())
}
