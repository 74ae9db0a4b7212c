//! Fire Reinsurance - net retention engine for fire-risk exposure portfolios
//!
//! This library provides:
//! - Fast ingestion of `;`-delimited, comma-decimal exposure and treaty files
//! - Facultative layer tables (quota-share and excess-of-loss)
//! - A two-tier obligatory surplus treaty
//! - Per-exposure net retention, sequential or parallel
//! - A batch driver and result writer

pub mod config;
pub mod error;
pub mod exposure;
pub mod output;
pub mod parse;
pub mod progress;
pub mod retention;
pub mod treaty;

// Re-export commonly used types
pub use config::BatchConfig;
pub use error::{Error, Result};
pub use exposure::{Exposure, ExposureColumns};
pub use parse::NumericMode;
pub use progress::{NoProgress, ProgressCounter, ProgressObserver};
pub use retention::{run_batch, BatchOutcome, NetRetentionCalculator};
pub use treaty::{FacultativeLayer, FacultativeTable, ObligatoryTreaty, SurplusTreaty, TreatyTables};
