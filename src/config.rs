//! Batch run configuration, loadable from JSON

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parse::NumericMode;
use crate::progress::DEFAULT_PROGRESS_STEP;

/// Settings for one net retention batch
///
/// Every field has a default, so a JSON config only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Facultative layer file
    #[serde(default = "default_treaty_path")]
    pub treaty_path: PathBuf,

    /// Obligatory treaty file (defaults to `treaty_path`)
    #[serde(default)]
    pub obligatory_path: Option<PathBuf>,

    /// Exposure portfolio file
    #[serde(default = "default_exposure_path")]
    pub exposure_path: PathBuf,

    /// Result file; `null` skips writing
    #[serde(default = "default_output_path")]
    pub output_path: Option<PathBuf>,

    /// Numeric parsing mode for every input file
    #[serde(default)]
    pub numeric_mode: NumericMode,

    /// Compute net retention across worker threads
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Row count hint used to pre-size exposure columns
    #[serde(default = "default_expected_rows")]
    pub expected_rows: usize,

    /// Progress increment per treaty row
    #[serde(default = "default_progress_step")]
    pub progress_step: f64,

    /// Generate this many synthetic exposures instead of reading `exposure_path`
    #[serde(default)]
    pub generated_rows: Option<usize>,
}

fn default_treaty_path() -> PathBuf { PathBuf::from("Reasekuracja_2.csv") }
fn default_exposure_path() -> PathBuf { PathBuf::from("dane_input.csv") }
fn default_output_path() -> Option<PathBuf> { Some(PathBuf::from("reinsurance_output.csv")) }
fn default_parallel() -> bool { true }
fn default_expected_rows() -> usize { 1_000_000 }
fn default_progress_step() -> f64 { DEFAULT_PROGRESS_STEP }

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            treaty_path: default_treaty_path(),
            obligatory_path: None,
            exposure_path: default_exposure_path(),
            output_path: default_output_path(),
            numeric_mode: NumericMode::default(),
            parallel: default_parallel(),
            expected_rows: default_expected_rows(),
            progress_step: default_progress_step(),
            generated_rows: None,
        }
    }
}

impl BatchConfig {
    /// Parse a JSON config document
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Read and parse a JSON config file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// File the obligatory treaty is read from
    pub fn obligatory_path(&self) -> &Path {
        self.obligatory_path.as_deref().unwrap_or(&self.treaty_path)
    }
}
