//! Net retention calculation and the batch driver around it

mod calculator;
pub mod batch;

pub use calculator::NetRetentionCalculator;
pub use batch::{compute, run_batch, BatchOutcome};
