//! Progress reporting for the treaty loaders
//!
//! Loaders call [`ProgressObserver::advance`] once per data row they process.
//! The observer is owned by the caller, which decides what a step is worth
//! and how (or whether) to display it.

/// Default increment per processed row
pub const DEFAULT_PROGRESS_STEP: f64 = 0.0001;

/// Receives one notification per processed row
pub trait ProgressObserver {
    fn advance(&mut self);
}

/// Accumulates a fixed step per row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressCounter {
    value: f64,
    step: f64,
}

impl ProgressCounter {
    pub fn new(step: f64) -> Self {
        Self { value: 0.0, step }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

impl Default for ProgressCounter {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRESS_STEP)
    }
}

impl ProgressObserver for ProgressCounter {
    fn advance(&mut self) {
        self.value += self.step;
    }
}

/// Ignores all progress
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn advance(&mut self) {}
}
