//! Exposure records and portfolio loading

mod data;
pub mod loader;
pub mod synthetic;

pub use data::{columns, Exposure, ExposureColumns, EMPTY_CODE_SENTINEL, STREAMING_EMPTY_CODE};
pub use loader::{
    for_each_exposure, for_each_exposure_from_reader, load_exposure_columns, load_exposure_columns_from_reader,
    LoadStats,
};
pub use synthetic::{synthetic_portfolio, write_portfolio};
