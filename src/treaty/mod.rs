//! Treaty tables and their loaders

pub mod columns;
mod data;
pub mod loader;

pub use data::{
    FacultativeLayer, FacultativeTable, LayerTerms, ObligatoryTreaty, SurplusTreaty, TreatyTables,
    NO_FACULTATIVE_CODE, UNCONFIGURED_BOUND,
};
pub use loader::{load_facultative, load_facultative_from_reader, load_obligatory, load_obligatory_from_reader};
