//! Text ingestion primitives shared by every loader

mod fields;
mod numeric;
mod lines;

pub use fields::{split_fields, FieldSpan, Fields};
pub use numeric::{normalize_decimal, parse_f64, parse_i64, NumericMode, ParseNumberError};
pub use lines::DataLines;

/// Field delimiter used by every input file
pub const DELIMITER: u8 = b';';
