//! Numeric micro-parser for locale-normalized fields
//!
//! Grammar: optional leading `-`, integer digits, and (floats only) a `.`
//! followed by fractional digits. There is no exponent, no thousands
//! separator and no overflow detection. In lenient mode the first unexpected
//! byte ends the scan and whatever was accumulated so far is returned, so
//! `"12.5.6"` reads as `12.5` and `"abc"` reads as `0`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A field that strict mode refused to read as a number
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a number: {text:?}")]
pub struct ParseNumberError {
    pub text: String,
}

impl ParseNumberError {
    fn new(bytes: &[u8]) -> Self {
        Self {
            text: String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

/// How strictly numeric fields are read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericMode {
    /// Truncate at the first unexpected byte; never fails
    #[default]
    Lenient,
    /// Require at least one digit and a fully consumed field
    Strict,
}

impl NumericMode {
    pub fn parse_f64(self, bytes: &[u8]) -> Result<f64, ParseNumberError> {
        let (value, consumed, digits) = scan_f64(bytes);
        match self {
            NumericMode::Lenient => Ok(value),
            NumericMode::Strict if digits > 0 && consumed == bytes.len() => Ok(value),
            NumericMode::Strict => Err(ParseNumberError::new(bytes)),
        }
    }

    pub fn parse_i64(self, bytes: &[u8]) -> Result<i64, ParseNumberError> {
        let (value, consumed, digits) = scan_i64(bytes);
        match self {
            NumericMode::Lenient => Ok(value),
            NumericMode::Strict if digits > 0 && consumed == bytes.len() => Ok(value),
            NumericMode::Strict => Err(ParseNumberError::new(bytes)),
        }
    }

    /// Like [`parse_f64`](Self::parse_f64), but a field without a single
    /// digit is an error in either mode
    pub fn parse_f64_required(self, bytes: &[u8]) -> Result<f64, ParseNumberError> {
        match self {
            NumericMode::Lenient => match scan_f64(bytes) {
                (value, _, digits) if digits > 0 => Ok(value),
                _ => Err(ParseNumberError::new(bytes)),
            },
            NumericMode::Strict => self.parse_f64(bytes),
        }
    }

    /// Integer counterpart of [`parse_f64_required`](Self::parse_f64_required)
    pub fn parse_i64_required(self, bytes: &[u8]) -> Result<i64, ParseNumberError> {
        match self {
            NumericMode::Lenient => match scan_i64(bytes) {
                (value, _, digits) if digits > 0 => Ok(value),
                _ => Err(ParseNumberError::new(bytes)),
            },
            NumericMode::Strict => self.parse_i64(bytes),
        }
    }
}

/// Lenient float parse
#[inline]
pub fn parse_f64(bytes: &[u8]) -> f64 {
    scan_f64(bytes).0
}

/// Lenient integer parse
#[inline]
pub fn parse_i64(bytes: &[u8]) -> i64 {
    scan_i64(bytes).0
}

/// Rewrite every `,` to `.` in place
#[inline]
pub fn normalize_decimal(line: &mut [u8]) {
    for byte in line.iter_mut() {
        if *byte == b',' {
            *byte = b'.';
        }
    }
}

/// Returns (value, bytes consumed, digits seen)
#[inline]
fn scan_f64(bytes: &[u8]) -> (f64, usize, usize) {
    let mut i = 0;
    let negative = bytes.first() == Some(&b'-');
    if negative {
        i = 1;
    }

    let mut digits = 0;
    let mut value = 0.0_f64;
    while let Some(&b) = bytes.get(i) {
        if !b.is_ascii_digit() {
            break;
        }
        value = value * 10.0 + f64::from(b - b'0');
        digits += 1;
        i += 1;
    }

    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let mut weight = 0.1_f64;
        while let Some(&b) = bytes.get(i) {
            if !b.is_ascii_digit() {
                break;
            }
            value += f64::from(b - b'0') * weight;
            weight *= 0.1;
            digits += 1;
            i += 1;
        }
    }

    (if negative { -value } else { value }, i, digits)
}

#[inline]
fn scan_i64(bytes: &[u8]) -> (i64, usize, usize) {
    let mut i = 0;
    let negative = bytes.first() == Some(&b'-');
    if negative {
        i = 1;
    }

    let mut digits = 0;
    let mut value = 0_i64;
    while let Some(&b) = bytes.get(i) {
        if !b.is_ascii_digit() {
            break;
        }
        value = value.wrapping_mul(10).wrapping_add(i64::from(b - b'0'));
        digits += 1;
        i += 1;
    }

    (if negative { value.wrapping_neg() } else { value }, i, digits)
}
