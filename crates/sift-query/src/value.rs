//! Literal values carried by equality-list predicates.
//!
//! An equality list holds either strings (quoted phrases) or numbers
//! (unquoted numeric literals). Numbers keep their integer-ness so that
//! `1` serializes as `1`, not `1.0`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Optional sign, at least one ASCII digit, at most one decimal point.
static NUMERIC_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)$").expect("numeric literal regex")
});

/// Returns `true` if `s` is a plain numeric literal such as `42`, `-3.5` or `.5`.
///
/// Exponents, separators, non-ASCII digits and the bare string `"."` are
/// rejected.
pub fn is_numeric_literal(s: &str) -> bool {
    NUMERIC_LITERAL.is_match(s)
}

/// Numeric value supporting the three JSON number shapes.
///
/// Numbers are stored in one of three variants to preserve precision:
/// - `I64` for signed integers
/// - `U64` for unsigned integers too large for `i64`
/// - `F64` for anything with a decimal point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Parses a numeric literal, choosing the narrowest fitting variant.
    ///
    /// Returns `None` for anything [`is_numeric_literal`] rejects.
    pub fn parse(literal: &str) -> Option<Number> {
        if !is_numeric_literal(literal) {
            return None;
        }
        if !literal.contains('.') {
            if let Ok(n) = literal.parse::<i64>() {
                return Some(Number::I64(n));
            }
            if let Ok(n) = literal.parse::<u64>() {
                return Some(Number::U64(n));
            }
        }
        literal
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Number::F64)
    }
}

/// One entry of an equality list: a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Unquoted numeric literal, coerced.
    Number(Number),
    /// Quoted phrase, kept verbatim.
    Text(String),
}

impl FilterValue {
    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FilterValue::Text(s) => Some(s),
            FilterValue::Number(_) => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            FilterValue::Number(n) => Some(*n),
            FilterValue::Text(_) => None,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Number(Number::I64(n))
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        FilterValue::Number(Number::F64(n))
    }
}
