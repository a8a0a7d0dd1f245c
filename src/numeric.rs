//! Lenient number parsing for form input.
//!
//! Numeric fields never reject input. Text is read the way a browser's
//! `parseFloat` reads it: leading whitespace is skipped and the longest numeric
//! prefix wins. Anything without a numeric prefix, and any non-finite result,
//! becomes zero.

use regex::Regex;
use std::sync::OnceLock;

use crate::types::RawValue;

static NUMERIC_PREFIX: OnceLock<Regex> = OnceLock::new();

fn numeric_prefix() -> &'static Regex {
    NUMERIC_PREFIX.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("numeric prefix regex")
    })
}

/// How much of the raw text made it into the parsed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseQuality {
    /// Empty or whitespace-only input.
    Empty,
    /// The whole (trimmed) input was a number.
    Exact,
    /// Only a leading part was numeric; the rest was ignored.
    Prefix,
    /// Nothing numeric; the value fell back to zero.
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedNumber {
    pub value: f64,
    pub quality: ParseQuality,
}

pub fn parse_number(raw: &str) -> ParsedNumber {
    let trimmed = raw.trim_start();
    if trimmed.trim_end().is_empty() {
        return ParsedNumber {
            value: 0.0,
            quality: ParseQuality::Empty,
        };
    }
    let Some(m) = numeric_prefix().find(trimmed) else {
        return ParsedNumber {
            value: 0.0,
            quality: ParseQuality::Invalid,
        };
    };
    let value = m.as_str().parse::<f64>().unwrap_or(0.0);
    if !value.is_finite() {
        return ParsedNumber {
            value: 0.0,
            quality: ParseQuality::Invalid,
        };
    }
    let quality = if m.end() == trimmed.trim_end().len() {
        ParseQuality::Exact
    } else {
        ParseQuality::Prefix
    };
    ParsedNumber { value, quality }
}

/// The single zero-on-failure policy for every numeric form field.
pub fn parse_number_or_zero(raw: &str) -> f64 {
    unsigned_zero(parse_number(raw).value)
}

/// Same policy for values that may already arrive as numbers.
pub fn raw_to_number(raw: &RawValue) -> f64 {
    match raw {
        RawValue::Number(n) if n.is_finite() => unsigned_zero(*n),
        RawValue::Number(_) => 0.0,
        RawValue::Text(s) => parse_number_or_zero(s),
    }
}

// -0 compares equal to 0 but prints as "-0"
fn unsigned_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_and_empty_become_zero() {
        assert_eq!(parse_number_or_zero("abc"), 0.0);
        assert_eq!(parse_number_or_zero(""), 0.0);
        assert_eq!(parse_number_or_zero("   "), 0.0);
        assert_eq!(parse_number_or_zero("-"), 0.0);
        assert_eq!(parse_number_or_zero("."), 0.0);
    }

    #[test]
    fn takes_longest_numeric_prefix() {
        assert_eq!(parse_number_or_zero("12abc"), 12.0);
        assert_eq!(parse_number_or_zero("  2.25 "), 2.25);
        assert_eq!(parse_number_or_zero(".5"), 0.5);
        assert_eq!(parse_number_or_zero("3."), 3.0);
        assert_eq!(parse_number_or_zero("1e3"), 1000.0);
        assert_eq!(parse_number_or_zero("1e"), 1.0);
        assert_eq!(parse_number_or_zero("-4.5"), -4.5);
        assert_eq!(parse_number_or_zero("1,000"), 1.0);
    }

    #[test]
    fn reports_parse_quality() {
        assert_eq!(parse_number("").quality, ParseQuality::Empty);
        assert_eq!(parse_number(" 42 ").quality, ParseQuality::Exact);
        assert_eq!(parse_number("42kg").quality, ParseQuality::Prefix);
        assert_eq!(parse_number("kg").quality, ParseQuality::Invalid);
    }

    #[test]
    fn non_finite_values_become_zero() {
        assert_eq!(parse_number_or_zero("1e400"), 0.0);
        assert_eq!(parse_number_or_zero("Infinity"), 0.0);
        assert_eq!(raw_to_number(&RawValue::Number(f64::NAN)), 0.0);
        assert_eq!(raw_to_number(&RawValue::Number(7.0)), 7.0);
        assert_eq!(raw_to_number(&RawValue::Text("7".into())), 7.0);
    }

    #[test]
    fn negative_zero_reads_as_plain_zero() {
        assert!(parse_number_or_zero("-0").is_sign_positive());
        assert!(parse_number_or_zero("-0.00").is_sign_positive());
        assert!(raw_to_number(&RawValue::Number(-0.0)).is_sign_positive());
        assert!(raw_to_number(&RawValue::Text("-0abc".into())).is_sign_positive());
    }
}
