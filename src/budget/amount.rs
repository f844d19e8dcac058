//! Conversion between display strings and canonical amounts.
//!
//! Canonical amounts are plain `f64` values. Display strings pair the project's
//! currency symbol with a comma-decimal number, e.g. `"AED 1234,56"`.

use serde::{Deserialize, Serialize};

use crate::currency::DisplayCurrency;

/// An amount as it arrives from storage or an input field: a number or a display string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl From<f64> for RawAmount {
    fn from(value: f64) -> Self {
        RawAmount::Number(value)
    }
}

impl From<i32> for RawAmount {
    fn from(value: i32) -> Self {
        RawAmount::Number(f64::from(value))
    }
}

impl From<i64> for RawAmount {
    fn from(value: i64) -> Self {
        RawAmount::Number(value as f64)
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        RawAmount::Text(value.to_string())
    }
}

impl From<String> for RawAmount {
    fn from(value: String) -> Self {
        RawAmount::Text(value)
    }
}

impl From<&String> for RawAmount {
    fn from(value: &String) -> Self {
        RawAmount::Text(value.clone())
    }
}

/// Converts a number or display string into a canonical amount.
///
/// Never fails: anything that cannot be read as a finite number becomes `0.0`.
pub fn parse_amount(input: impl Into<RawAmount>) -> f64 {
    match input.into() {
        RawAmount::Number(value) => finite_or_zero(value),
        RawAmount::Text(text) => parse_text(&text),
    }
}

/// Renders a canonical amount as `"<symbol> <number>"` with a comma decimal separator.
pub fn format_amount(value: f64, currency: &DisplayCurrency) -> String {
    let rounded = round_to(value, currency.minor_units);
    let body = format!("{:.*}", currency.minor_units as usize, rounded).replace('.', ",");
    format!("{} {}", currency.symbol, body)
}

/// Half-away-from-zero rounding to `decimals` fraction digits. Non-finite input becomes `0.0`.
///
/// Values too large to scale carry no fraction digits and are returned as they are.
pub fn round_to(value: f64, decimals: u8) -> f64 {
    let value = finite_or_zero(value);
    let factor = 10f64.powi(i32::from(decimals));
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    let rounded = finite_or_zero(scaled.round() / factor);
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn parse_text(raw: &str) -> f64 {
    let mut negative = false;
    let mut seen_digit = false;
    let mut body = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '0'..='9' => {
                seen_digit = true;
                body.push(ch);
            }
            '.' | ',' => body.push(ch),
            '-' if !seen_digit => negative = true,
            _ => {}
        }
    }

    let normalized = normalize_separators(&body);
    let value = match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => return 0.0,
    };
    if value == 0.0 {
        0.0
    } else if negative {
        -value
    } else {
        value
    }
}

/// The last separator is the decimal point when both kinds appear, or when the
/// only kind is `,`. A lone `.` is a decimal point; repeated `.` are grouping.
fn normalize_separators(body: &str) -> String {
    let is_separator = |c: char| c == '.' || c == ',';
    let decimal_at = match (body.rfind(','), body.rfind('.')) {
        (Some(comma), Some(dot)) => Some(comma.max(dot)),
        (Some(comma), None) => Some(comma),
        (None, Some(dot)) if body.matches('.').count() == 1 => Some(dot),
        _ => None,
    };
    match decimal_at {
        Some(pos) => {
            let integer = body[..pos].replace(is_separator, "");
            let fraction = body[pos + 1..].replace(is_separator, "");
            format!("{integer}.{fraction}")
        }
        None => body.replace(is_separator, ""),
    }
}
