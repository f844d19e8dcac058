use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 4217-style currency code, stored upper-cased.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("EUR")
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Currency facts needed to render an amount, resolved once per project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCurrency {
    pub code: CurrencyCode,
    pub symbol: String,
    pub minor_units: u8,
}

impl DisplayCurrency {
    pub fn resolve(code: &CurrencyCode) -> Self {
        Self {
            code: code.clone(),
            symbol: symbol_for(code.as_str()),
            minor_units: minor_units_for(code.as_str()),
        }
    }

    /// Keeps a symbol recorded earlier for the project instead of the table's.
    pub fn with_symbol(code: &CurrencyCode, symbol: &str) -> Self {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Self::resolve(code);
        }
        Self {
            code: code.clone(),
            symbol: symbol.to_string(),
            minor_units: minor_units_for(code.as_str()),
        }
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "KRW" => "₩".into(),
        "INR" => "₹".into(),
        "CNY" => "CN¥".into(),
        "AUD" => "A$".into(),
        "CAD" => "CA$".into(),
        "MAD" => "DH".into(),
        "CHF" => "CHF".into(),
        "AED" => "AED".into(),
        _ => code.into(),
    }
}

/// Number of fraction digits shown for a currency; zero-fraction currencies render whole units.
pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" | "KRW" | "VND" | "CLP" | "ISK" | "UGX" | "XAF" | "XOF" => 0,
        _ => 2,
    }
}
