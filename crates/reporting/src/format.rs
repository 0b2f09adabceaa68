//! Display helpers for renderers. Dates are formatted from their calendar
//! fields only; nothing here consults a timezone.

use chrono::NaiveDate;
use leadboard_core::coerce::parse_literal_date;
use leadboard_core::config::ReportingConfig;
use serde::{Deserialize, Serialize};

/// `DD/MM`
pub fn short_date(date: NaiveDate) -> String {
    date.format("%d/%m").to_string()
}

/// `DD/MM/YYYY`
pub fn full_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `DD/MM` from a stored `YYYY-MM-DD` string; empty or unreadable input
/// gives an empty label.
pub fn short_date_str(raw: &str) -> String {
    parse_literal_date(raw).map(short_date).unwrap_or_default()
}

/// `DD/MM/YYYY` from a stored `YYYY-MM-DD` string.
pub fn full_date_str(raw: &str) -> String {
    parse_literal_date(raw).map(full_date).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub thousands_separator: String,
    pub decimal_separator: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::from(&ReportingConfig::default())
    }
}

impl From<&ReportingConfig> for CurrencyFormat {
    fn from(config: &ReportingConfig) -> Self {
        Self {
            symbol: config.currency_symbol.clone(),
            thousands_separator: config.thousands_separator.clone(),
            decimal_separator: config.decimal_separator.clone(),
        }
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Two-decimal money string, e.g. `R$ 1.234,56` or `-R$ 80,00`.
pub fn currency(value: f64, format: &CurrencyFormat) -> String {
    let value = finite_or_zero(value);
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push_str(&format.thousands_separator);
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{sign}{} {grouped}{}{fraction:02}",
        format.symbol, format.decimal_separator
    )
}

/// `12.34%`
pub fn percentage(value: f64) -> String {
    format!("{:.2}%", finite_or_zero(value))
}

/// `2.67x`
pub fn roas(value: f64) -> String {
    format!("{:.2}x", finite_or_zero(value))
}

/// Whether a net result should be shown as a gain or a loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultTone {
    Positive,
    Negative,
}

pub fn result_tone(value: f64) -> ResultTone {
    if value >= 0.0 {
        ResultTone::Positive
    } else {
        ResultTone::Negative
    }
}
