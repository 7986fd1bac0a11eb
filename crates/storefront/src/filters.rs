//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Text shown next to the stock counter.
///
/// Mirrors `stockLabel()` in the page script so the server-rendered and
/// polled values read the same.
///
/// Usage in templates: `{{ stock|stock_label }}`
#[askama::filter_fn]
pub fn stock_label(level: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let level = level.to_string();
    if level == "0" {
        Ok("Sold out".to_string())
    } else {
        Ok(format!("{level} left"))
    }
}

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}
