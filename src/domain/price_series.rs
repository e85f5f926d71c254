//! Daily closing price representation and symbol list parsing.

use chrono::NaiveDate;
use std::collections::HashSet;

/// One daily close for an instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl ClosePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SymbolError {
    #[error("empty token in symbol list")]
    EmptyToken,
}

/// Parse a comma-separated ticker list: trim, uppercase, drop repeats.
///
/// A symbol requested twice is the same instrument, so the second mention is
/// ignored rather than rejected. Order of first mention is preserved.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, SymbolError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(SymbolError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if seen.insert(symbol.clone()) {
            symbols.push(symbol);
        }
    }

    Ok(symbols)
}
