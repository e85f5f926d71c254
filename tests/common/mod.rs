#![allow(dead_code)]

use chrono::NaiveDate;
use portopt::domain::error::PortoptError;
pub use portopt::domain::price_series::ClosePoint;
use portopt::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<ClosePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_closes(mut self, symbol: &str, points: Vec<ClosePoint>) -> Self {
        self.data.insert(symbol.to_string(), points);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_closes(
        &self,
        symbol: &str,
        _start_date: NaiveDate,
        _end_date: NaiveDate,
    ) -> Result<Vec<ClosePoint>, PortoptError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(PortoptError::DataRead {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, PortoptError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn make_close(date_str: &str, close: f64) -> ClosePoint {
    ClosePoint {
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        close,
    }
}

/// A daily series whose per-day returns cycle through `pattern`.
pub fn generate_patterned_closes(
    start: &str,
    count: usize,
    initial: f64,
    pattern: &[f64],
) -> Vec<ClosePoint> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    let mut close = initial;
    (0..count)
        .map(|i| {
            let point = ClosePoint {
                date: start + chrono::Duration::days(i as i64),
                close,
            };
            close *= 1.0 + pattern[i % pattern.len()];
            point
        })
        .collect()
}

pub fn symbols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}
