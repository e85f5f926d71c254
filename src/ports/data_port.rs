//! Market-data access port trait.

use crate::domain::error::PortoptError;
use crate::domain::price_series::ClosePoint;
use chrono::NaiveDate;

/// Supplies daily closing prices. An unknown symbol may come back as an
/// error or as an empty series; the caller treats both as "no data".
pub trait DataPort {
    fn fetch_closes(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<ClosePoint>, PortoptError>;

    fn list_symbols(&self) -> Result<Vec<String>, PortoptError>;
}
