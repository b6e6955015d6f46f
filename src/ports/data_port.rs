//! Data access port: value-area levels and session scripts.

use crate::domain::error::VatraderError;
use crate::domain::levels::LevelTable;
use crate::domain::session::SessionEvent;
use chrono::NaiveDate;

pub trait DataPort {
    fn fetch_levels(&self, code: &str) -> Result<LevelTable, VatraderError>;

    /// Session events in timestamp order, optionally restricted to an
    /// inclusive date range.
    fn fetch_session(
        &self,
        code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<SessionEvent>, VatraderError>;

    /// Codes that have a levels file.
    fn list_symbols(&self) -> Result<Vec<String>, VatraderError>;
}
