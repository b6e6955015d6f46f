//! Per-date value area table for one instrument.

use crate::domain::value_area::ValueArea;
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct LevelTable {
    pub code: String,
    levels: BTreeMap<NaiveDate, ValueArea>,
}

impl LevelTable {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            levels: BTreeMap::new(),
        }
    }

    /// Inserts or replaces the value area for `date`.
    pub fn insert(&mut self, date: NaiveDate, va: ValueArea) -> Option<ValueArea> {
        self.levels.insert(date, va)
    }

    /// The value area for `date`; undefined when the date has no entry.
    pub fn lookup(&self, date: NaiveDate) -> ValueArea {
        self.levels
            .get(&date)
            .copied()
            .unwrap_or(ValueArea::UNDEFINED)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Entries in date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, ValueArea)> + '_ {
        self.levels.iter().map(|(d, va)| (*d, *va))
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.levels.keys().next()?;
        let last = self.levels.keys().next_back()?;
        Some((*first, *last))
    }

    /// Dates whose band has VAL above VAH.
    pub fn inverted_dates(&self) -> Vec<NaiveDate> {
        self.levels
            .iter()
            .filter(|(_, va)| va.is_inverted())
            .map(|(d, _)| *d)
            .collect()
    }
}
