//! CSV file data adapter.
//!
//! Files live under one directory, named by instrument code:
//! `<CODE>_levels.csv` (`date,val,vah`) and `<CODE>_session.csv`
//! (`timestamp,event,open,close`).

use crate::domain::error::VatraderError;
use crate::domain::levels::LevelTable;
use crate::domain::session::SessionEvent;
use crate::domain::value_area::ValueArea;
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};

const LEVELS_SUFFIX: &str = "_levels.csv";
const SESSION_SUFFIX: &str = "_session.csv";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn levels_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}{}", code, LEVELS_SUFFIX))
    }

    fn session_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}{}", code, SESSION_SUFFIX))
    }

    fn read(&self, path: &Path) -> Result<String, VatraderError> {
        fs::read_to_string(path).map_err(|e| VatraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })
    }
}

fn field<'a>(
    record: &'a csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<&'a str, VatraderError> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| VatraderError::Data {
            reason: format!("missing {} column", name),
        })
}

/// Price column; empty or `nan` is undefined. Infinities are rejected.
fn parse_price(value: &str, name: &str) -> Result<f64, VatraderError> {
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    let price: f64 = value.parse().map_err(|e| VatraderError::Data {
        reason: format!("invalid {} value '{}': {}", name, value, e),
    })?;
    if !price.is_finite() {
        return Err(VatraderError::Data {
            reason: format!("invalid {} value '{}': not a finite price", name, value),
        });
    }
    Ok(price)
}

fn parse_required_price(value: &str, name: &str) -> Result<f64, VatraderError> {
    let price = parse_price(value, name)?;
    if price.is_nan() {
        return Err(VatraderError::Data {
            reason: format!("{} is required for bar rows", name),
        });
    }
    Ok(price)
}

impl DataPort for CsvAdapter {
    fn fetch_levels(&self, code: &str) -> Result<LevelTable, VatraderError> {
        let content = self.read(&self.levels_path(code))?;
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut table = LevelTable::new(code);

        for result in rdr.records() {
            let record = result.map_err(|e| VatraderError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = field(&record, 0, "date")?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                VatraderError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;
            let val = parse_price(field(&record, 1, "val")?, "val")?;
            let vah = parse_price(field(&record, 2, "vah")?, "vah")?;

            if table.insert(date, ValueArea::new(val, vah)).is_some() {
                tracing::warn!(%code, %date, "duplicate level row, keeping the last one");
            }
        }

        for date in table.inverted_dates() {
            tracing::warn!(%code, %date, "value area low is above high");
        }
        Ok(table)
    }

    fn fetch_session(
        &self,
        code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<SessionEvent>, VatraderError> {
        let content = self.read(&self.session_path(code))?;
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let mut events = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| VatraderError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let ts_str = field(&record, 0, "timestamp")?;
            let timestamp =
                NaiveDateTime::parse_from_str(ts_str, TIMESTAMP_FORMAT).map_err(|e| {
                    VatraderError::Data {
                        reason: format!("invalid timestamp '{}': {}", ts_str, e),
                    }
                })?;

            let date = timestamp.date();
            if start_date.is_some_and(|s| date < s) || end_date.is_some_and(|e| date > e) {
                continue;
            }

            let event = match field(&record, 1, "event")?.to_lowercase().as_str() {
                "bar" => SessionEvent::Bar {
                    timestamp,
                    open: parse_required_price(field(&record, 2, "open")?, "open")?,
                    close: parse_required_price(field(&record, 3, "close")?, "close")?,
                },
                "filled" | "fill" => SessionEvent::Filled { timestamp },
                "cancelled" | "canceled" | "cancel" => SessionEvent::Cancelled { timestamp },
                other => {
                    return Err(VatraderError::Data {
                        reason: format!("unknown event '{}' at {}", other, ts_str),
                    });
                }
            };
            events.push(event);
        }

        // stable: same-timestamp rows keep file order
        events.sort_by_key(|e| e.timestamp());
        Ok(events)
    }

    fn list_symbols(&self) -> Result<Vec<String>, VatraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| VatraderError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| VatraderError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(code) = name_str.strip_suffix(LEVELS_SUFFIX) {
                symbols.push(code.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let levels = "date,val,vah\n\
            2017-11-20,2578.25,2582.25\n\
            2017-11-21,2578.25,2583.25\n\
            2017-11-22,,2600\n";
        fs::write(path.join("ESZ7_levels.csv"), levels).unwrap();
        fs::write(path.join("NQZ7_levels.csv"), "date,val,vah\n").unwrap();

        let session = "timestamp,event,open,close\n\
            2017-11-20 09:30:00,bar,2575.0,2576.0\n\
            2017-11-21 09:30:00,bar,2577.0,2579.0\n\
            2017-11-21 09:31:00,filled\n\
            2017-11-21 09:35:00,Cancelled,,\n\
            2017-11-22 09:30:00,bar,2590.0,2591.5\n";
        fs::write(path.join("ESZ7_session.csv"), session).unwrap();

        (dir, path)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fetch_levels_reads_bands() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let table = adapter.fetch_levels("ESZ7").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.code, "ESZ7");
        assert_eq!(table.lookup(date(2017, 11, 21)), ValueArea::new(2578.25, 2583.25));
    }

    #[test]
    fn fetch_levels_empty_bound_is_undefined() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let table = adapter.fetch_levels("ESZ7").unwrap();
        let va = table.lookup(date(2017, 11, 22));
        assert!(!va.is_defined());
        assert_eq!(va.vah, 2600.0);
    }

    #[test]
    fn fetch_levels_rejects_bad_price() {
        let (_dir, path) = setup_test_data();
        fs::write(path.join("BAD_levels.csv"), "date,val,vah\n2017-11-20,abc,10\n").unwrap();
        let adapter = CsvAdapter::new(path);
        assert!(matches!(
            adapter.fetch_levels("BAD"),
            Err(VatraderError::Data { .. })
        ));
    }

    #[test]
    fn fetch_levels_rejects_infinite_bound() {
        let (_dir, path) = setup_test_data();
        fs::write(path.join("INF_levels.csv"), "date,val,vah\n2017-11-20,100,inf\n").unwrap();
        fs::write(
            path.join("NEG_levels.csv"),
            "date,val,vah\n2017-11-20,-Infinity,110\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(path);
        assert!(matches!(
            adapter.fetch_levels("INF"),
            Err(VatraderError::Data { .. })
        ));
        assert!(matches!(
            adapter.fetch_levels("NEG"),
            Err(VatraderError::Data { .. })
        ));
    }

    #[test]
    fn fetch_session_rejects_infinite_price() {
        let (_dir, path) = setup_test_data();
        fs::write(
            path.join("INF_session.csv"),
            "timestamp,event,open,close\n2017-11-20 09:30:00,bar,100,infinity\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(path);
        assert!(matches!(
            adapter.fetch_session("INF", None, None),
            Err(VatraderError::Data { .. })
        ));
    }

    #[test]
    fn fetch_levels_missing_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert!(adapter.fetch_levels("XYZ").is_err());
    }

    #[test]
    fn fetch_session_parses_all_event_kinds() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let events = adapter.fetch_session("ESZ7", None, None).unwrap();
        assert_eq!(events.len(), 5);
        assert!(matches!(
            events[0],
            SessionEvent::Bar { open, close, .. } if open == 2575.0 && close == 2576.0
        ));
        assert!(matches!(events[2], SessionEvent::Filled { .. }));
        assert!(matches!(events[3], SessionEvent::Cancelled { .. }));
    }

    #[test]
    fn fetch_session_filters_by_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let events = adapter
            .fetch_session("ESZ7", Some(date(2017, 11, 21)), Some(date(2017, 11, 21)))
            .unwrap();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.timestamp().date() == date(2017, 11, 21)));
    }

    #[test]
    fn fetch_session_requires_prices_on_bars() {
        let (_dir, path) = setup_test_data();
        fs::write(
            path.join("GAP_session.csv"),
            "timestamp,event,open,close\n2017-11-20 09:30:00,bar,,2576.0\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(path);
        assert!(adapter.fetch_session("GAP", None, None).is_err());
    }

    #[test]
    fn fetch_session_rejects_unknown_event() {
        let (_dir, path) = setup_test_data();
        fs::write(
            path.join("ODD_session.csv"),
            "timestamp,event,open,close\n2017-11-20 09:30:00,split,1,1\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(path);
        let err = adapter.fetch_session("ODD", None, None).unwrap_err();
        assert!(err.to_string().contains("unknown event 'split'"));
    }

    #[test]
    fn list_symbols_returns_codes_with_levels() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let symbols = adapter.list_symbols().unwrap();
        assert_eq!(symbols, vec!["ESZ7", "NQZ7"]);
    }
}
