#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use vatrader::adapters::recording_order_client::RecordingOrderClient;
use vatrader::domain::error::VatraderError;
use vatrader::domain::levels::LevelTable;
use vatrader::domain::machine::{MachineConfig, ValueAreaMachine};
use vatrader::domain::session::{SessionEvent, SessionRecord};
use vatrader::domain::state::MachineState;
use vatrader::domain::value_area::{Side, ValueArea};
use vatrader::ports::data_port::DataPort;
use vatrader::ports::order_client::OrderClient;
use vatrader::ports::report_port::ReportPort;

pub const VAL: f64 = 100.0;
pub const VAH: f64 = 110.0;

pub struct MockDataPort {
    pub levels: HashMap<String, LevelTable>,
    pub sessions: HashMap<String, Vec<SessionEvent>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            levels: HashMap::new(),
            sessions: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_levels(mut self, table: LevelTable) -> Self {
        self.levels.insert(table.code.clone(), table);
        self
    }

    pub fn with_session(mut self, code: &str, events: Vec<SessionEvent>) -> Self {
        self.sessions.insert(code.to_string(), events);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_levels(&self, code: &str) -> Result<LevelTable, VatraderError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(VatraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .levels
            .get(code)
            .cloned()
            .unwrap_or_else(|| LevelTable::new(code)))
    }

    fn fetch_session(
        &self,
        code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<SessionEvent>, VatraderError> {
        let events = self.sessions.get(code).cloned().unwrap_or_default();
        Ok(events
            .into_iter()
            .filter(|e| {
                let d = e.timestamp().date();
                !start_date.is_some_and(|s| d < s) && !end_date.is_some_and(|e| d > e)
            })
            .collect())
    }

    fn list_symbols(&self) -> Result<Vec<String>, VatraderError> {
        let mut codes: Vec<String> = self.levels.keys().cloned().collect();
        codes.sort();
        Ok(codes)
    }
}

/// Keeps written session logs in memory, keyed by code.
#[derive(Default)]
pub struct MemoryReportPort {
    pub written: RefCell<Vec<(String, PathBuf, Vec<SessionRecord>)>>,
}

impl ReportPort for MemoryReportPort {
    fn write(
        &self,
        code: &str,
        records: &[SessionRecord],
        output_path: &Path,
    ) -> Result<(), VatraderError> {
        self.written.borrow_mut().push((
            code.to_string(),
            output_path.to_path_buf(),
            records.to_vec(),
        ));
        Ok(())
    }
}

/// Order client that rejects every call and counts the attempts.
#[derive(Debug, Default)]
pub struct RejectingOrderClient {
    pub calls: usize,
}

impl RejectingOrderClient {
    fn reject(&mut self, action: &'static str) -> Result<(), VatraderError> {
        self.calls += 1;
        Err(VatraderError::OrderClient {
            action,
            reason: "gateway offline".to_string(),
        })
    }
}

impl OrderClient for RejectingOrderClient {
    fn update_entry_order(&mut self, _side: Side, _price: f64) -> Result<(), VatraderError> {
        self.reject("update_entry_order")
    }

    fn cancel_entry_order(&mut self) -> Result<(), VatraderError> {
        self.reject("cancel_entry_order")
    }

    fn update_exit_limit(&mut self, _side: Side, _price: f64) -> Result<(), VatraderError> {
        self.reject("update_exit_limit")
    }

    fn update_exit_stop(&mut self, _side: Side, _price: f64) -> Result<(), VatraderError> {
        self.reject("update_exit_stop")
    }

    fn cancel_exit_orders(&mut self) -> Result<(), VatraderError> {
        self.reject("cancel_exit_orders")
    }

    fn close_all_positions(&mut self) -> Result<(), VatraderError> {
        self.reject("close_all_positions")
    }
}

pub fn recording_machine(config: MachineConfig) -> ValueAreaMachine<RecordingOrderClient> {
    ValueAreaMachine::new(RecordingOrderClient::new(), config)
}

/// Feeds one bar against the standard 100/110 band.
pub fn bar<C: OrderClient>(machine: &mut ValueAreaMachine<C>, open: f64, close: f64) {
    machine.evaluate(VAL, VAH, open, close).unwrap();
}

/// Drives a fresh machine into `target` using the standard band.
pub fn drive_to<C: OrderClient>(machine: &mut ValueAreaMachine<C>, target: MachineState) {
    use MachineState::*;

    machine.reset();
    match target {
        Idle => {}
        StalkingBelow => bar(machine, 95.0, 95.0),
        StalkingAbove => bar(machine, 115.0, 115.0),
        StalkingInside => bar(machine, 105.0, 105.0),
        ValueBuy => bar(machine, 95.0, 105.0),
        ValueSell => bar(machine, 115.0, 105.0),
        ValueBuyHold => {
            bar(machine, 95.0, 105.0);
            machine.order_filled().unwrap();
        }
        ValueSellHold => {
            bar(machine, 115.0, 105.0);
            machine.order_filled().unwrap();
        }
    }
    assert_eq!(machine.state(), target);
}

pub fn band_table(code: &str, dates: &[NaiveDate]) -> LevelTable {
    let mut table = LevelTable::new(code);
    for d in dates {
        table.insert(*d, ValueArea::new(VAL, VAH));
    }
    table
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn ts(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
    date.and_hms_opt(h, m, 0).unwrap()
}

pub fn bar_event(at: NaiveDateTime, open: f64, close: f64) -> SessionEvent {
    SessionEvent::Bar {
        timestamp: at,
        open,
        close,
    }
}

/// `ExitCode` has no `PartialEq`; compare through `Debug`.
pub fn is_success(code: ExitCode) -> bool {
    format!("{:?}", code) == format!("{:?}", ExitCode::SUCCESS)
}

pub fn same_exit(code: ExitCode, expected: u8) -> bool {
    format!("{:?}", code) == format!("{:?}", ExitCode::from(expected))
}
