//! Session log writer: one CSV row per session event.

use crate::domain::error::VatraderError;
use crate::domain::session::SessionRecord;
use crate::ports::report_port::ReportPort;
use std::path::Path;

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    fn row(code: &str, record: &SessionRecord) -> [String; 6] {
        let intents: Vec<String> = record.intents.iter().map(|i| i.to_string()).collect();
        [
            code.to_string(),
            record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            record.step.event.to_string(),
            record.step.from.to_string(),
            record.step.to.to_string(),
            intents.join("; "),
        ]
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        code: &str,
        records: &[SessionRecord],
        output_path: &Path,
    ) -> Result<(), VatraderError> {
        let to_err = |e: csv::Error| VatraderError::Data {
            reason: format!("failed to write {}: {}", output_path.display(), e),
        };

        let mut wtr = csv::Writer::from_path(output_path).map_err(to_err)?;
        wtr.write_record(["code", "timestamp", "event", "from", "to", "intents"])
            .map_err(to_err)?;
        for record in records {
            wtr.write_record(Self::row(code, record)).map_err(to_err)?;
        }
        wtr.flush().map_err(|e| VatraderError::Data {
            reason: format!("failed to write {}: {}", output_path.display(), e),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::machine::Step;
    use crate::domain::state::{Event, MachineState};
    use crate::domain::transition::Action;
    use crate::domain::value_area::Side;
    use crate::ports::order_client::OrderIntent;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn record() -> SessionRecord {
        SessionRecord {
            timestamp: NaiveDate::from_ymd_opt(2017, 11, 21)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            step: Step {
                event: Event::OrderFilled,
                from: MachineState::ValueBuy,
                to: MachineState::ValueBuyHold,
                actions: vec![Action::UpdateClosingOrders],
            },
            intents: vec![
                OrderIntent::UpdateExitLimit {
                    side: Side::Sell,
                    price: 20.0,
                },
                OrderIntent::UpdateExitStop {
                    side: Side::Sell,
                    price: 9.9,
                },
            ],
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.csv");
        CsvReportAdapter.write("ESZ7", &[record()], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("code,timestamp,event,from,to,intents"));
        assert_eq!(
            lines.next(),
            Some("ESZ7,2017-11-21 09:30:00,order_filled,value_buy,value_buy_hold,exit limit sell @ 20; exit stop sell @ 9.9")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn unwritable_path_is_data_error() {
        let err = CsvReportAdapter
            .write("ESZ7", &[], Path::new("/nonexistent/dir/log.csv"))
            .unwrap_err();
        assert!(matches!(err, VatraderError::Data { .. }));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_flush_is_data_error() {
        let err = CsvReportAdapter
            .write("ESZ7", &[record()], Path::new("/dev/full"))
            .unwrap_err();
        assert!(matches!(err, VatraderError::Data { .. }));
    }
}
