//! Concrete adapter implementations for ports.

pub mod recording_order_client;
pub mod csv_adapter;
pub mod csv_report_adapter;
pub mod file_config_adapter;
