//! Configuration validation and construction.
//!
//! `[machine]` holds the machine policies, `[session]` the instrument and
//! file locations for a replay.

use crate::domain::error::VatraderError;
use crate::domain::guard::BoundaryPolicy;
use crate::domain::machine::MachineConfig;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub code: String,
    pub data_dir: PathBuf,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub output: Option<PathBuf>,
}

pub fn validate_machine_config(config: &dyn ConfigPort) -> Result<(), VatraderError> {
    build_machine_config(config).map(|_| ())
}

pub fn validate_session_config(config: &dyn ConfigPort) -> Result<(), VatraderError> {
    resolve_session_config(config, None).map(|_| ())
}

/// `[session]` config with `code_override` taking precedence over the
/// file's `code`, checked for a well-ordered date range.
pub fn resolve_session_config(
    config: &dyn ConfigPort,
    code_override: Option<&str>,
) -> Result<SessionConfig, VatraderError> {
    let session = session_config(config, code_override)?;
    if let (Some(start), Some(end)) = (session.start_date, session.end_date) {
        if start > end {
            return Err(VatraderError::ConfigInvalid {
                section: "session".to_string(),
                key: "start_date".to_string(),
                reason: "start_date must not be after end_date".to_string(),
            });
        }
    }
    Ok(session)
}

pub fn build_machine_config(config: &dyn ConfigPort) -> Result<MachineConfig, VatraderError> {
    let boundary = match config.get_string("machine", "boundary") {
        None => BoundaryPolicy::default(),
        Some(s) => s
            .parse::<BoundaryPolicy>()
            .map_err(|reason| VatraderError::ConfigInvalid {
                section: "machine".to_string(),
                key: "boundary".to_string(),
                reason,
            })?,
    };
    Ok(MachineConfig {
        boundary,
        requote_on_hold_cancel: config.get_bool("machine", "requote_on_hold_cancel", false)?,
    })
}

pub fn build_session_config(config: &dyn ConfigPort) -> Result<SessionConfig, VatraderError> {
    session_config(config, None)
}

fn session_config(
    config: &dyn ConfigPort,
    code_override: Option<&str>,
) -> Result<SessionConfig, VatraderError> {
    let code = match code_override {
        Some(code) => code.trim().to_uppercase(),
        None => config.require_string("session", "code")?.to_uppercase(),
    };
    let data_dir = config
        .get_string("session", "data_dir")
        .filter(|s| !s.trim().is_empty())
        .map(|s| PathBuf::from(s.trim()))
        .unwrap_or_else(|| PathBuf::from("."));

    Ok(SessionConfig {
        code,
        data_dir,
        start_date: optional_date(config, "start_date")?,
        end_date: optional_date(config, "end_date")?,
        output: config
            .get_string("session", "output")
            .filter(|s| !s.trim().is_empty())
            .map(|s| PathBuf::from(s.trim())),
    })
}

fn optional_date(config: &dyn ConfigPort, key: &str) -> Result<Option<NaiveDate>, VatraderError> {
    match config.get_string("session", key) {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| VatraderError::ConfigInvalid {
                section: "session".to_string(),
                key: key.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", key),
            }),
    }
}
