//! Domain error types.

use crate::domain::state::MachineState;
use crate::domain::value_area::Side;

/// Top-level error type for vatrader.
#[derive(Debug, thiserror::Error)]
pub enum VatraderError {
    #[error("{action} called without an order client")]
    MissingCollaborator { action: &'static str },

    #[error("{side} entry order requested with undefined target price")]
    InvalidEntryTarget { side: Side },

    #[error("closing orders requested in {state} with undefined prices (target {target}, stop {stop})")]
    InvalidExitTarget {
        state: MachineState,
        target: f64,
        stop: f64,
    },

    #[error("{action} requested during invalid state: {state}")]
    UnexpectedActionState {
        action: &'static str,
        state: MachineState,
    },

    #[error("order client rejected {action}: {reason}")]
    OrderClient { action: &'static str, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {code}")]
    NoData { code: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&VatraderError> for std::process::ExitCode {
    fn from(err: &VatraderError) -> Self {
        let code: u8 = match err {
            VatraderError::Io(_) => 1,
            VatraderError::ConfigParse { .. }
            | VatraderError::ConfigMissing { .. }
            | VatraderError::ConfigInvalid { .. } => 2,
            VatraderError::Data { .. } | VatraderError::NoData { .. } => 3,
            VatraderError::MissingCollaborator { .. }
            | VatraderError::InvalidEntryTarget { .. }
            | VatraderError::InvalidExitTarget { .. }
            | VatraderError::UnexpectedActionState { .. }
            | VatraderError::OrderClient { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
