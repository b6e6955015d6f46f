//! Order client port: the broker-facing capability the machine drives.
//!
//! Calls are fire-and-report intents. An implementation returns `Err` when
//! it could not accept the intent; the machine logs the error and carries on.

use crate::domain::error::VatraderError;
use crate::domain::value_area::Side;
use std::fmt;

pub trait OrderClient {
    fn update_entry_order(&mut self, side: Side, price: f64) -> Result<(), VatraderError>;

    fn cancel_entry_order(&mut self) -> Result<(), VatraderError>;

    fn update_exit_limit(&mut self, side: Side, price: f64) -> Result<(), VatraderError>;

    fn update_exit_stop(&mut self, side: Side, price: f64) -> Result<(), VatraderError>;

    fn cancel_exit_orders(&mut self) -> Result<(), VatraderError>;

    fn close_all_positions(&mut self) -> Result<(), VatraderError>;
}

/// An order client that keeps the intents it accepted, so a driver can
/// attach them to the event that produced them.
pub trait IntentLog {
    /// Returns the intents accepted since the last call and clears them.
    fn take_intents(&mut self) -> Vec<OrderIntent>;
}

/// Order client used when no broker is attached. Every call reports
/// `MissingCollaborator`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullOrderClient;

impl NullOrderClient {
    fn missing(action: &'static str) -> Result<(), VatraderError> {
        Err(VatraderError::MissingCollaborator { action })
    }
}

impl OrderClient for NullOrderClient {
    fn update_entry_order(&mut self, _side: Side, _price: f64) -> Result<(), VatraderError> {
        Self::missing("update_entry_order")
    }

    fn cancel_entry_order(&mut self) -> Result<(), VatraderError> {
        Self::missing("cancel_entry_order")
    }

    fn update_exit_limit(&mut self, _side: Side, _price: f64) -> Result<(), VatraderError> {
        Self::missing("update_exit_limit")
    }

    fn update_exit_stop(&mut self, _side: Side, _price: f64) -> Result<(), VatraderError> {
        Self::missing("update_exit_stop")
    }

    fn cancel_exit_orders(&mut self) -> Result<(), VatraderError> {
        Self::missing("cancel_exit_orders")
    }

    fn close_all_positions(&mut self) -> Result<(), VatraderError> {
        Self::missing("close_all_positions")
    }
}

/// One order client call, as a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderIntent {
    UpdateEntry { side: Side, price: f64 },
    CancelEntry,
    UpdateExitLimit { side: Side, price: f64 },
    UpdateExitStop { side: Side, price: f64 },
    CancelExits,
    CloseAllPositions,
}

impl fmt::Display for OrderIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderIntent::UpdateEntry { side, price } => write!(f, "entry {} @ {}", side, price),
            OrderIntent::CancelEntry => write!(f, "cancel entry"),
            OrderIntent::UpdateExitLimit { side, price } => {
                write!(f, "exit limit {} @ {}", side, price)
            }
            OrderIntent::UpdateExitStop { side, price } => {
                write!(f, "exit stop {} @ {}", side, price)
            }
            OrderIntent::CancelExits => write!(f, "cancel exits"),
            OrderIntent::CloseAllPositions => write!(f, "close all positions"),
        }
    }
}
