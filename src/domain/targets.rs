//! Entry and exit price derivation.
//!
//! Entry quotes sit on the band edge the price is expected to return from:
//! buys at VAL, sells at VAH. Exits target the opposite edge with a stop a
//! fixed 1% beyond the entry edge.

use crate::domain::error::VatraderError;
use crate::domain::state::MachineState;
use crate::domain::value_area::{Side, ValueArea};

/// Long stop multiplier applied to VAL.
pub const LONG_STOP_FACTOR: f64 = 0.99;
/// Short stop multiplier applied to VAH.
pub const SHORT_STOP_FACTOR: f64 = 1.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryQuote {
    pub side: Side,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitOrders {
    pub side: Side,
    pub target: f64,
    pub stop: f64,
}

/// Entry quote for the resting order of an entering state.
///
/// An undefined price yields `InvalidEntryTarget`, which callers treat as a
/// skip rather than a failure.
pub fn entry_quote(state: MachineState, va: &ValueArea) -> Result<EntryQuote, VatraderError> {
    let (side, price) = match state {
        MachineState::ValueBuy => (Side::Buy, va.val),
        MachineState::ValueSell => (Side::Sell, va.vah),
        _ => {
            return Err(VatraderError::UnexpectedActionState {
                action: "update_entry_order",
                state,
            });
        }
    };
    if price.is_nan() {
        return Err(VatraderError::InvalidEntryTarget { side });
    }
    Ok(EntryQuote { side, price })
}

/// Exit limit and stop for the position held in `state`.
pub fn exit_orders(state: MachineState, va: &ValueArea) -> Result<ExitOrders, VatraderError> {
    let (side, target, stop) = match state {
        MachineState::ValueBuyHold => (Side::Sell, va.vah, va.val * LONG_STOP_FACTOR),
        MachineState::ValueSellHold => (Side::Buy, va.val, va.vah * SHORT_STOP_FACTOR),
        _ => {
            return Err(VatraderError::UnexpectedActionState {
                action: "update_closing_orders",
                state,
            });
        }
    };
    if target.is_nan() || stop.is_nan() {
        return Err(VatraderError::InvalidExitTarget {
            state,
            target,
            stop,
        });
    }
    Ok(ExitOrders { side, target, stop })
}
