//! Transition table of the value-area machine.
//!
//! [`transition`] is pure: given the current state, the trigger, the guard
//! snapshot and the machine config it returns the destination plus the
//! actions to run before and after the state change. Guards are tried in
//! table order and the first full match wins. `None` means no rule matched
//! and the machine keeps its state without side effects.

use crate::domain::guard::Guards;
use crate::domain::machine::MachineConfig;
use crate::domain::state::{Event, MachineState};
use std::fmt;

/// Side effect attached to a transition, dispatched to the order client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Cancel entry, cancel exits, flatten.
    CloseAllPositionsAndOrders,
    UpdateEntryOrder,
    CancelEntryOrder,
    /// Place exit limit and exit stop for the open position.
    UpdateClosingOrders,
    CancelClosingOrders,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::CloseAllPositionsAndOrders => "close_all_positions_and_orders",
            Action::UpdateEntryOrder => "update_entry_order",
            Action::CancelEntryOrder => "cancel_entry_order",
            Action::UpdateClosingOrders => "update_closing_orders",
            Action::CancelClosingOrders => "cancel_closing_orders",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub to: MachineState,
    /// Runs while still in the source state.
    pub before: Option<Action>,
    /// Runs once the destination state is active.
    pub after: Option<Action>,
}

impl Transition {
    fn to(to: MachineState) -> Self {
        Self {
            to,
            before: None,
            after: None,
        }
    }

    fn before(mut self, action: Action) -> Self {
        self.before = Some(action);
        self
    }

    fn after(mut self, action: Action) -> Self {
        self.after = Some(action);
        self
    }
}

pub fn transition(
    state: MachineState,
    event: Event,
    guards: &Guards,
    config: &MachineConfig,
) -> Option<Transition> {
    match event {
        Event::Next => on_next(state, guards),
        Event::OrderFilled => on_order_filled(state, guards),
        Event::OrderCancelled => on_order_cancelled(state, guards, config),
    }
}

fn on_next(state: MachineState, g: &Guards) -> Option<Transition> {
    use MachineState::*;

    if g.value_area_invalid {
        return Some(Transition::to(Idle).before(Action::CloseAllPositionsAndOrders));
    }

    match state {
        Idle => {
            if g.close_below_val {
                Some(Transition::to(StalkingBelow))
            } else if g.close_above_vah {
                Some(Transition::to(StalkingAbove))
            } else if g.candle_inside() {
                Some(Transition::to(StalkingInside))
            } else if g.close_above_val && g.open_below_val {
                Some(Transition::to(ValueBuy).after(Action::UpdateEntryOrder))
            } else if g.close_below_vah && g.open_above_vah {
                Some(Transition::to(ValueSell).after(Action::UpdateEntryOrder))
            } else {
                None
            }
        }
        StalkingBelow => {
            if g.close_inside() {
                Some(Transition::to(ValueBuy).after(Action::UpdateEntryOrder))
            } else if g.close_above_vah {
                Some(Transition::to(StalkingAbove))
            } else {
                None
            }
        }
        StalkingAbove => {
            if g.close_inside() {
                Some(Transition::to(ValueSell).after(Action::UpdateEntryOrder))
            } else if g.close_below_val {
                Some(Transition::to(StalkingBelow))
            } else {
                None
            }
        }
        StalkingInside => {
            if g.close_below_val {
                Some(Transition::to(StalkingBelow))
            } else if g.close_above_vah {
                Some(Transition::to(StalkingAbove))
            } else {
                None
            }
        }
        ValueBuy => g
            .close_above_vah
            .then(|| Transition::to(StalkingAbove).before(Action::CancelEntryOrder)),
        ValueSell => g
            .close_below_val
            .then(|| Transition::to(StalkingBelow).before(Action::CancelEntryOrder)),
        ValueBuyHold | ValueSellHold => None,
    }
}

fn on_order_filled(state: MachineState, g: &Guards) -> Option<Transition> {
    use MachineState::*;

    match state {
        ValueBuy => Some(Transition::to(ValueBuyHold).after(Action::UpdateClosingOrders)),
        ValueSell => Some(Transition::to(ValueSellHold).after(Action::UpdateClosingOrders)),
        ValueBuyHold | ValueSellHold => {
            let to = if g.close_above_vah {
                StalkingAbove
            } else if g.close_inside() {
                StalkingInside
            } else if g.close_below_val {
                StalkingBelow
            } else {
                return None;
            };
            Some(Transition::to(to).before(Action::CancelClosingOrders))
        }
        Idle | StalkingAbove | StalkingBelow | StalkingInside => None,
    }
}

fn on_order_cancelled(
    state: MachineState,
    g: &Guards,
    config: &MachineConfig,
) -> Option<Transition> {
    use MachineState::*;

    match state {
        ValueBuy => {
            if g.close_below_val {
                Some(Transition::to(StalkingBelow))
            } else if g.close_inside() {
                Some(Transition::to(ValueBuy).after(Action::UpdateEntryOrder))
            } else {
                None
            }
        }
        ValueSell => {
            if g.close_above_vah {
                Some(Transition::to(StalkingAbove))
            } else if g.close_inside() {
                Some(Transition::to(ValueSell).after(Action::UpdateEntryOrder))
            } else {
                None
            }
        }
        ValueBuyHold | ValueSellHold if config.requote_on_hold_cancel => {
            Some(Transition::to(state).after(Action::UpdateEntryOrder))
        }
        _ => None,
    }
}

/// Whether `event` has any rule at all from `state`, independent of guards.
pub fn accepts(state: MachineState, event: Event, config: &MachineConfig) -> bool {
    use MachineState::*;

    match event {
        Event::Next => true,
        Event::OrderFilled => matches!(state, ValueBuy | ValueSell | ValueBuyHold | ValueSellHold),
        Event::OrderCancelled => match state {
            ValueBuy | ValueSell => true,
            ValueBuyHold | ValueSellHold => config.requote_on_hold_cancel,
            _ => false,
        },
    }
}
