//! Machine states and trigger events.

use std::fmt;

/// Trading posture of the value-area machine. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MachineState {
    /// Flat, no orders, value area unknown or invalid.
    #[default]
    Idle,
    /// Flat, no orders, price above VAH.
    StalkingAbove,
    /// Flat, no orders, price below VAL.
    StalkingBelow,
    /// Flat, no orders, price inside the band.
    StalkingInside,
    /// Flat, resting a buy near VAL.
    ValueBuy,
    /// Long, managing exit orders.
    ValueBuyHold,
    /// Flat, resting a sell near VAH.
    ValueSell,
    /// Short, managing exit orders.
    ValueSellHold,
}

impl MachineState {
    pub const ALL: [MachineState; 8] = [
        MachineState::Idle,
        MachineState::StalkingAbove,
        MachineState::StalkingBelow,
        MachineState::StalkingInside,
        MachineState::ValueBuy,
        MachineState::ValueBuyHold,
        MachineState::ValueSell,
        MachineState::ValueSellHold,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MachineState::Idle => "idle",
            MachineState::StalkingAbove => "stalking_above",
            MachineState::StalkingBelow => "stalking_below",
            MachineState::StalkingInside => "stalking_inside",
            MachineState::ValueBuy => "value_buy",
            MachineState::ValueBuyHold => "value_buy_hold",
            MachineState::ValueSell => "value_sell",
            MachineState::ValueSellHold => "value_sell_hold",
        }
    }

    pub fn is_stalking(self) -> bool {
        matches!(
            self,
            MachineState::StalkingAbove | MachineState::StalkingBelow | MachineState::StalkingInside
        )
    }

    /// A position is open.
    pub fn is_holding(self) -> bool {
        matches!(self, MachineState::ValueBuyHold | MachineState::ValueSellHold)
    }

    /// An entry order is resting.
    pub fn is_entering(self) -> bool {
        matches!(self, MachineState::ValueBuy | MachineState::ValueSell)
    }

    /// The buy/sell mirror of this state.
    pub fn mirror(self) -> MachineState {
        match self {
            MachineState::Idle => MachineState::Idle,
            MachineState::StalkingAbove => MachineState::StalkingBelow,
            MachineState::StalkingBelow => MachineState::StalkingAbove,
            MachineState::StalkingInside => MachineState::StalkingInside,
            MachineState::ValueBuy => MachineState::ValueSell,
            MachineState::ValueBuyHold => MachineState::ValueSellHold,
            MachineState::ValueSell => MachineState::ValueBuy,
            MachineState::ValueSellHold => MachineState::ValueBuyHold,
        }
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Triggers accepted by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// A candle completed; inputs were refreshed.
    Next,
    /// The broker reported a fill on a placed order.
    OrderFilled,
    /// The broker reported a cancellation of a placed order.
    OrderCancelled,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Next => write!(f, "next"),
            Event::OrderFilled => write!(f, "order_filled"),
            Event::OrderCancelled => write!(f, "order_cancelled"),
        }
    }
}
