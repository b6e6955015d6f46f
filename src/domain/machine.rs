//! Value-area state machine.
//!
//! Owns the trading posture for one instrument and drives an injected
//! [`OrderClient`] from the actions attached to each transition. Events run
//! to completion: guards, before-action, state change, after-action.
//!
//! Order client failures, missing prices on entry and actions requested from
//! an unexpected state are logged and absorbed. The one error that escapes is
//! an undefined exit target or stop after a fill, since an open position
//! without exit orders must not go unnoticed.

use crate::domain::error::VatraderError;
use crate::domain::guard::{BoundaryPolicy, Guards};
use crate::domain::state::{Event, MachineState};
use crate::domain::targets::{entry_quote, exit_orders};
use crate::domain::transition::{accepts, transition, Action};
use crate::domain::value_area::{Candle, ValueArea};
use crate::ports::order_client::{NullOrderClient, OrderClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MachineConfig {
    pub boundary: BoundaryPolicy,
    /// Re-run the entry update when a cancel is reported while holding.
    /// Entry quoting is only defined for entering states, so with the flag
    /// on the action is logged as unexpected and nothing is sent.
    pub requote_on_hold_cancel: bool,
}

/// Outcome of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub event: Event,
    pub from: MachineState,
    pub to: MachineState,
    /// Actions fired, in execution order.
    pub actions: Vec<Action>,
}

impl Step {
    /// True when a rule matched, including self-transitions.
    pub fn fired(&self) -> bool {
        self.from != self.to || !self.actions.is_empty()
    }
}

#[derive(Debug)]
pub struct ValueAreaMachine<C: OrderClient = NullOrderClient> {
    client: C,
    config: MachineConfig,
    state: MachineState,
    value_area: ValueArea,
    candle: Candle,
    target: Option<f64>,
    stop: Option<f64>,
}

impl ValueAreaMachine<NullOrderClient> {
    /// A machine whose actions are logged as `MissingCollaborator`.
    pub fn without_client(config: MachineConfig) -> Self {
        Self::new(NullOrderClient, config)
    }
}

impl<C: OrderClient> ValueAreaMachine<C> {
    pub fn new(client: C, config: MachineConfig) -> Self {
        let mut machine = Self {
            client,
            config,
            state: MachineState::Idle,
            value_area: ValueArea::UNDEFINED,
            candle: Candle::UNDEFINED,
            target: None,
            stop: None,
        };
        machine.reset();
        machine
    }

    /// Back to Idle with no cached inputs or targets. The order client is
    /// not told.
    pub fn reset(&mut self) {
        self.state = MachineState::Idle;
        self.value_area = ValueArea::UNDEFINED;
        self.candle = Candle::UNDEFINED;
        self.target = None;
        self.stop = None;
    }

    /// Caches the bar inputs and fires `next`.
    pub fn evaluate(
        &mut self,
        val: f64,
        vah: f64,
        open: f64,
        close: f64,
    ) -> Result<Step, VatraderError> {
        self.value_area = ValueArea::new(val, vah);
        self.candle = Candle::new(open, close);
        self.fire(Event::Next)
    }

    pub fn order_filled(&mut self) -> Result<Step, VatraderError> {
        self.fire(Event::OrderFilled)
    }

    pub fn order_cancelled(&mut self) -> Result<Step, VatraderError> {
        self.fire(Event::OrderCancelled)
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    pub fn value_area(&self) -> ValueArea {
        self.value_area
    }

    pub fn candle(&self) -> Candle {
        self.candle
    }

    /// Last derived entry or exit target.
    pub fn current_target(&self) -> Option<f64> {
        self.target
    }

    /// Last derived exit stop.
    pub fn current_stop(&self) -> Option<f64> {
        self.stop
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    fn fire(&mut self, event: Event) -> Result<Step, VatraderError> {
        let from = self.state;
        let guards = Guards::evaluate(&self.value_area, &self.candle, self.config.boundary);

        let Some(t) = transition(from, event, &guards, &self.config) else {
            if accepts(from, event, &self.config) {
                tracing::trace!(%event, state = %from, "no guard matched");
            } else {
                tracing::warn!(%event, state = %from, "event ignored in this state");
            }
            return Ok(Step {
                event,
                from,
                to: from,
                actions: Vec::new(),
            });
        };

        let mut actions = Vec::with_capacity(2);
        if let Some(action) = t.before {
            actions.push(action);
            self.run(action)?;
        }

        self.state = t.to;
        tracing::debug!(%event, %from, to = %t.to, "transition");

        if let Some(action) = t.after {
            actions.push(action);
            self.run(action)?;
        }

        Ok(Step {
            event,
            from,
            to: t.to,
            actions,
        })
    }

    fn run(&mut self, action: Action) -> Result<(), VatraderError> {
        match action {
            Action::CloseAllPositionsAndOrders => {
                self.dispatch("cancel_entry_order", |c| c.cancel_entry_order());
                self.dispatch("cancel_exit_orders", |c| c.cancel_exit_orders());
                self.dispatch("close_all_positions", |c| c.close_all_positions());
            }
            Action::UpdateEntryOrder => match entry_quote(self.state, &self.value_area) {
                Ok(quote) => {
                    self.target = Some(quote.price);
                    self.dispatch("update_entry_order", |c| {
                        c.update_entry_order(quote.side, quote.price)
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, state = %self.state, "entry order not sent");
                }
            },
            Action::CancelEntryOrder => {
                self.dispatch("cancel_entry_order", |c| c.cancel_entry_order());
            }
            Action::UpdateClosingOrders => match exit_orders(self.state, &self.value_area) {
                Ok(exits) => {
                    self.target = Some(exits.target);
                    self.stop = Some(exits.stop);
                    self.dispatch("update_exit_limit", |c| {
                        c.update_exit_limit(exits.side, exits.target)
                    });
                    self.dispatch("update_exit_stop", |c| {
                        c.update_exit_stop(exits.side, exits.stop)
                    });
                }
                Err(e @ VatraderError::InvalidExitTarget { .. }) => return Err(e),
                Err(e) => {
                    tracing::error!(error = %e, state = %self.state, "closing orders not sent");
                }
            },
            Action::CancelClosingOrders => {
                self.dispatch("cancel_exit_orders", |c| c.cancel_exit_orders());
            }
        }
        Ok(())
    }

    fn dispatch<F>(&mut self, call: &'static str, f: F)
    where
        F: FnOnce(&mut C) -> Result<(), VatraderError>,
    {
        if let Err(e) = f(&mut self.client) {
            tracing::error!(call, error = %e, state = %self.state, "order client call failed");
        }
    }
}
