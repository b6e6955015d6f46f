//! Session driver.
//!
//! Feeds a scripted sequence of bars and broker reports into one machine,
//! resolving each bar's value area from the level table by calendar date.
//! Fills and cancels are taken as given; nothing here decides whether an
//! order would have filled. The order client is injected and must keep an
//! [`IntentLog`] so each record carries the intents its event produced.

use crate::domain::error::VatraderError;
use crate::domain::levels::LevelTable;
use crate::domain::machine::{MachineConfig, Step, ValueAreaMachine};
use crate::domain::state::{Event, MachineState};
use crate::ports::order_client::{IntentLog, OrderClient, OrderIntent};
use chrono::NaiveDateTime;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    Bar {
        timestamp: NaiveDateTime,
        open: f64,
        close: f64,
    },
    Filled {
        timestamp: NaiveDateTime,
    },
    Cancelled {
        timestamp: NaiveDateTime,
    },
}

impl SessionEvent {
    pub fn timestamp(&self) -> NaiveDateTime {
        match *self {
            SessionEvent::Bar { timestamp, .. }
            | SessionEvent::Filled { timestamp }
            | SessionEvent::Cancelled { timestamp } => timestamp,
        }
    }

    pub fn event(&self) -> Event {
        match self {
            SessionEvent::Bar { .. } => Event::Next,
            SessionEvent::Filled { .. } => Event::OrderFilled,
            SessionEvent::Cancelled { .. } => Event::OrderCancelled,
        }
    }
}

/// What one session event did.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub timestamp: NaiveDateTime,
    pub step: Step,
    pub intents: Vec<OrderIntent>,
}

/// Summary counts over a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSummary {
    pub events: usize,
    pub transitions: usize,
    pub entries: usize,
    pub fills: usize,
    pub flattens: usize,
    pub intents: usize,
}

pub struct Session<C: OrderClient + IntentLog> {
    machine: ValueAreaMachine<C>,
    levels: LevelTable,
    records: Vec<SessionRecord>,
}

impl<C: OrderClient + IntentLog> Session<C> {
    pub fn new(levels: LevelTable, config: MachineConfig, client: C) -> Self {
        Self {
            machine: ValueAreaMachine::new(client, config),
            levels,
            records: Vec::new(),
        }
    }

    pub fn apply(&mut self, event: &SessionEvent) -> Result<&SessionRecord, VatraderError> {
        let step = match *event {
            SessionEvent::Bar {
                timestamp,
                open,
                close,
            } => {
                let va = self.levels.lookup(timestamp.date());
                self.machine.evaluate(va.val, va.vah, open, close)?
            }
            SessionEvent::Filled { .. } => self.machine.order_filled()?,
            SessionEvent::Cancelled { .. } => self.machine.order_cancelled()?,
        };

        if step.from != step.to {
            tracing::info!(
                code = %self.levels.code,
                timestamp = %event.timestamp(),
                from = %step.from,
                to = %step.to,
                "state changed"
            );
        }

        let intents = self.machine.client_mut().take_intents();
        self.records.push(SessionRecord {
            timestamp: event.timestamp(),
            step,
            intents,
        });
        Ok(&self.records[self.records.len() - 1])
    }

    /// Applies every event in order, stopping at the first hard failure.
    pub fn run(&mut self, events: &[SessionEvent]) -> Result<SessionSummary, VatraderError> {
        for event in events {
            self.apply(event)?;
        }
        Ok(self.summary())
    }

    pub fn state(&self) -> MachineState {
        self.machine.state()
    }

    pub fn machine(&self) -> &ValueAreaMachine<C> {
        &self.machine
    }

    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn code(&self) -> &str {
        &self.levels.code
    }

    pub fn summary(&self) -> SessionSummary {
        let mut s = SessionSummary {
            events: self.records.len(),
            ..SessionSummary::default()
        };
        for r in &self.records {
            if r.step.from != r.step.to {
                s.transitions += 1;
            }
            if r.step.to.is_entering() && r.step.from != r.step.to {
                s.entries += 1;
            }
            if r.step.to.is_holding() && !r.step.from.is_holding() {
                s.fills += 1;
            }
            if r.intents.contains(&OrderIntent::CloseAllPositions) {
                s.flattens += 1;
            }
            s.intents += r.intents.len();
        }
        s
    }
}
