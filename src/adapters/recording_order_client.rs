//! In-memory order client that records every intent it receives.

use crate::domain::error::VatraderError;
use crate::domain::value_area::Side;
use crate::ports::order_client::{IntentLog, OrderClient, OrderIntent};

#[derive(Debug, Clone, Default)]
pub struct RecordingOrderClient {
    intents: Vec<OrderIntent>,
}

impl RecordingOrderClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intents(&self) -> &[OrderIntent] {
        &self.intents
    }

    fn record(&mut self, intent: OrderIntent) -> Result<(), VatraderError> {
        tracing::info!(%intent, "order intent");
        self.intents.push(intent);
        Ok(())
    }
}

impl IntentLog for RecordingOrderClient {
    fn take_intents(&mut self) -> Vec<OrderIntent> {
        std::mem::take(&mut self.intents)
    }
}

impl OrderClient for RecordingOrderClient {
    fn update_entry_order(&mut self, side: Side, price: f64) -> Result<(), VatraderError> {
        self.record(OrderIntent::UpdateEntry { side, price })
    }

    fn cancel_entry_order(&mut self) -> Result<(), VatraderError> {
        self.record(OrderIntent::CancelEntry)
    }

    fn update_exit_limit(&mut self, side: Side, price: f64) -> Result<(), VatraderError> {
        self.record(OrderIntent::UpdateExitLimit { side, price })
    }

    fn update_exit_stop(&mut self, side: Side, price: f64) -> Result<(), VatraderError> {
        self.record(OrderIntent::UpdateExitStop { side, price })
    }

    fn cancel_exit_orders(&mut self) -> Result<(), VatraderError> {
        self.record(OrderIntent::CancelExits)
    }

    fn close_all_positions(&mut self) -> Result<(), VatraderError> {
        self.record(OrderIntent::CloseAllPositions)
    }
}
