use alloy_primitives::Address;

use crate::{
    price::{PriceSource, ValidatedPrice},
};

/// Oracle event.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleEvent {
    /// A token price has been set.
    OraclePriceUpdate {
        /// Token.
        token: Address,
        /// Min price.
        min_price: u128,
        /// Max price.
        max_price: u128,
        /// Source of the price.
        source: PriceSource,
    },
}

impl From<&ValidatedPrice> for OracleEvent {
    fn from(price: &ValidatedPrice) -> Self {
        Self::OraclePriceUpdate {
            token: price.token,
            min_price: price.price.min,
            max_price: price.price.max,
            source: price.source,
        }
    }
}

/// Event sink.
pub trait EventEmitter {
    /// Emit an event.
    fn emit(&mut self, event: OracleEvent);
}

impl<E: EventEmitter + ?Sized> EventEmitter for &mut E {
    fn emit(&mut self, event: OracleEvent) {
        (**self).emit(event)
    }
}

/// Event sink that records events in memory.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<OracleEvent>,
}

impl EventLog {
    /// Recorded events.
    pub fn events(&self) -> &[OracleEvent] {
        &self.events
    }

    /// Take the recorded events.
    pub fn take(&mut self) -> Vec<OracleEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventEmitter for EventLog {
    fn emit(&mut self, event: OracleEvent) {
        tracing::trace!(?event, "event emitted");
        self.events.push(event);
    }
}
