//! Kiosk event types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::gifts::GiftKind;

/// Events the kiosk reports through the backend's event log.
///
/// The event log is best effort: reporting failures are logged and
/// swallowed rather than interrupting the donor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KioskEvent {
    /// A charge was confirmed on the terminal.
    PaymentCompleted {
        payment_intent_id: String,
        amount_cents: i64,
        currency: String,
        payment_type: GiftKind,
        /// Backend status string of the payment intent at confirmation.
        status: String,
        /// Capture channel, always tap-to-pay on this hardware.
        method: String,
    },

    /// The terminal hardware was registered as a reader.
    DeviceRegistered {
        reader_id: String,
        device_type: String,
    },
}

impl KioskEvent {
    /// Creates a PaymentCompleted event for a tap-to-pay charge.
    pub fn payment_completed(
        payment_intent_id: String,
        amount_cents: i64,
        currency: String,
        payment_type: GiftKind,
        status: String,
    ) -> Self {
        Self::PaymentCompleted {
            payment_intent_id,
            amount_cents,
            currency,
            payment_type,
            status,
            method: "tap_to_pay".to_string(),
        }
    }

    /// Creates a DeviceRegistered event.
    pub fn device_registered(reader_id: String, device_type: String) -> Self {
        Self::DeviceRegistered {
            reader_id,
            device_type,
        }
    }

    /// Wire name used in the event log's `event_type` column.
    pub fn event_type(&self) -> &'static str {
        match self {
            KioskEvent::PaymentCompleted { .. } => "PAYMENT_COMPLETED",
            KioskEvent::DeviceRegistered { .. } => "DEVICE_REGISTERED",
        }
    }

    /// Flat attribute map for the event log payload.
    pub fn attributes(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut map)) => {
                map.remove("type");
                map
            }
            _ => Map::new(),
        }
    }
}
