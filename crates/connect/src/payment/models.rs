//! Models for terminal payment runs.

use serde::{Deserialize, Serialize};

use pledgepoint_core::gifts::SelectedGift;

/// Everything the orchestrator needs to take one payment.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub session_id: String,
    pub donor_id: String,
    pub gift: SelectedGift,
}

/// Terminal payment outcome reported back to the screen flow.
///
/// A recurring gift that charges but fails subscription setup comes back
/// as `Failed`; the charge itself is not reversed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum PaymentOutcome {
    Completed {
        payment_intent_id: String,
        subscription_id: Option<String>,
    },
    Failed {
        reason: String,
    },
}

impl PaymentOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, PaymentOutcome::Completed { .. })
    }
}
