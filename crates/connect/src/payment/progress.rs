//! Progress reporting for terminal payments.
//!
//! The orchestrator runs several slow steps back to back; screens
//! implement the reporter to keep the donor informed between them.

use serde::{Deserialize, Serialize};

use super::models::PaymentOutcome;

/// Stage of a terminal payment, in the order the orchestrator runs them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStage {
    /// Looking for a reader to take the tap.
    DiscoveringReaders,
    /// Connecting the reader at its terminal location.
    ConnectingReader,
    /// Creating the card-present payment intent.
    CreatingIntent,
    /// Reader is live and waiting for the donor to tap.
    WaitingForTap,
    /// Confirming the collected payment.
    Confirming,
    /// Setting up the recurring subscription after the charge.
    StartingSubscription,
}

impl std::fmt::Display for PaymentStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStage::DiscoveringReaders => write!(f, "discovering_readers"),
            PaymentStage::ConnectingReader => write!(f, "connecting_reader"),
            PaymentStage::CreatingIntent => write!(f, "creating_intent"),
            PaymentStage::WaitingForTap => write!(f, "waiting_for_tap"),
            PaymentStage::Confirming => write!(f, "confirming"),
            PaymentStage::StartingSubscription => write!(f, "starting_subscription"),
        }
    }
}

/// Trait for reporting payment progress.
///
/// Implementations can surface stages on whatever screen is attached.
pub trait PaymentProgressReporter: Send + Sync {
    /// Report that the payment reached a new stage.
    fn report_stage(&self, stage: PaymentStage);

    /// Report the final outcome (completed or failed).
    fn report_outcome(&self, outcome: &PaymentOutcome);
}

/// A no-op reporter for contexts where nothing is watching.
#[derive(Debug, Clone, Default)]
pub struct NoOpProgressReporter;

impl PaymentProgressReporter for NoOpProgressReporter {
    fn report_stage(&self, _stage: PaymentStage) {
        // No-op
    }

    fn report_outcome(&self, _outcome: &PaymentOutcome) {
        // No-op
    }
}
