//! Screen flow state machine.
//!
//! The kiosk walks one donor at a time through a fixed sequence of
//! screens. [`FlowState`] owns the current position and rejects edges the
//! kiosk never presents, so a buggy caller cannot land on the payment
//! screen without a donor and a gift behind it. Data-level guards (is a
//! donor recorded, is a gift selected) belong to the flow service; this
//! type only knows the topology.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::gifts::GiftKind;

/// Screens in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowStep {
    #[default]
    Login,
    Campaign,
    Donor,
    Gift,
    Verify,
    Payment,
    Comms,
    Signature,
    Done,
}

impl FlowStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowStep::Login => "LOGIN",
            FlowStep::Campaign => "CAMPAIGN",
            FlowStep::Donor => "DONOR",
            FlowStep::Gift => "GIFT",
            FlowStep::Verify => "VERIFY",
            FlowStep::Payment => "PAYMENT",
            FlowStep::Comms => "COMMS",
            FlowStep::Signature => "SIGNATURE",
            FlowStep::Done => "DONE",
        }
    }
}

impl std::fmt::Display for FlowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the comms screen leads: recurring gifts sign terms first,
/// one-time gifts finish immediately.
pub fn after_comms(kind: GiftKind) -> FlowStep {
    match kind {
        GiftKind::Recurring => FlowStep::Signature,
        GiftKind::OneTime => FlowStep::Done,
    }
}

/// Tracks the current screen and enforces the kiosk's forward path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowState {
    step: FlowStep,
}

impl FlowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> FlowStep {
        self.step
    }

    /// Moves forward along a legal edge.
    ///
    /// `Done -> Campaign` is the next-donor loop; every other edge is a
    /// single forward hop.
    pub fn advance_to(&mut self, next: FlowStep) -> Result<()> {
        let legal = matches!(
            (self.step, next),
            (FlowStep::Login, FlowStep::Campaign)
                | (FlowStep::Campaign, FlowStep::Donor)
                | (FlowStep::Donor, FlowStep::Gift)
                | (FlowStep::Gift, FlowStep::Verify)
                | (FlowStep::Verify, FlowStep::Payment)
                | (FlowStep::Payment, FlowStep::Comms)
                | (FlowStep::Comms, FlowStep::Signature)
                | (FlowStep::Comms, FlowStep::Done)
                | (FlowStep::Signature, FlowStep::Done)
                | (FlowStep::Done, FlowStep::Campaign)
        );
        if !legal {
            return Err(Error::Rule(format!(
                "Cannot move from {} to {}",
                self.step, next
            )));
        }
        self.step = next;
        Ok(())
    }

    /// One screen back, limited to the back edges the kiosk offers.
    /// Backing out of Verify abandons the pending confirmation and
    /// returns to the donor form.
    pub fn back(&mut self) -> Result<()> {
        let previous = match self.step {
            FlowStep::Donor => FlowStep::Campaign,
            FlowStep::Gift => FlowStep::Donor,
            FlowStep::Verify => FlowStep::Donor,
            FlowStep::Payment => FlowStep::Gift,
            step => {
                return Err(Error::Rule(format!("No back navigation from {step}")));
            }
        };
        self.step = previous;
        Ok(())
    }
}
