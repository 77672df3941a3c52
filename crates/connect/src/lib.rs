//! PledgePoint Connect - Backend and terminal plumbing for the kiosk.
//!
//! This crate owns everything that talks to the outside world: the HTTP
//! client for the donation backend, the card reader seam, the tap-to-pay
//! orchestration, the SMS verification poller, and the flow service that
//! drives one donor at a time through the kiosk screens.

pub mod api;
pub mod client;
pub mod kiosk;
pub mod payment;
pub mod terminal;
pub mod verify;

// Re-export commonly used types
pub use api::KioskBackend;
pub use client::KioskApiClient;
pub use kiosk::KioskFlow;
pub use payment::{PaymentOrchestrator, PaymentOutcome, PaymentRequest};
pub use terminal::TerminalConnector;
pub use verify::{VerifyDecision, VerifyPoller};
