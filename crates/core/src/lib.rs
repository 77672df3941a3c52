//! PledgePoint Core - Domain entities, validation, and workflow state.
//!
//! This crate contains the kiosk-side business logic for PledgePoint.
//! It is transport-agnostic: the backend client and the payment terminal
//! integration live in the `connect` crate.

pub mod campaigns;
pub mod constants;
pub mod donors;
pub mod errors;
pub mod events;
pub mod flow;
pub mod gifts;
pub mod session;
pub mod utils;

// Re-export common types
pub use campaigns::CampaignConfig;
pub use session::Session;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
