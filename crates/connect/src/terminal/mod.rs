//! Terminal module - the card reader seam.
//!
//! The orchestrator only ever talks to [`TerminalConnector`]; hardware
//! SDKs and the in-memory simulator plug in behind it.

mod models;
mod traits;

#[cfg(feature = "simulated-terminal")]
mod simulated;

pub use models::{Reader, TerminalIntent, TerminalIntentStatus};
pub use traits::{ConnectionTokenProvider, TerminalConnector};

#[cfg(feature = "simulated-terminal")]
pub use simulated::SimulatedTerminal;
