//! Trait defining the contract with the card reader.

use async_trait::async_trait;

use super::models::{Reader, TerminalIntent};
use pledgepoint_core::errors::Result;

/// Source of short-lived reader session tokens.
///
/// Real reader SDKs call this whenever their session needs a fresh
/// token; [`crate::client::KioskApiClient`] implements it against
/// `POST /terminal/connection_token`. The in-memory simulator has no
/// session to authorize and never asks.
#[async_trait]
pub trait ConnectionTokenProvider: Send + Sync {
    /// Fetch a fresh connection token secret.
    async fn fetch_connection_token(&self) -> Result<String>;
}

/// Trait for driving the physical card reader.
///
/// Mirrors the reader SDK lifecycle: discover nearby readers, connect
/// one at a terminal location, then walk a payment intent through
/// retrieve, collect, and confirm.
#[async_trait]
pub trait TerminalConnector: Send + Sync {
    /// Discover readers near the kiosk.
    async fn discover_readers(&self) -> Result<Vec<Reader>>;

    /// Connect a discovered reader at the given terminal location.
    async fn connect_reader(&self, reader: &Reader, location_id: &str) -> Result<Reader>;

    /// The reader currently connected, if any.
    async fn connected_reader(&self) -> Option<Reader>;

    /// Fetch the reader-side view of an intent by its client secret.
    async fn retrieve_payment_intent(&self, client_secret: &str) -> Result<TerminalIntent>;

    /// Wait for the tap and collect a payment method onto the intent.
    async fn collect_payment_method(&self, intent: &TerminalIntent) -> Result<TerminalIntent>;

    /// Confirm the collected intent, capturing the charge.
    async fn confirm_payment_intent(&self, intent: &TerminalIntent) -> Result<TerminalIntent>;
}
