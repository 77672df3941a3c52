//! Polls the backend for the donor's SMS reply.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use super::progress::VerifyStatusSink;
use crate::api::KioskBackend;
use pledgepoint_core::constants::SMS_POLL_INTERVAL_MS;

/// What the donor texted back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyDecision {
    /// Donor replied YES; go ahead and take payment.
    Confirmed,
    /// Donor replied NO; drop back to the donor step.
    Declined,
}

/// Polls SMS reply status until the donor decides.
///
/// The loop has no timeout of its own; callers cancel by dropping the
/// future, which is how the screen flow abandons an unanswered text.
pub struct VerifyPoller {
    backend: Arc<dyn KioskBackend>,
    sink: Arc<dyn VerifyStatusSink>,
    interval: Duration,
}

impl VerifyPoller {
    pub fn new(backend: Arc<dyn KioskBackend>, sink: Arc<dyn VerifyStatusSink>) -> Self {
        Self {
            backend,
            sink,
            interval: Duration::from_millis(SMS_POLL_INTERVAL_MS),
        }
    }

    /// Override the poll interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Wait for the donor's reply to the verification text.
    ///
    /// Polls immediately, then every interval. A poll that errors is
    /// noted on screen and retried; an absent or unrecognized reply
    /// keeps waiting.
    pub async fn await_reply(&self, session_id: &str, donor_id: &str) -> VerifyDecision {
        self.sink.note("Text sent. Waiting for donor reply…");
        loop {
            match self.backend.verification_status(session_id, donor_id).await {
                Ok(status) => {
                    let result = status.result.as_deref().unwrap_or("PENDING").to_uppercase();
                    debug!("[SmsVerify] Reply status for {}: {}", session_id, result);
                    match result.as_str() {
                        "YES" => {
                            self.sink.note("Donor confirmed ✅");
                            return VerifyDecision::Confirmed;
                        }
                        "NO" => {
                            self.sink.note("Donor declined ❌");
                            return VerifyDecision::Declined;
                        }
                        _ => {
                            // Still pending.
                        }
                    }
                }
                Err(e) => {
                    warn!("[SmsVerify] Status check failed: {}", e);
                    self.sink.note(&format!("Error checking status: {}", e));
                }
            }
            tokio::time::sleep(self.interval).await;
        }
    }
}
