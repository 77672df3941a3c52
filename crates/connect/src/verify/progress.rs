//! Status notes shown while waiting on the donor's text reply.

/// Trait for surfacing verification status on the kiosk screen.
pub trait VerifyStatusSink: Send + Sync {
    /// Show a short status note to the fundraiser.
    fn note(&self, message: &str);
}

/// A no-op sink for contexts where nothing is watching.
#[derive(Debug, Clone, Default)]
pub struct NoOpStatusSink;

impl VerifyStatusSink for NoOpStatusSink {
    fn note(&self, _message: &str) {
        // No-op
    }
}
