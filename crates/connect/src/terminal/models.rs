//! Reader-side models.

/// A card reader discovered near the kiosk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reader {
    pub serial_number: String,
    pub label: Option<String>,
    pub device_type: String,
}

/// Lifecycle of a card-present intent on the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalIntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    Processing,
    Succeeded,
    Canceled,
}

impl TerminalIntentStatus {
    /// Processor-style status string, as reported in the event log.
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminalIntentStatus::RequiresPaymentMethod => "requires_payment_method",
            TerminalIntentStatus::RequiresConfirmation => "requires_confirmation",
            TerminalIntentStatus::Processing => "processing",
            TerminalIntentStatus::Succeeded => "succeeded",
            TerminalIntentStatus::Canceled => "canceled",
        }
    }
}

impl std::fmt::Display for TerminalIntentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The reader's view of a payment intent, keyed by client secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalIntent {
    pub id: String,
    pub client_secret: String,
    pub status: TerminalIntentStatus,
}
