//! Caller-facing inputs for the flow service.

/// What the donor picked on the gift screen, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GiftChoice {
    /// Monthly gift at a preset amount. `None` takes the campaign's
    /// first preset.
    Monthly { amount_cents: Option<i64> },
    /// One-time gift typed in major units on the keypad.
    OneTime { amount_text: String },
}
