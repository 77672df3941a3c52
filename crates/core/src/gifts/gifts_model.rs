//! Gift selection models.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::utils::{format_minor_units, text_to_minor_units};

/// How the donor wants to give.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GiftKind {
    /// Monthly recurring gift backed by a catalog price.
    #[default]
    #[serde(rename = "MONTHLY")]
    Recurring,
    /// Single on-the-spot gift.
    #[serde(rename = "OTG")]
    OneTime,
}

impl GiftKind {
    /// Wire name used by the SMS and event payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            GiftKind::Recurring => "MONTHLY",
            GiftKind::OneTime => "OTG",
        }
    }
}

impl std::fmt::Display for GiftKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The gift the donor committed to on the gift screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedGift {
    pub kind: GiftKind,
    /// Amount in minor units.
    pub amount_cents: i64,
    /// Uppercase ISO currency code, inherited from the campaign.
    pub currency: String,
    /// Catalog price backing a recurring gift, resolved at selection time.
    pub price_id: Option<String>,
    pub product_id: Option<String>,
}

impl SelectedGift {
    /// A recurring gift at the chosen preset amount.
    pub fn recurring(amount_cents: i64, currency: &str) -> Self {
        Self {
            kind: GiftKind::Recurring,
            amount_cents,
            currency: currency.to_string(),
            price_id: None,
            product_id: None,
        }
    }

    /// A one-time gift parsed from keypad text.
    ///
    /// Fails when the text does not parse as an amount or the amount is
    /// under the campaign minimum.
    pub fn one_time_from_text(text: &str, min_amount_cents: i64, currency: &str) -> Result<Self> {
        let amount_cents = text_to_minor_units(text).ok_or_else(|| {
            Error::Validation(ValidationError::InvalidInput(
                "Enter a valid one-time amount.".to_string(),
            ))
        })?;
        if amount_cents < min_amount_cents {
            return Err(Error::Rule(format!(
                "Minimum one-time is {}.",
                format_minor_units(min_amount_cents, currency)
            )));
        }
        Ok(Self {
            kind: GiftKind::OneTime,
            amount_cents,
            currency: currency.to_string(),
            price_id: None,
            product_id: None,
        })
    }
}
