//! Campaign domain models.
//!
//! The login response carries the campaign block as loosely typed JSON:
//! key casing varies by deployment (warehouse exports use
//! SCREAMING_SNAKE_CASE, newer backends use snake_case) and amounts are
//! denominated in major units as numbers, numeric strings, or a single
//! bracketed string. Everything here normalizes that into minor units.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::{
    DEFAULT_CURRENCY, DEFAULT_MIN_ONE_TIME_CENTS, DEFAULT_PRESET_AMOUNTS_CENTS,
};

/// A major-unit amount that may arrive as a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawAmount {
    /// Converts to minor units, truncating sub-cent precision.
    /// Returns `None` for values that do not parse as a number.
    pub fn to_minor_units(&self) -> Option<i64> {
        let major = match self {
            RawAmount::Int(v) => Decimal::from(*v),
            RawAmount::Float(v) => Decimal::from_f64(*v)?,
            RawAmount::Text(s) => Decimal::from_str(s.trim()).ok()?,
        };
        (major * Decimal::ONE_HUNDRED).trunc().to_i64()
    }
}

/// Preset amounts as delivered by the backend.
///
/// Either a JSON array of [`RawAmount`]s or a single string such as
/// `"[20, 30, 40]"` or `"20;30;40"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawAmountList {
    List(Vec<RawAmount>),
    Text(String),
}

impl RawAmountList {
    /// Converts every parseable entry to minor units; malformed entries
    /// are skipped rather than failing the whole list.
    pub fn to_minor_units(&self) -> Vec<i64> {
        match self {
            RawAmountList::List(items) => {
                items.iter().filter_map(RawAmount::to_minor_units).collect()
            }
            RawAmountList::Text(text) => {
                let trimmed = text.trim();
                let trimmed = trimmed.strip_prefix('[').unwrap_or(trimmed);
                let inner = trimmed.strip_suffix(']').unwrap_or(trimmed);
                inner
                    .split(|c| c == ',' || c == ';')
                    .filter_map(|part| {
                        RawAmount::Text(part.to_string()).to_minor_units()
                    })
                    .collect()
            }
        }
    }
}

/// Campaign block of the login response, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignPayload {
    #[serde(default, alias = "CAMPAIGN_ID")]
    pub campaign_id: Option<String>,
    #[serde(default, alias = "NAME")]
    pub name: Option<String>,
    #[serde(default, alias = "CURRENCY")]
    pub currency: Option<String>,
    #[serde(default, alias = "PRESET_AMOUNTS")]
    pub preset_amounts: Option<RawAmountList>,
    #[serde(default, alias = "MIN_AMOUNT")]
    pub min_amount: Option<RawAmount>,
}

/// Donation parameters for the active campaign, normalized to minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignConfig {
    pub campaign_id: Option<String>,
    pub name: Option<String>,
    /// Uppercase ISO currency code.
    pub currency: String,
    /// Monthly preset amounts in minor units, ascending and deduplicated.
    /// Never empty: an empty or absent list falls back to the defaults.
    pub preset_amounts: Vec<i64>,
    /// Minimum one-time gift in minor units.
    pub min_amount_cents: i64,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            campaign_id: None,
            name: None,
            currency: DEFAULT_CURRENCY.to_string(),
            preset_amounts: DEFAULT_PRESET_AMOUNTS_CENTS.to_vec(),
            min_amount_cents: DEFAULT_MIN_ONE_TIME_CENTS,
        }
    }
}

impl CampaignConfig {
    /// Normalizes a login payload into a usable config.
    ///
    /// Fallback rules: a missing or blank currency becomes the default and
    /// is always uppercased; presets that end up empty after parsing fall
    /// back to the default ladder; an unparseable minimum falls back to
    /// the default floor.
    pub fn from_payload(payload: &CampaignPayload) -> Self {
        let currency = payload
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CURRENCY)
            .to_uppercase();

        let mut presets: Vec<i64> = payload
            .preset_amounts
            .as_ref()
            .map(RawAmountList::to_minor_units)
            .unwrap_or_default();
        presets.sort_unstable();
        presets.dedup();
        if presets.is_empty() {
            presets = DEFAULT_PRESET_AMOUNTS_CENTS.to_vec();
        }

        let min_amount_cents = payload
            .min_amount
            .as_ref()
            .and_then(RawAmount::to_minor_units)
            .unwrap_or(DEFAULT_MIN_ONE_TIME_CENTS);

        Self {
            campaign_id: payload.campaign_id.clone(),
            name: payload.name.clone(),
            currency,
            preset_amounts: presets,
            min_amount_cents,
        }
    }

    /// The preset selected by default on the gift screen.
    pub fn default_preset(&self) -> i64 {
        self.preset_amounts
            .first()
            .copied()
            .unwrap_or(DEFAULT_PRESET_AMOUNTS_CENTS[0])
    }
}
