//! Wire types for the donation backend API.
//!
//! Field names match the backend's snake_case JSON exactly. Amounts are
//! minor units end to end; only the campaign block of the login response
//! carries major units, and `pledgepoint-core` normalizes those.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use pledgepoint_core::campaigns::CampaignPayload;
use pledgepoint_core::donors::DonorProfile;
use pledgepoint_core::events::KioskEvent;
use pledgepoint_core::gifts::GiftKind;
use pledgepoint_core::session::{CharityPayload, FundraiserPayload};

// ─────────────────────────────────────────────────────────────────────────────
// Login
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct FundraiserLoginIn {
    pub fundraiser_id: String,
}

/// Login response. The nested blocks are loosely typed on the wire;
/// the session model normalizes them.
#[derive(Debug, Clone, Deserialize)]
pub struct FundraiserLoginOut {
    pub session_id: String,
    pub fundraiser: FundraiserPayload,
    #[serde(default)]
    pub charity: Option<CharityPayload>,
    #[serde(default)]
    pub campaign: Option<CampaignPayload>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Donor
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct DonorUpsertIn {
    pub title: Option<String>,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub dob_iso: String,
    pub mobile_e164: String,
    pub email: String,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
    pub fundraiser_id: String,
    pub session_id: String,
}

impl DonorUpsertIn {
    /// Maps a validated profile onto the upsert payload.
    pub fn from_profile(profile: &DonorProfile, fundraiser_id: &str, session_id: &str) -> Self {
        Self {
            title: profile.title.clone(),
            first_name: profile.first_name.clone(),
            middle_name: profile.middle_name.clone(),
            last_name: profile.last_name.clone(),
            dob_iso: profile.dob_iso.clone(),
            mobile_e164: profile.mobile_e164.clone(),
            email: profile.email.clone(),
            address1: profile.address1.clone(),
            address2: profile.address2.clone(),
            city: profile.city.clone(),
            region: profile.region.clone(),
            postal_code: profile.postal_code.clone(),
            country: profile.country.clone(),
            fundraiser_id: fundraiser_id.to_string(),
            session_id: session_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DonorUpsertOut {
    pub donor_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DonorOut {
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DonorConsentIn {
    pub session_id: String,
    pub donor_id: String,
    pub consent_sms: bool,
    pub consent_email: bool,
    pub consent_mail: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// SMS verification
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct SendSmsIn {
    pub to_e164: String,
    pub session_id: String,
    pub donor_id: String,
    pub charity_name: String,
    pub gift_type: GiftKind,
    pub amount_cents: i64,
    pub currency: String,
    /// Custom message override; the backend composes one when absent.
    pub preview_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SendSmsOut {
    pub ok: bool,
    pub sid: String,
}

/// Latest inbound reply state for a session/donor pair.
/// `result` is absent until the backend has recorded an outbound text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct SmsStatusOut {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub inbound_body: Option<String>,
    #[serde(default)]
    pub sent_ts: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Payments
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct PaymentIntentIn {
    pub amount: i64,
    pub currency: String,
    pub session_id: Option<String>,
    pub donor_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentIntentOut {
    pub client_secret: String,
    pub id: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetupIntentIn {
    pub customer_id: String,
    pub usage: String,
    pub session_id: Option<String>,
    pub donor_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SetupIntentOut {
    pub client_secret: String,
    pub id: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TerminalPaymentIntentIn {
    pub amount: i64,
    pub currency: String,
    pub session_id: Option<String>,
    pub donor_id: Option<String>,
    pub location_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerUpsertIn {
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomerUpsertOut {
    pub customer_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethodAttachIn {
    pub customer_id: String,
    pub payment_method_id: String,
    pub session_id: Option<String>,
    pub donor_id: Option<String>,
    /// Persist the attachment row backend-side.
    pub save_row: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentMethodAttachOut {
    pub ok: bool,
    pub customer_id: String,
    pub payment_method_id: String,
    #[serde(default)]
    pub default_payment_method: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionCreateIn {
    pub customer_id: String,
    pub price_id: String,
    pub cancel_after_years: i64,
    pub metadata: Map<String, Value>,
    pub session_id: Option<String>,
    pub donor_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubscriptionCreateOut {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub cancel_at: Option<i64>,
    #[serde(default)]
    pub latest_invoice: Option<String>,
    #[serde(default)]
    pub payment_intent: Option<String>,
}

/// Payment method behind a confirmed intent. Tap-to-pay charges carry a
/// reusable `generated_card_id` alongside the card-present method.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentMethodFromIntentOut {
    #[serde(default)]
    pub payment_method_id: Option<String>,
    #[serde(default)]
    pub generated_card_id: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentMethodSaveabilityOut {
    pub payment_method_id: String,
    pub can_save: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Products
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductLookupOut {
    pub stripe_price_id: String,
    pub product_id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductOut {
    pub product_id: String,
    pub product_type: String,
    pub amount_cents: i64,
    pub currency: String,
    pub display_name: String,
    #[serde(default)]
    pub stripe_price_id: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CampaignProductsOut {
    pub products: Vec<ProductOut>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Terminal provisioning
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionTokenOut {
    pub secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TerminalLocationOut {
    pub location_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceRegistrationIn {
    pub device_code: String,
    pub location_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceRegistrationOut {
    pub reader_id: String,
    pub status: String,
    pub device_type: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Events and signatures
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct LogEventIn {
    pub event_type: String,
    pub session_id: Option<String>,
    pub donor_id: Option<String>,
    pub fundraiser_id: Option<String>,
    pub attributes: Map<String, Value>,
}

impl LogEventIn {
    /// Wraps a kiosk event for the backend's event log.
    pub fn from_kiosk_event(
        event: &KioskEvent,
        session_id: Option<String>,
        donor_id: Option<String>,
    ) -> Self {
        Self {
            event_type: event.event_type().to_string(),
            session_id,
            donor_id,
            fundraiser_id: None,
            attributes: event.attributes(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignatureUploadIn {
    pub session_id: String,
    pub donor_id: String,
    /// Base64-encoded PNG of the signature pad.
    pub signature_data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignatureUploadOut {
    pub signature_id: String,
    pub signature_url: String,
    pub success: bool,
}
