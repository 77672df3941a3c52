//! Session state for one fundraiser shift.
//!
//! A [`Session`] is created by fundraiser login and lives until the app
//! exits. It carries the branding returned by the backend plus everything
//! the kiosk accumulates about the donor currently at the screen. Donor
//! state is wiped between donors; fundraiser and charity state is not.

use serde::{Deserialize, Serialize};

use crate::campaigns::{CampaignConfig, CampaignPayload};
use crate::constants::DEFAULT_CHARITY_NAME;
use crate::donors::{DonorForm, DonorProfile};
use crate::gifts::SelectedGift;

/// Builds the canonical fundraiser id from keypad input.
///
/// Only digits survive; the fixed `FR` prefix is applied afterwards, so
/// both `123` and `fr123` normalize to `FR123`.
pub fn normalize_fundraiser_id(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    format!("FR{digits}")
}

/// Fundraiser block of the login response.
///
/// Keys arrive in SCREAMING_SNAKE_CASE from warehouse-backed deployments
/// and snake_case from newer backends.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FundraiserPayload {
    #[serde(default, alias = "DISPLAY_NAME")]
    pub display_name: Option<String>,
}

/// Charity block of the login response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharityPayload {
    #[serde(default, alias = "CHARITY_ID")]
    pub charity_id: Option<String>,
    #[serde(default, alias = "NAME")]
    pub name: Option<String>,
    #[serde(default, alias = "LOGO_URL")]
    pub logo_url: Option<String>,
    #[serde(default, alias = "BLURB")]
    pub blurb: Option<String>,
    #[serde(default, alias = "BRAND_PRIMARY_HEX")]
    pub brand_primary_hex: Option<String>,
    #[serde(default, alias = "TERMS_URL")]
    pub terms_url: Option<String>,
}

/// Communication preferences captured on the payment screen.
/// All three default to opted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consents {
    pub sms: bool,
    pub email: bool,
    pub mail: bool,
}

impl Default for Consents {
    fn default() -> Self {
        Self {
            sms: true,
            email: true,
            mail: true,
        }
    }
}

/// State for one fundraiser shift at the kiosk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    pub fundraiser_id: String,
    pub fundraiser_display_name: Option<String>,
    /// First token of the display name, for greetings.
    pub fundraiser_first_name: Option<String>,
    pub charity_id: Option<String>,
    pub charity_name: String,
    pub charity_logo_url: Option<String>,
    pub charity_blurb: Option<String>,
    pub charity_terms_url: Option<String>,
    pub brand_primary_hex: Option<String>,
    pub campaign: Option<CampaignConfig>,
    /// Backend id of the donor currently at the kiosk, set after upsert.
    pub donor_id: Option<String>,
    pub donor_form: DonorForm,
    pub selected_gift: Option<SelectedGift>,
    pub donor_phone_e164: Option<String>,
    pub donor_email: Option<String>,
    pub donor_full_name: Option<String>,
    pub donor_dob_iso: Option<String>,
    pub donor_address_line: Option<String>,
    pub consents: Consents,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            session_id: String::new(),
            fundraiser_id: String::new(),
            fundraiser_display_name: None,
            fundraiser_first_name: None,
            charity_id: None,
            charity_name: DEFAULT_CHARITY_NAME.to_string(),
            charity_logo_url: None,
            charity_blurb: None,
            charity_terms_url: None,
            brand_primary_hex: None,
            campaign: None,
            donor_id: None,
            donor_form: DonorForm::default(),
            selected_gift: None,
            donor_phone_e164: None,
            donor_email: None,
            donor_full_name: None,
            donor_dob_iso: None,
            donor_address_line: None,
            consents: Consents::default(),
        }
    }
}

impl Session {
    /// Builds a session from a successful login response.
    pub fn from_login(
        fundraiser_id: String,
        session_id: String,
        fundraiser: FundraiserPayload,
        charity: Option<CharityPayload>,
        campaign: Option<&CampaignPayload>,
    ) -> Self {
        let fundraiser_first_name = fundraiser
            .display_name
            .as_ref()
            .and_then(|name| name.trim().split(' ').next())
            .map(str::to_string);
        let charity = charity.unwrap_or_default();

        Self {
            session_id,
            fundraiser_id,
            fundraiser_display_name: fundraiser.display_name,
            fundraiser_first_name,
            charity_id: charity.charity_id,
            charity_name: charity
                .name
                .unwrap_or_else(|| DEFAULT_CHARITY_NAME.to_string()),
            charity_logo_url: charity.logo_url,
            charity_blurb: charity.blurb,
            charity_terms_url: charity.terms_url,
            brand_primary_hex: charity.brand_primary_hex,
            campaign: campaign.map(CampaignConfig::from_payload),
            ..Self::default()
        }
    }

    /// The campaign config, falling back to defaults when login carried none.
    pub fn campaign_or_default(&self) -> CampaignConfig {
        self.campaign.clone().unwrap_or_default()
    }

    /// Records the upserted donor and caches the fields later steps read.
    pub fn cache_donor(&mut self, donor_id: String, profile: &DonorProfile) {
        self.donor_id = Some(donor_id);
        self.donor_phone_e164 = Some(profile.mobile_e164.clone());
        self.donor_email = Some(profile.email.clone());
        self.donor_full_name = Some(profile.full_name());
        self.donor_dob_iso = Some(profile.dob_iso.clone());
        self.donor_address_line = Some(profile.address_line());
    }

    /// Clears everything belonging to the donor who just finished, keeping
    /// the fundraiser, charity, and campaign for the next one.
    pub fn reset_for_next_donor(&mut self) {
        self.donor_id = None;
        self.donor_form = DonorForm::default();
        self.selected_gift = None;
        self.donor_phone_e164 = None;
        self.donor_email = None;
        self.donor_full_name = None;
        self.donor_dob_iso = None;
        self.donor_address_line = None;
        self.consents = Consents::default();
    }
}
