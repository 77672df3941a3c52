//! Tests for session state and login normalization.

#[cfg(test)]
mod tests {
    use crate::campaigns::CampaignPayload;
    use crate::gifts::SelectedGift;
    use crate::session::{
        normalize_fundraiser_id, CharityPayload, FundraiserPayload, Session,
    };

    // ==================== Fundraiser Id Tests ====================

    #[test]
    fn test_digits_gain_prefix() {
        assert_eq!(normalize_fundraiser_id("123"), "FR123");
    }

    #[test]
    fn test_non_digits_are_stripped() {
        assert_eq!(normalize_fundraiser_id("fr123"), "FR123");
        assert_eq!(normalize_fundraiser_id(" 4 2-7 "), "FR427");
    }

    // ==================== Login Tests ====================

    #[test]
    fn test_from_login_populates_branding() {
        let fundraiser: FundraiserPayload =
            serde_json::from_str(r#"{"DISPLAY_NAME": "Sam Field Rep"}"#).unwrap();
        let charity: CharityPayload = serde_json::from_str(
            r##"{
                "CHARITY_ID": "ch_01",
                "NAME": "Clean Water Fund",
                "LOGO_URL": "https://cdn.example.org/logo.png",
                "BLURB": "Safe water for everyone.",
                "BRAND_PRIMARY_HEX": "#00D5D7",
                "TERMS_URL": "https://example.org/terms"
            }"##,
        )
        .unwrap();
        let campaign: CampaignPayload =
            serde_json::from_str(r#"{"CURRENCY": "cad", "PRESET_AMOUNTS": [20, 30]}"#).unwrap();

        let session = Session::from_login(
            "FR123".to_string(),
            "sess-1".to_string(),
            fundraiser,
            Some(charity),
            Some(&campaign),
        );

        assert_eq!(session.session_id, "sess-1");
        assert_eq!(session.fundraiser_id, "FR123");
        assert_eq!(
            session.fundraiser_display_name.as_deref(),
            Some("Sam Field Rep")
        );
        assert_eq!(session.fundraiser_first_name.as_deref(), Some("Sam"));
        assert_eq!(session.charity_id.as_deref(), Some("ch_01"));
        assert_eq!(session.charity_name, "Clean Water Fund");
        assert_eq!(session.brand_primary_hex.as_deref(), Some("#00D5D7"));
        let campaign = session.campaign.unwrap();
        assert_eq!(campaign.currency, "CAD");
        assert_eq!(campaign.preset_amounts, vec![2000, 3000]);
    }

    #[test]
    fn test_from_login_without_charity_or_campaign() {
        let session = Session::from_login(
            "FR9".to_string(),
            "sess-2".to_string(),
            FundraiserPayload::default(),
            None,
            None,
        );

        assert_eq!(session.fundraiser_display_name, None);
        assert_eq!(session.fundraiser_first_name, None);
        assert_eq!(session.charity_id, None);
        assert_eq!(session.charity_name, "Your Charity");
        assert_eq!(session.campaign, None);
        // Point-of-use fallback still provides a usable config.
        let campaign = session.campaign_or_default();
        assert_eq!(campaign.currency, "CAD");
        assert_eq!(campaign.preset_amounts, vec![2000, 3000, 4000, 5000]);
        assert_eq!(campaign.min_amount_cents, 1000);
    }

    // ==================== Donor Lifecycle Tests ====================

    #[test]
    fn test_cache_donor_fills_lookups() {
        let mut session = Session::default();
        let profile = sample_profile();

        session.cache_donor("don_42".to_string(), &profile);

        assert_eq!(session.donor_id.as_deref(), Some("don_42"));
        assert_eq!(session.donor_phone_e164.as_deref(), Some("+14165551234"));
        assert_eq!(session.donor_email.as_deref(), Some("avery@example.com"));
        assert_eq!(session.donor_full_name.as_deref(), Some("Avery Quinn"));
        assert_eq!(session.donor_dob_iso.as_deref(), Some("1990-04-12"));
        assert_eq!(
            session.donor_address_line.as_deref(),
            Some("100 Main St, Toronto, ON M5V 2T6")
        );
    }

    #[test]
    fn test_reset_clears_donor_but_keeps_shift() {
        let mut session = Session::from_login(
            "FR123".to_string(),
            "sess-3".to_string(),
            FundraiserPayload::default(),
            None,
            None,
        );
        session.cache_donor("don_42".to_string(), &sample_profile());
        session.selected_gift = Some(SelectedGift::recurring(2000, "CAD"));
        session.donor_form.first_name = "Avery".to_string();
        session.consents.email = false;

        session.reset_for_next_donor();

        assert_eq!(session.donor_id, None);
        assert_eq!(session.donor_form.first_name, "");
        assert_eq!(session.donor_form.country, "CA");
        assert_eq!(session.selected_gift, None);
        assert_eq!(session.donor_phone_e164, None);
        assert_eq!(session.donor_email, None);
        assert_eq!(session.donor_full_name, None);
        assert_eq!(session.donor_dob_iso, None);
        assert_eq!(session.donor_address_line, None);
        assert!(session.consents.sms && session.consents.email && session.consents.mail);
        // Shift-level state survives.
        assert_eq!(session.session_id, "sess-3");
        assert_eq!(session.fundraiser_id, "FR123");
    }

    #[test]
    fn test_consents_default_opted_in() {
        let session = Session::default();
        assert!(session.consents.sms);
        assert!(session.consents.email);
        assert!(session.consents.mail);
    }

    // ==================== Helpers ====================

    fn sample_profile() -> crate::donors::DonorProfile {
        crate::donors::DonorForm {
            first_name: "Avery".to_string(),
            last_name: "Quinn".to_string(),
            dob: "1990-04-12".to_string(),
            mobile: "4165551234".to_string(),
            email: "avery@example.com".to_string(),
            address1: "100 Main St".to_string(),
            city: "Toronto".to_string(),
            region: "ON".to_string(),
            postal_code: "M5V 2T6".to_string(),
            ..Default::default()
        }
        .validate()
        .unwrap()
    }
}
