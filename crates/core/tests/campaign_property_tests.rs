//! Property-based tests for campaign payload normalization.
//!
//! Whatever shape the backend sends, the kiosk must end up with a config
//! it can put on screen.

use pledgepoint_core::campaigns::{CampaignConfig, CampaignPayload};
use proptest::prelude::*;

fn config_from_value(value: serde_json::Value) -> CampaignConfig {
    let payload: CampaignPayload =
        serde_json::from_value(value).expect("payload should deserialize");
    CampaignConfig::from_payload(&payload)
}

proptest! {
    /// Presets are never empty and always strictly ascending, no matter
    /// what mix of numbers the backend sends.
    #[test]
    fn presets_always_usable(
        amounts in proptest::collection::vec(0.0f64..100_000.0, 0..12)
    ) {
        let config = config_from_value(serde_json::json!({ "PRESET_AMOUNTS": amounts }));

        prop_assert!(!config.preset_amounts.is_empty());
        prop_assert!(config.preset_amounts.windows(2).all(|w| w[0] < w[1]));
    }

    /// A bracketed string and a JSON array of the same numbers parse the
    /// same way.
    #[test]
    fn string_and_array_forms_agree(
        amounts in proptest::collection::vec(1u32..10_000, 1..8)
    ) {
        let as_array = config_from_value(serde_json::json!({ "PRESET_AMOUNTS": amounts }));

        let joined = amounts
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let as_string = config_from_value(
            serde_json::json!({ "PRESET_AMOUNTS": format!("[{joined}]") }),
        );

        prop_assert_eq!(as_array.preset_amounts, as_string.preset_amounts);
    }

    /// Currency always comes out uppercase, falling back when blank.
    #[test]
    fn currency_always_uppercase(currency in "[a-zA-Z]{0,5}") {
        let config = config_from_value(serde_json::json!({ "CURRENCY": currency }));

        prop_assert!(!config.currency.is_empty());
        prop_assert!(config.currency.chars().all(|c| !c.is_lowercase()));
    }
}
