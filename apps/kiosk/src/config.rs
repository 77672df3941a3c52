//! Environment-driven configuration for the kiosk binary.

use pledgepoint_connect::client::DEFAULT_API_URL;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the donation backend.
    pub api_url: String,
    /// Stable identifier this kiosk registers its reader under.
    pub device_code: String,
    /// Fundraiser id pre-filled at the login prompt.
    pub fundraiser_id: Option<String>,
    /// PNG file uploaded at the signature step, when set.
    pub signature_png: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let api_url =
            std::env::var("PLEDGEPOINT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let device_code = std::env::var("PLEDGEPOINT_DEVICE_CODE")
            .unwrap_or_else(|_| format!("kiosk-{}", Uuid::new_v4().simple()));
        let fundraiser_id = std::env::var("PLEDGEPOINT_FUNDRAISER_ID").ok();
        let signature_png = std::env::var("PLEDGEPOINT_SIGNATURE_PNG").ok();

        Self {
            api_url,
            device_code,
            fundraiser_id,
            signature_png,
        }
    }
}
