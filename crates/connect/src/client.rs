//! HTTP client for the donation backend API.
//!
//! This module provides the single HTTP client the kiosk uses to talk to
//! the donation backend. Every call is one request with no retry: the
//! fundraiser is standing next to the donor and decides what to do with a
//! failure.

use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::api::{
    CampaignProductsOut, ConnectionTokenOut, CustomerUpsertIn, CustomerUpsertOut,
    DeviceRegistrationIn, DeviceRegistrationOut, DonorConsentIn, DonorOut, DonorUpsertIn,
    DonorUpsertOut, FundraiserLoginIn, FundraiserLoginOut, KioskBackend, LogEventIn,
    PaymentIntentIn, PaymentIntentOut, PaymentMethodAttachIn, PaymentMethodAttachOut,
    PaymentMethodFromIntentOut, PaymentMethodSaveabilityOut, ProductLookupOut, SendSmsIn,
    SendSmsOut, SetupIntentIn, SetupIntentOut, SignatureUploadIn, SignatureUploadOut,
    SmsStatusOut, SubscriptionCreateIn, SubscriptionCreateOut, TerminalLocationOut,
    TerminalPaymentIntentIn,
};
use crate::terminal::ConnectionTokenProvider;
use pledgepoint_core::errors::{Error, Result};

/// Connect and read timeout for backend requests.
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Default base URL for a kiosk pointed at a local backend.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// FastAPI error envelope. `detail` is usually a string but can be any
/// JSON value for validation errors.
#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Kiosk API Client
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP client for the donation backend.
///
/// # Example
///
/// ```ignore
/// let client = KioskApiClient::new("http://localhost:8000")?;
/// let out = client.login(FundraiserLoginIn { fundraiser_id: "FR123".into() }).await?;
/// ```
#[derive(Debug, Clone)]
pub struct KioskApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl KioskApiClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create default headers for API requests.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// Make a GET request and parse the response.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("[KioskApi] GET {}", url);

        let response = self
            .client
            .get(&url)
            .headers(self.headers())
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        self.parse_response(response).await
    }

    /// Make a POST request with a JSON body and parse the response.
    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("[KioskApi] POST {}", url);

        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        self.parse_response(response).await
    }

    /// Make a POST request with no body and parse the response.
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("[KioskApi] POST {}", url);

        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        self.parse_response(response).await
    }

    /// Parse an HTTP response, pulling the backend's error detail out of
    /// failures where possible.
    async fn parse_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Http(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            if let Ok(err) = serde_json::from_str::<ApiErrorBody>(&body) {
                if let Some(detail) = err.detail {
                    let msg = match detail {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    };
                    return Err(Error::Api(msg));
                }
            }
            return Err(Error::Api(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            Error::Deserialization(format!("{} - {}", e, body.chars().take(200).collect::<String>()))
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// KioskBackend Trait Implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl KioskBackend for KioskApiClient {
    async fn login(&self, input: FundraiserLoginIn) -> Result<FundraiserLoginOut> {
        self.post("/fundraiser/login", &input).await
    }

    async fn upsert_donor(&self, input: DonorUpsertIn) -> Result<DonorUpsertOut> {
        self.post("/donor/upsert", &input).await
    }

    async fn send_verification_sms(&self, input: SendSmsIn) -> Result<SendSmsOut> {
        self.post("/verification/sms/send", &input).await
    }

    async fn verification_status(
        &self,
        session_id: &str,
        donor_id: &str,
    ) -> Result<SmsStatusOut> {
        self.get(&format!(
            "/verification/sms/status?session_id={}&donor_id={}",
            session_id, donor_id
        ))
        .await
    }

    async fn create_payment_intent(&self, input: PaymentIntentIn) -> Result<PaymentIntentOut> {
        self.post("/payment_intent", &input).await
    }

    async fn create_setup_intent(&self, input: SetupIntentIn) -> Result<SetupIntentOut> {
        self.post("/setup_intent", &input).await
    }

    async fn create_terminal_payment_intent(
        &self,
        input: TerminalPaymentIntentIn,
    ) -> Result<PaymentIntentOut> {
        self.post("/terminal/payment_intent", &input).await
    }

    async fn payment_method_for_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<PaymentMethodFromIntentOut> {
        self.get(&format!(
            "/payment_intent/{}/payment_method",
            payment_intent_id
        ))
        .await
    }

    async fn can_save_payment_method(
        &self,
        payment_method_id: &str,
    ) -> Result<PaymentMethodSaveabilityOut> {
        self.get(&format!("/payment_method/{}/can_save", payment_method_id))
            .await
    }

    async fn upsert_customer(&self, input: CustomerUpsertIn) -> Result<CustomerUpsertOut> {
        self.post("/customer/upsert", &input).await
    }

    async fn attach_payment_method(
        &self,
        input: PaymentMethodAttachIn,
    ) -> Result<PaymentMethodAttachOut> {
        self.post("/payment_method/attach", &input).await
    }

    async fn create_subscription(
        &self,
        input: SubscriptionCreateIn,
    ) -> Result<SubscriptionCreateOut> {
        self.post("/subscriptions/create", &input).await
    }

    async fn donor(&self, donor_id: &str) -> Result<DonorOut> {
        self.get(&format!("/donor/{}", donor_id)).await
    }

    /// The backend answers 404 when the catalog has no matching product;
    /// that is a normal outcome, not an error.
    async fn lookup_product(
        &self,
        campaign_id: &str,
        amount_cents: i64,
        currency: &str,
        product_type: &str,
    ) -> Result<Option<ProductLookupOut>> {
        let url = format!(
            "{}/products/lookup?campaign_id={}&amount_cents={}&currency={}&product_type={}",
            self.base_url, campaign_id, amount_cents, currency, product_type
        );
        debug!("[KioskApi] GET {}", url);

        let response = self
            .client
            .get(&url)
            .headers(self.headers())
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        self.parse_response(response).await.map(Some)
    }

    async fn campaign_products(&self, campaign_id: &str) -> Result<CampaignProductsOut> {
        self.get(&format!("/products/campaign/{}", campaign_id))
            .await
    }

    async fn terminal_connection_token(&self) -> Result<ConnectionTokenOut> {
        self.post_empty("/terminal/connection_token").await
    }

    async fn terminal_location(&self) -> Result<TerminalLocationOut> {
        self.get("/terminal/location").await
    }

    async fn register_device(&self, input: DeviceRegistrationIn) -> Result<DeviceRegistrationOut> {
        self.post("/terminal/register_device", &input).await
    }

    async fn update_consent(&self, input: DonorConsentIn) -> Result<()> {
        let _: serde_json::Value = self.post("/donor/consent", &input).await?;
        Ok(())
    }

    async fn log_event(&self, input: LogEventIn) -> Result<()> {
        let _: serde_json::Value = self.post("/log-event", &input).await?;
        Ok(())
    }

    async fn upload_signature(&self, input: SignatureUploadIn) -> Result<SignatureUploadOut> {
        self.post("/signature/upload", &input).await
    }
}

// The backend client doubles as the token source a hardware reader SDK
// plugs into.
#[async_trait]
impl ConnectionTokenProvider for KioskApiClient {
    async fn fetch_connection_token(&self) -> Result<String> {
        Ok(self.terminal_connection_token().await?.secret)
    }
}
