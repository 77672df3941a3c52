//! Trait defining the contract with the donation backend.

use async_trait::async_trait;

use super::models::{
    CampaignProductsOut, ConnectionTokenOut, CustomerUpsertIn, CustomerUpsertOut,
    DeviceRegistrationIn, DeviceRegistrationOut, DonorConsentIn, DonorOut, DonorUpsertIn,
    DonorUpsertOut, FundraiserLoginIn, FundraiserLoginOut, LogEventIn, PaymentIntentIn,
    PaymentIntentOut, PaymentMethodAttachIn, PaymentMethodAttachOut, PaymentMethodFromIntentOut,
    PaymentMethodSaveabilityOut, ProductLookupOut, SendSmsIn, SendSmsOut, SetupIntentIn,
    SetupIntentOut, SignatureUploadIn, SignatureUploadOut, SmsStatusOut, SubscriptionCreateIn,
    SubscriptionCreateOut, TerminalLocationOut, TerminalPaymentIntentIn,
};
use pledgepoint_core::errors::Result;

/// Trait for calling the donation backend API.
///
/// Every method is a single request with no retry; callers decide what a
/// failure means for the donor in front of the kiosk.
#[async_trait]
pub trait KioskBackend: Send + Sync {
    /// Start a fundraiser session and fetch branding.
    async fn login(&self, input: FundraiserLoginIn) -> Result<FundraiserLoginOut>;

    /// Create or update the donor record for this session.
    async fn upsert_donor(&self, input: DonorUpsertIn) -> Result<DonorUpsertOut>;

    /// Text the donor a confirmation request.
    async fn send_verification_sms(&self, input: SendSmsIn) -> Result<SendSmsOut>;

    /// Latest reply state for the session/donor pair.
    async fn verification_status(&self, session_id: &str, donor_id: &str)
        -> Result<SmsStatusOut>;

    /// Create a plain card payment intent.
    async fn create_payment_intent(&self, input: PaymentIntentIn) -> Result<PaymentIntentOut>;

    /// Create a setup intent for saving a card off-session.
    async fn create_setup_intent(&self, input: SetupIntentIn) -> Result<SetupIntentOut>;

    /// Create a card-present payment intent for the terminal.
    async fn create_terminal_payment_intent(
        &self,
        input: TerminalPaymentIntentIn,
    ) -> Result<PaymentIntentOut>;

    /// Payment method ids behind a confirmed intent.
    async fn payment_method_for_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<PaymentMethodFromIntentOut>;

    /// Whether a payment method may be stored for reuse.
    async fn can_save_payment_method(
        &self,
        payment_method_id: &str,
    ) -> Result<PaymentMethodSaveabilityOut>;

    /// Create or update the processor customer for a donor.
    async fn upsert_customer(&self, input: CustomerUpsertIn) -> Result<CustomerUpsertOut>;

    /// Attach a payment method to a customer.
    async fn attach_payment_method(
        &self,
        input: PaymentMethodAttachIn,
    ) -> Result<PaymentMethodAttachOut>;

    /// Create the recurring subscription for a monthly gift.
    async fn create_subscription(&self, input: SubscriptionCreateIn)
        -> Result<SubscriptionCreateOut>;

    /// Donor contact details for receipts and customer records.
    async fn donor(&self, donor_id: &str) -> Result<DonorOut>;

    /// Catalog price matching a campaign, amount, and product type.
    /// `Ok(None)` means the catalog has no matching product.
    async fn lookup_product(
        &self,
        campaign_id: &str,
        amount_cents: i64,
        currency: &str,
        product_type: &str,
    ) -> Result<Option<ProductLookupOut>>;

    /// All products configured for a campaign.
    async fn campaign_products(&self, campaign_id: &str) -> Result<CampaignProductsOut>;

    /// Short-lived secret for connecting the reader SDK.
    async fn terminal_connection_token(&self) -> Result<ConnectionTokenOut>;

    /// The terminal location readers should register under.
    async fn terminal_location(&self) -> Result<TerminalLocationOut>;

    /// Register this hardware as a reader at a location.
    async fn register_device(&self, input: DeviceRegistrationIn) -> Result<DeviceRegistrationOut>;

    /// Store communication preferences for a donor.
    async fn update_consent(&self, input: DonorConsentIn) -> Result<()>;

    /// Append to the backend's event log.
    async fn log_event(&self, input: LogEventIn) -> Result<()>;

    /// Upload the signed terms signature as a PNG.
    async fn upload_signature(&self, input: SignatureUploadIn) -> Result<SignatureUploadOut>;
}
