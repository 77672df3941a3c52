//! Centralized terminal payment orchestrator.
//!
//! Drives one gift from reader discovery through to a settled outcome,
//! including the subscription setup that follows a recurring charge.
//! Screens stay thin; everything order-sensitive lives here.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, error, info, warn};
use serde_json::{Map, Value};

use super::models::{PaymentOutcome, PaymentRequest};
use super::progress::{PaymentProgressReporter, PaymentStage};
use crate::api::{
    CustomerUpsertIn, DeviceRegistrationIn, DonorOut, KioskBackend, LogEventIn,
    PaymentMethodAttachIn, SubscriptionCreateIn, TerminalPaymentIntentIn,
};
use crate::terminal::{TerminalConnector, TerminalIntent, TerminalIntentStatus};
use pledgepoint_core::events::KioskEvent;
use pledgepoint_core::gifts::GiftKind;

/// Terminal location used when the backend cannot tell us where this kiosk lives.
const FALLBACK_LOCATION_ID: &str = "tml_GMwgTw8OHAJtnR";

/// Subscription statuses that count as a successful setup.
const ACTIVE_SUBSCRIPTION_STATUSES: [&str; 2] = ["active", "incomplete"];

/// Configuration for payment runs.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// Code identifying this kiosk hardware to the backend.
    pub device_code: String,
    /// Years after which a recurring gift stops charging.
    pub cancel_after_years: i64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            device_code: String::new(),
            cancel_after_years: 50,
        }
    }
}

/// Orchestrates a terminal payment end to end.
///
/// This struct encapsulates the charge logic so screens only see a
/// `PaymentOutcome`. It handles:
/// - One-off device registration with the backend
/// - Reader discovery and connection at the terminal location
/// - Intent creation, tap collection, and confirmation
/// - Subscription setup for recurring gifts
/// - Progress reporting via a pluggable reporter trait
pub struct PaymentOrchestrator {
    backend: Arc<dyn KioskBackend>,
    terminal: Arc<dyn TerminalConnector>,
    progress: Arc<dyn PaymentProgressReporter>,
    config: PaymentConfig,
    registered: AtomicBool,
}

impl PaymentOrchestrator {
    /// Create a new payment orchestrator.
    pub fn new(
        backend: Arc<dyn KioskBackend>,
        terminal: Arc<dyn TerminalConnector>,
        progress: Arc<dyn PaymentProgressReporter>,
        config: PaymentConfig,
    ) -> Self {
        Self {
            backend,
            terminal,
            progress,
            config,
            registered: AtomicBool::new(false),
        }
    }

    /// Process one gift end to end.
    ///
    /// Never returns an error: every failure becomes a `Failed` outcome so
    /// the screen flow always has something to show the donor. A recurring
    /// gift whose charge lands but whose subscription setup fails is also
    /// `Failed`; the charge is not reversed.
    pub async fn process(&self, request: &PaymentRequest) -> PaymentOutcome {
        info!(
            "[PaymentFlow] Processing {} gift of {} {} for donor {}",
            request.gift.kind, request.gift.amount_cents, request.gift.currency, request.donor_id
        );
        self.ensure_registered().await;

        let outcome = match self.process_internal(request).await {
            Ok(outcome) => outcome,
            Err(reason) => {
                error!("[PaymentFlow] {}", reason);
                PaymentOutcome::Failed { reason }
            }
        };

        self.progress.report_outcome(&outcome);
        outcome
    }

    /// Internal payment logic that may fail at any step.
    async fn process_internal(&self, request: &PaymentRequest) -> Result<PaymentOutcome, String> {
        // Step 1: Make sure a reader is connected
        self.ensure_reader_connected().await?;

        // Step 2: Create the card-present intent and hand it to the reader
        self.progress.report_stage(PaymentStage::CreatingIntent);
        let created = self
            .backend
            .create_terminal_payment_intent(TerminalPaymentIntentIn {
                amount: request.gift.amount_cents,
                currency: request.gift.currency.clone(),
                session_id: Some(request.session_id.clone()),
                donor_id: Some(request.donor_id.clone()),
                location_id: None,
            })
            .await
            .map_err(|e| format!("Failed to create payment intent: {}", e))?;
        let intent = self
            .terminal
            .retrieve_payment_intent(&created.client_secret)
            .await
            .map_err(|e| e.to_string())?;
        debug!("[PaymentFlow] Created intent {}, status: {}", intent.id, intent.status);

        // Step 3: Collect the tap
        self.progress.report_stage(PaymentStage::WaitingForTap);
        let collected = self
            .terminal
            .collect_payment_method(&intent)
            .await
            .map_err(|e| e.to_string())?;

        // Step 4: Confirm the charge
        self.progress.report_stage(PaymentStage::Confirming);
        let confirmed = self
            .terminal
            .confirm_payment_intent(&collected)
            .await
            .map_err(|e| e.to_string())?;
        if confirmed.status != TerminalIntentStatus::Succeeded {
            return Err(format!("Payment was not successful: {}", confirmed.status));
        }

        // Step 5: Post-charge handling per gift kind
        match request.gift.kind {
            GiftKind::OneTime => self.finish_one_time(request, &confirmed).await,
            GiftKind::Recurring => self.finish_monthly(request, &confirmed).await,
        }
    }

    /// Connect the first discovered reader, unless one is already connected.
    async fn ensure_reader_connected(&self) -> Result<(), String> {
        if self.terminal.connected_reader().await.is_some() {
            return Ok(());
        }

        self.progress.report_stage(PaymentStage::DiscoveringReaders);
        let readers = self
            .terminal
            .discover_readers()
            .await
            .map_err(|e| e.to_string())?;
        if readers.is_empty() {
            return Err("No tap to pay readers found - ensure NFC is enabled".to_string());
        }
        info!("[PaymentFlow] Found {} readers", readers.len());

        self.progress.report_stage(PaymentStage::ConnectingReader);
        let location_id = self.location_id().await;
        let connected = self
            .terminal
            .connect_reader(&readers[0], &location_id)
            .await
            .map_err(|e| e.to_string())?;
        info!(
            "[PaymentFlow] Connected reader {} at {}",
            connected.serial_number, location_id
        );
        Ok(())
    }

    /// Log the completed charge. A recurring gift gets its event logged by
    /// the backend when the subscription bills; one-time gifts are logged
    /// here and the payment only counts once the log lands.
    async fn finish_one_time(
        &self,
        request: &PaymentRequest,
        intent: &TerminalIntent,
    ) -> Result<PaymentOutcome, String> {
        let event = KioskEvent::payment_completed(
            intent.id.clone(),
            request.gift.amount_cents,
            request.gift.currency.clone(),
            GiftKind::OneTime,
            intent.status.to_string(),
        );
        self.backend
            .log_event(LogEventIn::from_kiosk_event(
                &event,
                Some(request.session_id.clone()),
                Some(request.donor_id.clone()),
            ))
            .await
            .map_err(|e| format!("One-time payment logging failed: {}", e))?;

        Ok(PaymentOutcome::Completed {
            payment_intent_id: intent.id.clone(),
            subscription_id: None,
        })
    }

    /// Turn the settled charge into a monthly subscription.
    ///
    /// Prefers the processor's reusable `generated_card_id` over the
    /// card-present method, which cannot be charged off-session.
    async fn finish_monthly(
        &self,
        request: &PaymentRequest,
        intent: &TerminalIntent,
    ) -> Result<PaymentOutcome, String> {
        self.progress.report_stage(PaymentStage::StartingSubscription);

        let price_id = match request.gift.price_id.as_deref() {
            Some(price_id) if !price_id.is_empty() => price_id.to_string(),
            _ => return Err("No Stripe Price ID found for monthly product".to_string()),
        };

        let methods = self
            .backend
            .payment_method_for_intent(&intent.id)
            .await
            .map_err(|e| format!("Monthly subscription setup failed: {}", e))?;
        let payment_method_id = methods
            .generated_card_id
            .filter(|id| !id.is_empty())
            .or(methods.payment_method_id.filter(|id| !id.is_empty()))
            .ok_or_else(|| "No payment method found for payment intent".to_string())?;
        debug!("[PaymentFlow] Using payment method {}", payment_method_id);

        let donor = self.donor_contact(&request.donor_id).await;

        let mut customer_metadata = Map::new();
        customer_metadata.insert("donor_id".to_string(), Value::String(request.donor_id.clone()));
        customer_metadata.insert(
            "session_id".to_string(),
            Value::String(request.session_id.clone()),
        );
        customer_metadata.insert(
            "payment_intent_id".to_string(),
            Value::String(intent.id.clone()),
        );
        let customer = self
            .backend
            .upsert_customer(CustomerUpsertIn {
                email: donor.email,
                name: donor.name,
                phone: donor.phone,
                metadata: customer_metadata,
            })
            .await
            .map_err(|e| format!("Monthly subscription setup failed: {}", e))?;

        self.backend
            .attach_payment_method(PaymentMethodAttachIn {
                customer_id: customer.customer_id.clone(),
                payment_method_id,
                session_id: Some(request.session_id.clone()),
                donor_id: Some(request.donor_id.clone()),
                save_row: true,
            })
            .await
            .map_err(|e| format!("Monthly subscription setup failed: {}", e))?;

        let mut subscription_metadata = Map::new();
        subscription_metadata.insert(
            "product_id".to_string(),
            Value::String(request.gift.product_id.clone().unwrap_or_default()),
        );
        subscription_metadata.insert(
            "amount_cents".to_string(),
            Value::String(request.gift.amount_cents.to_string()),
        );
        subscription_metadata.insert(
            "currency".to_string(),
            Value::String(request.gift.currency.clone()),
        );
        subscription_metadata.insert(
            "initial_payment_intent_id".to_string(),
            Value::String(intent.id.clone()),
        );
        subscription_metadata.insert(
            "payment_method".to_string(),
            Value::String("terminal_payment".to_string()),
        );
        let subscription = self
            .backend
            .create_subscription(SubscriptionCreateIn {
                customer_id: customer.customer_id,
                price_id,
                cancel_after_years: self.config.cancel_after_years,
                metadata: subscription_metadata,
                session_id: Some(request.session_id.clone()),
                donor_id: Some(request.donor_id.clone()),
            })
            .await
            .map_err(|e| format!("Monthly subscription setup failed: {}", e))?;

        if ACTIVE_SUBSCRIPTION_STATUSES.contains(&subscription.status.as_str()) {
            info!(
                "[PaymentFlow] Subscription {} created with status {}",
                subscription.id, subscription.status
            );
            Ok(PaymentOutcome::Completed {
                payment_intent_id: intent.id.clone(),
                subscription_id: Some(subscription.id),
            })
        } else {
            Err(format!(
                "Subscription creation failed: {}",
                subscription.status
            ))
        }
    }

    /// Donor contact details, with a placeholder when the fetch fails so a
    /// recurring gift is never lost over a missing profile.
    async fn donor_contact(&self, donor_id: &str) -> DonorOut {
        match self.backend.donor(donor_id).await {
            Ok(donor) => donor,
            Err(e) => {
                warn!("[PaymentFlow] Donor fetch failed, using placeholder: {}", e);
                DonorOut {
                    email: "donor@example.com".to_string(),
                    name: "Donor Name".to_string(),
                    phone: None,
                }
            }
        }
    }

    /// Register this kiosk with the backend once per process. Best effort:
    /// payments proceed whether or not registration lands.
    async fn ensure_registered(&self) {
        if self.registered.load(Ordering::SeqCst) {
            return;
        }
        match self.register_device().await {
            Ok(reader_id) => {
                info!("[PaymentFlow] Registered device as reader {}", reader_id);
                self.registered.store(true, Ordering::SeqCst);
            }
            Err(e) => {
                warn!("[PaymentFlow] Device registration failed: {}", e);
            }
        }
    }

    async fn register_device(&self) -> Result<String, String> {
        let location_id = self.location_id().await;
        let registration = self
            .backend
            .register_device(DeviceRegistrationIn {
                device_code: self.config.device_code.clone(),
                location_id,
            })
            .await
            .map_err(|e| e.to_string())?;

        let event = KioskEvent::device_registered(
            registration.reader_id.clone(),
            registration.device_type.clone(),
        );
        self.backend
            .log_event(LogEventIn::from_kiosk_event(&event, None, None))
            .await
            .map_err(|e| e.to_string())?;

        Ok(registration.reader_id)
    }

    /// The terminal location for this kiosk, falling back to the shared
    /// test location when the backend cannot say.
    async fn location_id(&self) -> String {
        match self.backend.terminal_location().await {
            Ok(location) if !location.location_id.is_empty() => location.location_id,
            Ok(_) => {
                debug!("[PaymentFlow] Backend returned blank location, using fallback");
                FALLBACK_LOCATION_ID.to_string()
            }
            Err(e) => {
                debug!("[PaymentFlow] Location lookup failed, using fallback: {}", e);
                FALLBACK_LOCATION_ID.to_string()
            }
        }
    }
}
