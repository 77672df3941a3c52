//! Tests for the payment orchestrator contract.
//!
//! # Critical Contract Points
//!
//! 1. One-time gifts: charge, log the completion event, never subscribe
//! 2. Recurring gifts: charge first, then customer + attach + subscription
//! 3. A settled charge with failed follow-up is a Failed outcome, not retried
//! 4. Device registration is best effort and happens at most once per process
//! 5. Terminal location falls back to the shared test location

#[cfg(test)]
mod tests {
    use crate::api::*;
    use crate::payment::{
        NoOpProgressReporter, PaymentConfig, PaymentOrchestrator, PaymentOutcome, PaymentRequest,
    };
    use crate::terminal::SimulatedTerminal;
    use async_trait::async_trait;
    use pledgepoint_core::errors::{Error, Result};
    use pledgepoint_core::gifts::{GiftKind, SelectedGift};
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    // =========================================================================
    // Mock KioskBackend
    // =========================================================================

    #[derive(Clone)]
    struct MockBackend {
        intents: Arc<Mutex<Vec<TerminalPaymentIntentIn>>>,
        customers: Arc<Mutex<Vec<CustomerUpsertIn>>>,
        attachments: Arc<Mutex<Vec<PaymentMethodAttachIn>>>,
        subscriptions: Arc<Mutex<Vec<SubscriptionCreateIn>>>,
        registrations: Arc<Mutex<Vec<DeviceRegistrationIn>>>,
        logged_events: Arc<Mutex<Vec<LogEventIn>>>,
        payment_method: Arc<Mutex<PaymentMethodFromIntentOut>>,
        subscription_status: Arc<Mutex<String>>,
        fail_log_event: Arc<Mutex<bool>>,
        fail_register: Arc<Mutex<bool>>,
        fail_location: Arc<Mutex<bool>>,
        fail_donor: Arc<Mutex<bool>>,
    }

    impl MockBackend {
        fn new() -> Self {
            Self {
                intents: Arc::new(Mutex::new(Vec::new())),
                customers: Arc::new(Mutex::new(Vec::new())),
                attachments: Arc::new(Mutex::new(Vec::new())),
                subscriptions: Arc::new(Mutex::new(Vec::new())),
                registrations: Arc::new(Mutex::new(Vec::new())),
                logged_events: Arc::new(Mutex::new(Vec::new())),
                payment_method: Arc::new(Mutex::new(PaymentMethodFromIntentOut {
                    payment_method_id: Some("pm_card_present".to_string()),
                    generated_card_id: Some("pm_generated".to_string()),
                    status: "succeeded".to_string(),
                })),
                subscription_status: Arc::new(Mutex::new("active".to_string())),
                fail_log_event: Arc::new(Mutex::new(false)),
                fail_register: Arc::new(Mutex::new(false)),
                fail_location: Arc::new(Mutex::new(false)),
                fail_donor: Arc::new(Mutex::new(false)),
            }
        }

        fn set_payment_method(&self, method: PaymentMethodFromIntentOut) {
            *self.payment_method.lock().unwrap() = method;
        }

        fn set_subscription_status(&self, status: &str) {
            *self.subscription_status.lock().unwrap() = status.to_string();
        }

        fn set_fail_log_event(&self, fail: bool) {
            *self.fail_log_event.lock().unwrap() = fail;
        }

        fn set_fail_register(&self, fail: bool) {
            *self.fail_register.lock().unwrap() = fail;
        }

        fn set_fail_location(&self, fail: bool) {
            *self.fail_location.lock().unwrap() = fail;
        }

        fn set_fail_donor(&self, fail: bool) {
            *self.fail_donor.lock().unwrap() = fail;
        }

        fn events_of_type(&self, event_type: &str) -> Vec<LogEventIn> {
            self.logged_events
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.event_type == event_type)
                .cloned()
                .collect()
        }
    }

    #[async_trait]
    impl KioskBackend for MockBackend {
        async fn login(&self, _input: FundraiserLoginIn) -> Result<FundraiserLoginOut> {
            Err(Error::Api("not wired in this mock".to_string()))
        }

        async fn upsert_donor(&self, _input: DonorUpsertIn) -> Result<DonorUpsertOut> {
            Err(Error::Api("not wired in this mock".to_string()))
        }

        async fn send_verification_sms(&self, _input: SendSmsIn) -> Result<SendSmsOut> {
            Err(Error::Api("not wired in this mock".to_string()))
        }

        async fn verification_status(
            &self,
            _session_id: &str,
            _donor_id: &str,
        ) -> Result<SmsStatusOut> {
            Err(Error::Api("not wired in this mock".to_string()))
        }

        async fn create_payment_intent(&self, _input: PaymentIntentIn) -> Result<PaymentIntentOut> {
            Err(Error::Api("not wired in this mock".to_string()))
        }

        async fn create_setup_intent(&self, _input: SetupIntentIn) -> Result<SetupIntentOut> {
            Err(Error::Api("not wired in this mock".to_string()))
        }

        async fn create_terminal_payment_intent(
            &self,
            input: TerminalPaymentIntentIn,
        ) -> Result<PaymentIntentOut> {
            self.intents.lock().unwrap().push(input);
            Ok(PaymentIntentOut {
                client_secret: "pi_test_1_secret_abc".to_string(),
                id: "pi_test_1".to_string(),
                status: "requires_payment_method".to_string(),
            })
        }

        async fn payment_method_for_intent(
            &self,
            _payment_intent_id: &str,
        ) -> Result<PaymentMethodFromIntentOut> {
            Ok(self.payment_method.lock().unwrap().clone())
        }

        async fn can_save_payment_method(
            &self,
            _payment_method_id: &str,
        ) -> Result<PaymentMethodSaveabilityOut> {
            Err(Error::Api("not wired in this mock".to_string()))
        }

        async fn upsert_customer(&self, input: CustomerUpsertIn) -> Result<CustomerUpsertOut> {
            self.customers.lock().unwrap().push(input);
            Ok(CustomerUpsertOut {
                customer_id: "cus_test_1".to_string(),
            })
        }

        async fn attach_payment_method(
            &self,
            input: PaymentMethodAttachIn,
        ) -> Result<PaymentMethodAttachOut> {
            let out = PaymentMethodAttachOut {
                ok: true,
                customer_id: input.customer_id.clone(),
                payment_method_id: input.payment_method_id.clone(),
                default_payment_method: None,
            };
            self.attachments.lock().unwrap().push(input);
            Ok(out)
        }

        async fn create_subscription(
            &self,
            input: SubscriptionCreateIn,
        ) -> Result<SubscriptionCreateOut> {
            self.subscriptions.lock().unwrap().push(input);
            Ok(SubscriptionCreateOut {
                id: "sub_test_1".to_string(),
                status: self.subscription_status.lock().unwrap().clone(),
                cancel_at: None,
                latest_invoice: None,
                payment_intent: None,
            })
        }

        async fn donor(&self, _donor_id: &str) -> Result<DonorOut> {
            if *self.fail_donor.lock().unwrap() {
                return Err(Error::Api("donor not found".to_string()));
            }
            Ok(DonorOut {
                email: "avery@example.com".to_string(),
                name: "Avery Quinn".to_string(),
                phone: Some("+14165551234".to_string()),
            })
        }

        async fn lookup_product(
            &self,
            _campaign_id: &str,
            _amount_cents: i64,
            _currency: &str,
            _product_type: &str,
        ) -> Result<Option<ProductLookupOut>> {
            Err(Error::Api("not wired in this mock".to_string()))
        }

        async fn campaign_products(&self, _campaign_id: &str) -> Result<CampaignProductsOut> {
            Err(Error::Api("not wired in this mock".to_string()))
        }

        async fn terminal_connection_token(&self) -> Result<ConnectionTokenOut> {
            Err(Error::Api("not wired in this mock".to_string()))
        }

        async fn terminal_location(&self) -> Result<TerminalLocationOut> {
            if *self.fail_location.lock().unwrap() {
                return Err(Error::Api("location unavailable".to_string()));
            }
            Ok(TerminalLocationOut {
                location_id: "tml_live_1".to_string(),
            })
        }

        async fn register_device(
            &self,
            input: DeviceRegistrationIn,
        ) -> Result<DeviceRegistrationOut> {
            if *self.fail_register.lock().unwrap() {
                return Err(Error::Api("registration rejected".to_string()));
            }
            self.registrations.lock().unwrap().push(input);
            Ok(DeviceRegistrationOut {
                reader_id: "tmr_test_1".to_string(),
                status: "registered".to_string(),
                device_type: "mobile_phone_reader".to_string(),
            })
        }

        async fn update_consent(&self, _input: DonorConsentIn) -> Result<()> {
            Err(Error::Api("not wired in this mock".to_string()))
        }

        async fn log_event(&self, input: LogEventIn) -> Result<()> {
            if *self.fail_log_event.lock().unwrap() {
                return Err(Error::Api("event log unavailable".to_string()));
            }
            self.logged_events.lock().unwrap().push(input);
            Ok(())
        }

        async fn upload_signature(&self, _input: SignatureUploadIn) -> Result<SignatureUploadOut> {
            Err(Error::Api("not wired in this mock".to_string()))
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn orchestrator(
        backend: &MockBackend,
        terminal: &Arc<SimulatedTerminal>,
    ) -> PaymentOrchestrator {
        PaymentOrchestrator::new(
            Arc::new(backend.clone()),
            terminal.clone(),
            Arc::new(NoOpProgressReporter),
            PaymentConfig {
                device_code: "kiosk-test-device".to_string(),
                ..Default::default()
            },
        )
    }

    fn one_time_request(amount_cents: i64) -> PaymentRequest {
        PaymentRequest {
            session_id: "sess_1".to_string(),
            donor_id: "don_1".to_string(),
            gift: SelectedGift {
                kind: GiftKind::OneTime,
                amount_cents,
                currency: "CAD".to_string(),
                price_id: None,
                product_id: None,
            },
        }
    }

    fn monthly_request(amount_cents: i64, price_id: Option<&str>) -> PaymentRequest {
        PaymentRequest {
            session_id: "sess_1".to_string(),
            donor_id: "don_1".to_string(),
            gift: SelectedGift {
                kind: GiftKind::Recurring,
                amount_cents,
                currency: "CAD".to_string(),
                price_id: price_id.map(|p| p.to_string()),
                product_id: Some("prod_monthly_20".to_string()),
            },
        }
    }

    // =========================================================================
    // One-time gifts
    // =========================================================================

    #[tokio::test]
    async fn test_one_time_completes_and_logs_event() {
        let backend = MockBackend::new();
        let terminal = Arc::new(SimulatedTerminal::new());
        let orchestrator = orchestrator(&backend, &terminal);

        let outcome = orchestrator.process(&one_time_request(2500)).await;

        assert_eq!(
            outcome,
            PaymentOutcome::Completed {
                payment_intent_id: "pi_test_1".to_string(),
                subscription_id: None,
            }
        );

        let completed = backend.events_of_type("PAYMENT_COMPLETED");
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].session_id.as_deref(), Some("sess_1"));
        assert_eq!(completed[0].donor_id.as_deref(), Some("don_1"));
        assert_eq!(
            completed[0].attributes.get("payment_type"),
            Some(&Value::from("OTG"))
        );
        assert_eq!(
            completed[0].attributes.get("amount_cents"),
            Some(&Value::from(2500))
        );
        assert_eq!(
            completed[0].attributes.get("method"),
            Some(&Value::from("tap_to_pay"))
        );

        // One-time gifts never touch the subscription pipeline.
        assert!(backend.customers.lock().unwrap().is_empty());
        assert!(backend.subscriptions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_one_time_logging_failure_fails_outcome() {
        let backend = MockBackend::new();
        backend.set_fail_log_event(true);
        let terminal = Arc::new(SimulatedTerminal::new());
        let orchestrator = orchestrator(&backend, &terminal);

        let outcome = orchestrator.process(&one_time_request(2500)).await;

        match outcome {
            PaymentOutcome::Failed { reason } => {
                assert!(reason.contains("One-time payment logging failed"))
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        // The charge itself went through; only the follow-up failed.
        assert_eq!(backend.intents.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_no_readers_fails_before_any_charge() {
        let backend = MockBackend::new();
        let terminal = Arc::new(SimulatedTerminal::new());
        terminal.set_fail_discovery(true);
        let orchestrator = orchestrator(&backend, &terminal);

        let outcome = orchestrator.process(&one_time_request(2500)).await;

        match outcome {
            PaymentOutcome::Failed { reason } => {
                assert!(reason.contains("No tap to pay readers found"))
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        assert!(backend.intents.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_declined_tap_fails() {
        let backend = MockBackend::new();
        let terminal = Arc::new(SimulatedTerminal::new());
        terminal.set_fail_confirm(true);
        let orchestrator = orchestrator(&backend, &terminal);

        let outcome = orchestrator.process(&one_time_request(2500)).await;

        match outcome {
            PaymentOutcome::Failed { reason } => {
                assert!(reason.contains("Payment declined"))
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        assert!(backend.events_of_type("PAYMENT_COMPLETED").is_empty());
    }

    // =========================================================================
    // Recurring gifts
    // =========================================================================

    #[tokio::test]
    async fn test_monthly_creates_subscription_after_charge() {
        let backend = MockBackend::new();
        let terminal = Arc::new(SimulatedTerminal::new());
        let orchestrator = orchestrator(&backend, &terminal);

        let outcome = orchestrator
            .process(&monthly_request(2000, Some("price_monthly_20")))
            .await;

        assert_eq!(
            outcome,
            PaymentOutcome::Completed {
                payment_intent_id: "pi_test_1".to_string(),
                subscription_id: Some("sub_test_1".to_string()),
            }
        );

        let customers = backend.customers.lock().unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].email, "avery@example.com");
        assert_eq!(
            customers[0].metadata.get("donor_id"),
            Some(&Value::from("don_1"))
        );

        let attachments = backend.attachments.lock().unwrap();
        assert_eq!(attachments.len(), 1);
        assert!(attachments[0].save_row);

        let subscriptions = backend.subscriptions.lock().unwrap();
        assert_eq!(subscriptions.len(), 1);
        assert_eq!(subscriptions[0].price_id, "price_monthly_20");
        assert_eq!(subscriptions[0].cancel_after_years, 50);
        assert_eq!(
            subscriptions[0].metadata.get("amount_cents"),
            Some(&Value::from("2000"))
        );
        assert_eq!(
            subscriptions[0].metadata.get("payment_method"),
            Some(&Value::from("terminal_payment"))
        );
        assert_eq!(
            subscriptions[0].metadata.get("initial_payment_intent_id"),
            Some(&Value::from("pi_test_1"))
        );
    }

    #[tokio::test]
    async fn test_monthly_without_price_fails_after_charge() {
        let backend = MockBackend::new();
        let terminal = Arc::new(SimulatedTerminal::new());
        let orchestrator = orchestrator(&backend, &terminal);

        let outcome = orchestrator.process(&monthly_request(2000, None)).await;

        match outcome {
            PaymentOutcome::Failed { reason } => {
                assert_eq!(reason, "No Stripe Price ID found for monthly product")
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        // Charge went through before the price check; nothing is rolled back.
        assert_eq!(backend.intents.lock().unwrap().len(), 1);
        assert!(backend.subscriptions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_monthly_prefers_generated_card() {
        let backend = MockBackend::new();
        let terminal = Arc::new(SimulatedTerminal::new());
        let orchestrator = orchestrator(&backend, &terminal);

        orchestrator
            .process(&monthly_request(2000, Some("price_monthly_20")))
            .await;

        let attachments = backend.attachments.lock().unwrap();
        assert_eq!(attachments[0].payment_method_id, "pm_generated");
    }

    #[tokio::test]
    async fn test_monthly_falls_back_to_card_present_method() {
        let backend = MockBackend::new();
        backend.set_payment_method(PaymentMethodFromIntentOut {
            payment_method_id: Some("pm_card_present".to_string()),
            generated_card_id: None,
            status: "succeeded".to_string(),
        });
        let terminal = Arc::new(SimulatedTerminal::new());
        let orchestrator = orchestrator(&backend, &terminal);

        orchestrator
            .process(&monthly_request(2000, Some("price_monthly_20")))
            .await;

        let attachments = backend.attachments.lock().unwrap();
        assert_eq!(attachments[0].payment_method_id, "pm_card_present");
    }

    #[tokio::test]
    async fn test_monthly_without_any_method_fails() {
        let backend = MockBackend::new();
        backend.set_payment_method(PaymentMethodFromIntentOut {
            payment_method_id: None,
            generated_card_id: Some(String::new()),
            status: "succeeded".to_string(),
        });
        let terminal = Arc::new(SimulatedTerminal::new());
        let orchestrator = orchestrator(&backend, &terminal);

        let outcome = orchestrator
            .process(&monthly_request(2000, Some("price_monthly_20")))
            .await;

        match outcome {
            PaymentOutcome::Failed { reason } => {
                assert_eq!(reason, "No payment method found for payment intent")
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_incomplete_subscription_counts_as_success() {
        let backend = MockBackend::new();
        backend.set_subscription_status("incomplete");
        let terminal = Arc::new(SimulatedTerminal::new());
        let orchestrator = orchestrator(&backend, &terminal);

        let outcome = orchestrator
            .process(&monthly_request(2000, Some("price_monthly_20")))
            .await;

        assert!(outcome.is_completed());
    }

    #[tokio::test]
    async fn test_dead_subscription_status_fails() {
        let backend = MockBackend::new();
        backend.set_subscription_status("incomplete_expired");
        let terminal = Arc::new(SimulatedTerminal::new());
        let orchestrator = orchestrator(&backend, &terminal);

        let outcome = orchestrator
            .process(&monthly_request(2000, Some("price_monthly_20")))
            .await;

        match outcome {
            PaymentOutcome::Failed { reason } => {
                assert_eq!(reason, "Subscription creation failed: incomplete_expired")
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_donor_fetch_failure_uses_placeholder_contact() {
        let backend = MockBackend::new();
        backend.set_fail_donor(true);
        let terminal = Arc::new(SimulatedTerminal::new());
        let orchestrator = orchestrator(&backend, &terminal);

        let outcome = orchestrator
            .process(&monthly_request(2000, Some("price_monthly_20")))
            .await;

        assert!(outcome.is_completed());
        let customers = backend.customers.lock().unwrap();
        assert_eq!(customers[0].email, "donor@example.com");
        assert_eq!(customers[0].name, "Donor Name");
        assert_eq!(customers[0].phone, None);
    }

    // =========================================================================
    // Device registration
    // =========================================================================

    #[tokio::test]
    async fn test_device_registers_once_per_process() {
        let backend = MockBackend::new();
        let terminal = Arc::new(SimulatedTerminal::new());
        let orchestrator = orchestrator(&backend, &terminal);

        orchestrator.process(&one_time_request(2500)).await;
        orchestrator.process(&one_time_request(3000)).await;

        let registrations = backend.registrations.lock().unwrap();
        assert_eq!(registrations.len(), 1);
        assert_eq!(registrations[0].device_code, "kiosk-test-device");
        assert_eq!(registrations[0].location_id, "tml_live_1");
        assert_eq!(backend.events_of_type("DEVICE_REGISTERED").len(), 1);
    }

    #[tokio::test]
    async fn test_registration_failure_does_not_block_payment() {
        let backend = MockBackend::new();
        backend.set_fail_register(true);
        let terminal = Arc::new(SimulatedTerminal::new());
        let orchestrator = orchestrator(&backend, &terminal);

        let outcome = orchestrator.process(&one_time_request(2500)).await;
        assert!(outcome.is_completed());

        // Still unregistered, so the next payment tries again.
        backend.set_fail_register(false);
        orchestrator.process(&one_time_request(2500)).await;
        assert_eq!(backend.registrations.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_location_falls_back_when_lookup_fails() {
        let backend = MockBackend::new();
        backend.set_fail_location(true);
        let terminal = Arc::new(SimulatedTerminal::new());
        let orchestrator = orchestrator(&backend, &terminal);

        let outcome = orchestrator.process(&one_time_request(2500)).await;
        assert!(outcome.is_completed());

        let registrations = backend.registrations.lock().unwrap();
        assert_eq!(registrations[0].location_id, "tml_GMwgTw8OHAJtnR");
    }
}
