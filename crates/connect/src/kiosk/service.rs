//! The kiosk's screen flow service.
//!
//! Owns the session and the step machine, and calls the backend and the
//! payment orchestrator on behalf of whatever shell drives the screens.
//! One instance serves one kiosk; methods take `&mut self` and the
//! session needs no locks.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use log::{info, warn};

use super::models::GiftChoice;
use crate::api::{
    DonorConsentIn, DonorUpsertIn, FundraiserLoginIn, KioskBackend, SendSmsIn, SignatureUploadIn,
};
use crate::payment::{
    PaymentConfig, PaymentOrchestrator, PaymentOutcome, PaymentProgressReporter, PaymentRequest,
};
use crate::terminal::TerminalConnector;
use crate::verify::{VerifyDecision, VerifyPoller, VerifyStatusSink};
use pledgepoint_core::donors::DonorForm;
use pledgepoint_core::errors::{Error, Result};
use pledgepoint_core::flow::{after_comms, FlowState, FlowStep};
use pledgepoint_core::gifts::{GiftKind, SelectedGift};
use pledgepoint_core::session::{normalize_fundraiser_id, Consents, Session};

/// Drives one donor at a time through the donation flow.
pub struct KioskFlow {
    backend: Arc<dyn KioskBackend>,
    orchestrator: PaymentOrchestrator,
    poller: VerifyPoller,
    session: Option<Session>,
    flow: FlowState,
}

impl KioskFlow {
    pub fn new(
        backend: Arc<dyn KioskBackend>,
        terminal: Arc<dyn TerminalConnector>,
        progress: Arc<dyn PaymentProgressReporter>,
        status: Arc<dyn VerifyStatusSink>,
        payment_config: PaymentConfig,
    ) -> Self {
        let orchestrator =
            PaymentOrchestrator::new(backend.clone(), terminal, progress, payment_config);
        let poller = VerifyPoller::new(backend.clone(), status);
        Self {
            backend,
            orchestrator,
            poller,
            session: None,
            flow: FlowState::new(),
        }
    }

    pub fn step(&self) -> FlowStep {
        self.flow.step()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Log the fundraiser in and build the session from the response.
    ///
    /// Keypad input normalizes to `FR` + digits before the call; whether
    /// the id exists is the backend's call.
    pub async fn login(&mut self, raw_fundraiser_id: &str) -> Result<()> {
        self.ensure_step(FlowStep::Login)?;
        let fundraiser_id = normalize_fundraiser_id(raw_fundraiser_id);
        info!("[KioskFlow] Logging in fundraiser {}", fundraiser_id);

        let out = self
            .backend
            .login(FundraiserLoginIn {
                fundraiser_id: fundraiser_id.clone(),
            })
            .await?;
        let session = Session::from_login(
            fundraiser_id,
            out.session_id,
            out.fundraiser,
            out.charity,
            out.campaign.as_ref(),
        );
        self.flow.advance_to(FlowStep::Campaign)?;
        self.session = Some(session);
        Ok(())
    }

    /// Move from the campaign pitch to a blank donor form.
    pub fn start_donation(&mut self) -> Result<()> {
        self.ensure_step(FlowStep::Campaign)?;
        self.session_ref()?;
        self.flow.advance_to(FlowStep::Donor)
    }

    /// Validate and upsert the donor, caching the id and contact fields.
    ///
    /// The raw form stays on the session so backing up re-presents what
    /// was typed. The backend layers its own eligibility rules on top;
    /// a rejection surfaces as a normal API error and the step repeats.
    pub async fn submit_donor(&mut self, form: DonorForm) -> Result<String> {
        self.ensure_step(FlowStep::Donor)?;
        let profile = form.validate()?;
        self.session_mut()?.donor_form = form;

        let (fundraiser_id, session_id) = {
            let session = self.session_ref()?;
            (session.fundraiser_id.clone(), session.session_id.clone())
        };
        let out = self
            .backend
            .upsert_donor(DonorUpsertIn::from_profile(
                &profile,
                &fundraiser_id,
                &session_id,
            ))
            .await?;
        info!("[KioskFlow] Donor upserted as {}", out.donor_id);

        self.session_mut()?.cache_donor(out.donor_id.clone(), &profile);
        self.flow.advance_to(FlowStep::Gift)?;
        Ok(out.donor_id)
    }

    /// Lock in the gift and text the donor a confirmation request.
    ///
    /// The gift is cached on the session before the send, so a failed
    /// text leaves the selection in place for retry. Recurring gifts
    /// resolve their catalog price here; a product the catalog does not
    /// know is tolerated until the payment step.
    pub async fn choose_gift(&mut self, choice: GiftChoice, terms_agreed: bool) -> Result<()> {
        self.ensure_step(FlowStep::Gift)?;

        let (session_id, donor_id, phone, charity_name, campaign) = {
            let session = self.session_ref()?;
            (
                session.session_id.clone(),
                session.donor_id.clone(),
                session.donor_phone_e164.clone().unwrap_or_default(),
                session.charity_name.clone(),
                session.campaign_or_default(),
            )
        };
        let donor_id =
            donor_id.ok_or_else(|| Error::Rule("No donor on file for this session".to_string()))?;
        if phone.is_empty() {
            return Err(Error::Rule(
                "Missing donor phone - go back and re-enter.".to_string(),
            ));
        }
        if !terms_agreed {
            return Err(Error::Rule(
                "Please agree to the Terms & Conditions.".to_string(),
            ));
        }

        let mut gift = match choice {
            GiftChoice::Monthly { amount_cents } => SelectedGift::recurring(
                amount_cents.unwrap_or_else(|| campaign.default_preset()),
                &campaign.currency,
            ),
            GiftChoice::OneTime { amount_text } => SelectedGift::one_time_from_text(
                &amount_text,
                campaign.min_amount_cents,
                &campaign.currency,
            )?,
        };

        if gift.kind == GiftKind::Recurring {
            let campaign_id = campaign.campaign_id.clone().unwrap_or_default();
            match self
                .backend
                .lookup_product(&campaign_id, gift.amount_cents, &gift.currency, "MONTHLY")
                .await?
            {
                Some(product) => {
                    gift.price_id = Some(product.stripe_price_id);
                    gift.product_id = Some(product.product_id);
                }
                None => {
                    warn!(
                        "[KioskFlow] No catalog product for {} {} monthly",
                        gift.amount_cents, gift.currency
                    );
                }
            }
        }

        self.session_mut()?.selected_gift = Some(gift.clone());

        self.backend
            .send_verification_sms(SendSmsIn {
                to_e164: phone,
                session_id,
                donor_id,
                charity_name,
                gift_type: gift.kind,
                amount_cents: gift.amount_cents,
                currency: gift.currency.clone(),
                preview_message: None,
            })
            .await?;

        self.flow.advance_to(FlowStep::Verify)
    }

    /// Wait for the donor's SMS reply.
    ///
    /// YES advances to payment; NO returns to the donor form. Dropping
    /// the future (shell teardown, back navigation) abandons the wait
    /// without moving the flow.
    pub async fn await_verification(&mut self) -> Result<VerifyDecision> {
        self.ensure_step(FlowStep::Verify)?;
        let (session_id, donor_id) = self.correlation_ids()?;

        let decision = self.poller.await_reply(&session_id, &donor_id).await;
        match decision {
            VerifyDecision::Confirmed => self.flow.advance_to(FlowStep::Payment)?,
            VerifyDecision::Declined => self.flow.back()?,
        }
        Ok(decision)
    }

    /// Run the terminal payment for the selected gift.
    ///
    /// A completed payment moves to the comms step; a failed one stays
    /// here so the fundraiser can retry or back out.
    pub async fn take_payment(&mut self) -> Result<PaymentOutcome> {
        self.ensure_step(FlowStep::Payment)?;
        let request = {
            let session = self.session_ref()?;
            let donor_id = session
                .donor_id
                .clone()
                .ok_or_else(|| Error::Rule("No donor on file for this session".to_string()))?;
            let gift = session
                .selected_gift
                .clone()
                .ok_or_else(|| Error::Rule("No gift selected for this donor".to_string()))?;
            PaymentRequest {
                session_id: session.session_id.clone(),
                donor_id,
                gift,
            }
        };

        let outcome = self.orchestrator.process(&request).await;
        if outcome.is_completed() {
            self.flow.advance_to(FlowStep::Comms)?;
        }
        Ok(outcome)
    }

    /// Store communication preferences, best effort.
    ///
    /// A failed save comes back as a warning string; the donation is
    /// already through and the flow continues either way. Recurring
    /// gifts go on to the signature step, one-time gifts are done.
    pub async fn save_consents(&mut self, consents: Consents) -> Result<Option<String>> {
        self.ensure_step(FlowStep::Comms)?;
        let (session_id, donor_id) = self.correlation_ids()?;
        let kind = {
            let session = self.session_mut()?;
            session.consents = consents;
            session
                .selected_gift
                .as_ref()
                .map(|gift| gift.kind)
                .ok_or_else(|| Error::Rule("No gift selected for this donor".to_string()))?
        };

        let warning = match self
            .backend
            .update_consent(DonorConsentIn {
                session_id,
                donor_id,
                consent_sms: consents.sms,
                consent_email: consents.email,
                consent_mail: consents.mail,
            })
            .await
        {
            Ok(()) => None,
            Err(e) => {
                warn!("[KioskFlow] Consent save failed: {}", e);
                Some(format!(
                    "Saved payment, but failed to store communication preferences: {}",
                    e
                ))
            }
        };

        self.flow.advance_to(after_comms(kind))?;
        Ok(warning)
    }

    /// Upload the signed terms image for a recurring gift.
    ///
    /// Pass `None` when no signature pad is attached; the step is then
    /// skipped and the flow finishes.
    pub async fn submit_signature(&mut self, signature_png: Option<&[u8]>) -> Result<()> {
        self.ensure_step(FlowStep::Signature)?;
        if let Some(png) = signature_png {
            let (session_id, donor_id) = self.correlation_ids()?;
            let out = self
                .backend
                .upload_signature(SignatureUploadIn {
                    session_id,
                    donor_id,
                    signature_data: BASE64.encode(png),
                })
                .await?;
            info!("[KioskFlow] Signature stored as {}", out.signature_id);
        }
        self.flow.advance_to(FlowStep::Done)
    }

    /// Reset donor state and loop back to the campaign pitch.
    pub fn next_donor(&mut self) -> Result<()> {
        self.ensure_step(FlowStep::Done)?;
        self.session_mut()?.reset_for_next_donor();
        self.flow.advance_to(FlowStep::Campaign)
    }

    /// One screen back, along the edges the kiosk offers.
    pub fn back(&mut self) -> Result<()> {
        self.flow.back()
    }

    /// Tear the session down and return to the login screen.
    pub fn logout(&mut self) {
        info!("[KioskFlow] Logging out");
        self.session = None;
        self.flow = FlowState::new();
    }

    fn ensure_step(&self, expected: FlowStep) -> Result<()> {
        let current = self.flow.step();
        if current != expected {
            return Err(Error::Rule(format!(
                "Expected the {expected} step but the kiosk is at {current}"
            )));
        }
        Ok(())
    }

    /// Session and donor ids every post-donor call correlates on.
    fn correlation_ids(&self) -> Result<(String, String)> {
        let session = self.session_ref()?;
        let donor_id = session
            .donor_id
            .clone()
            .ok_or_else(|| Error::Rule("No donor on file for this session".to_string()))?;
        Ok((session.session_id.clone(), donor_id))
    }

    fn session_ref(&self) -> Result<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| Error::Rule("No fundraiser is logged in".to_string()))
    }

    fn session_mut(&mut self) -> Result<&mut Session> {
        self.session
            .as_mut()
            .ok_or_else(|| Error::Rule("No fundraiser is logged in".to_string()))
    }
}
