//! Interactive console runner.
//!
//! One donor at a time, one prompt per screen. The flow service owns all
//! state; this module only renders it and feeds keyboard input back in.

use std::io::{self, Write};

use anyhow::Context;
use pledgepoint_connect::kiosk::GiftChoice;
use pledgepoint_connect::payment::{PaymentOutcome, PaymentProgressReporter, PaymentStage};
use pledgepoint_connect::verify::{VerifyDecision, VerifyStatusSink};
use pledgepoint_connect::KioskFlow;
use pledgepoint_core::donors::DonorForm;
use pledgepoint_core::flow::FlowStep;
use pledgepoint_core::session::Consents;
use pledgepoint_core::utils::{format_minor_units, text_to_minor_units};

use crate::config::Config;

/// Prints payment stages as operator-facing status lines.
pub struct ConsoleProgress;

impl PaymentProgressReporter for ConsoleProgress {
    fn report_stage(&self, stage: PaymentStage) {
        let label = match stage {
            PaymentStage::DiscoveringReaders => "Looking for card readers...",
            PaymentStage::ConnectingReader => "Connecting to reader...",
            PaymentStage::CreatingIntent => "Preparing payment...",
            PaymentStage::WaitingForTap => "Tap, insert, or swipe now",
            PaymentStage::Confirming => "Processing...",
            PaymentStage::StartingSubscription => "Setting up the monthly gift...",
        };
        println!("  {}", label);
    }

    fn report_outcome(&self, outcome: &PaymentOutcome) {
        match outcome {
            PaymentOutcome::Completed {
                payment_intent_id,
                subscription_id,
            } => {
                println!("  Payment approved ({})", payment_intent_id);
                if let Some(subscription_id) = subscription_id {
                    println!("  Monthly gift active ({})", subscription_id);
                }
            }
            PaymentOutcome::Failed { reason } => println!("  Payment failed: {}", reason),
        }
    }
}

/// Prints SMS verification updates.
pub struct ConsoleStatus;

impl VerifyStatusSink for ConsoleStatus {
    fn note(&self, message: &str) {
        println!("  {}", message);
    }
}

/// Drives the kiosk loop until the fundraiser quits at the login prompt.
pub async fn run(mut flow: KioskFlow, config: &Config) -> anyhow::Result<()> {
    println!("PledgePoint kiosk");
    let mut prefill = config.fundraiser_id.clone();

    loop {
        match flow.step() {
            FlowStep::Login => {
                let raw = match prefill.take() {
                    Some(id) => id,
                    None => {
                        let input = prompt("Fundraiser id ('q' to quit)")?;
                        if input.eq_ignore_ascii_case("q") {
                            return Ok(());
                        }
                        input
                    }
                };
                if let Err(e) = flow.login(&raw).await {
                    println!("Login failed: {}", e);
                }
            }

            FlowStep::Campaign => {
                let (charity_name, blurb, campaign) = {
                    let session = flow.session().context("no active session")?;
                    (
                        session.charity_name.clone(),
                        session.charity_blurb.clone(),
                        session.campaign_or_default(),
                    )
                };
                println!("\n=== {} ===", charity_name);
                if let Some(blurb) = blurb {
                    println!("{}", blurb);
                }
                let presets: Vec<String> = campaign
                    .preset_amounts
                    .iter()
                    .map(|cents| format_minor_units(*cents, &campaign.currency))
                    .collect();
                println!("Monthly presets: {}", presets.join(", "));
                println!(
                    "One-time minimum: {}",
                    format_minor_units(campaign.min_amount_cents, &campaign.currency)
                );

                let answer = prompt("Press Enter for a new donor, or 'q' to log out")?;
                if answer.eq_ignore_ascii_case("q") {
                    flow.logout();
                } else {
                    flow.start_donation()?;
                }
            }

            FlowStep::Donor => {
                let form = prompt_donor_form()?;
                if let Err(e) = flow.submit_donor(form).await {
                    println!("Donor intake failed: {}", e);
                }
            }

            FlowStep::Gift => {
                let campaign = flow
                    .session()
                    .context("no active session")?
                    .campaign_or_default();
                let input = prompt(&format!(
                    "Monthly amount in {} (Enter for {}), or 'o' for one-time",
                    campaign.currency,
                    format_minor_units(campaign.default_preset(), &campaign.currency)
                ))?;
                let choice = if input.eq_ignore_ascii_case("o") {
                    let amount_text = prompt("One-time amount")?;
                    GiftChoice::OneTime { amount_text }
                } else if input.is_empty() {
                    GiftChoice::Monthly { amount_cents: None }
                } else {
                    match text_to_minor_units(&input) {
                        Some(cents) => GiftChoice::Monthly {
                            amount_cents: Some(cents),
                        },
                        None => {
                            println!("Enter a dollar amount or 'o'.");
                            continue;
                        }
                    }
                };
                let terms = prompt_yes_no("Agree to the Terms & Conditions?", false)?;
                if let Err(e) = flow.choose_gift(choice, terms).await {
                    println!("{}", e);
                }
            }

            FlowStep::Verify => {
                let decision = flow.await_verification().await?;
                if decision == VerifyDecision::Declined {
                    println!("Back to the donor form.");
                }
            }

            FlowStep::Payment => {
                prompt("Press Enter to present the card")?;
                let outcome = flow.take_payment().await?;
                if let PaymentOutcome::Failed { .. } = outcome {
                    if !prompt_yes_no("Try the card again?", true)? {
                        flow.back()?;
                    }
                }
            }

            FlowStep::Comms => {
                println!("Communication preferences:");
                let consents = Consents {
                    sms: prompt_yes_no("Text updates", true)?,
                    email: prompt_yes_no("Email updates", true)?,
                    mail: prompt_yes_no("Postal mail", true)?,
                };
                if let Some(warning) = flow.save_consents(consents).await? {
                    println!("{}", warning);
                }
            }

            FlowStep::Signature => {
                let payload = signature_payload(config);
                let result = match &payload {
                    Some(bytes) => flow.submit_signature(Some(bytes)).await,
                    None => flow.submit_signature(None).await,
                };
                if let Err(e) = result {
                    println!("Signature upload failed: {}", e);
                    flow.submit_signature(None).await?;
                }
            }

            FlowStep::Done => {
                println!("\nThank you! Donation complete.\n");
                let answer = prompt("Press Enter for the next donor, or 'q' to log out")?;
                if answer.eq_ignore_ascii_case("q") {
                    flow.logout();
                } else {
                    flow.next_donor()?;
                }
            }
        }
    }
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    let read = io::stdin().read_line(&mut line)?;
    if read == 0 {
        anyhow::bail!("stdin closed");
    }
    Ok(line.trim().to_string())
}

fn prompt_yes_no(label: &str, default_yes: bool) -> anyhow::Result<bool> {
    let suffix = if default_yes { "Y/n" } else { "y/N" };
    let answer = prompt(&format!("{} [{}]", label, suffix))?;
    Ok(match answer.to_lowercase().as_str() {
        "" => default_yes,
        "y" | "yes" => true,
        _ => false,
    })
}

fn prompt_donor_form() -> anyhow::Result<DonorForm> {
    println!("\nNew donor. Optional fields may be left blank.");
    Ok(DonorForm {
        title: prompt("Title (optional)")?,
        first_name: prompt("First name")?,
        middle_name: prompt("Middle name (optional)")?,
        last_name: prompt("Last name")?,
        dob: prompt("Date of birth (YYYY-MM-DD)")?,
        mobile: prompt("Mobile phone")?,
        email: prompt("Email")?,
        address1: prompt("Address line 1")?,
        address2: prompt("Address line 2 (optional)")?,
        city: prompt("City")?,
        region: prompt("Province/State")?,
        postal_code: prompt("Postal code")?,
        ..DonorForm::default()
    })
}

/// Signature bytes from the configured file, when readable.
fn signature_payload(config: &Config) -> Option<Vec<u8>> {
    let path = config.signature_png.as_ref()?;
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            println!("Could not read signature file {}: {}", path, e);
            None
        }
    }
}
