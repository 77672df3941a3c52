//! In-memory reader for development builds.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use uuid::Uuid;

use super::models::{Reader, TerminalIntent, TerminalIntentStatus};
use super::traits::TerminalConnector;
use pledgepoint_core::errors::{Error, Result};

/// How long the simulator pretends to wait for a tap.
const SIMULATED_TAP_DELAY_MS: u64 = 250;

/// An in-memory reader for development and tests.
///
/// Discovery always finds the one configured reader, collect approves
/// the tap after a short pause, and the failure switches let callers
/// exercise every error path without hardware.
pub struct SimulatedTerminal {
    reader: Reader,
    connected: Mutex<Option<Reader>>,
    intents: Mutex<HashMap<String, TerminalIntent>>,
    fail_discovery: Mutex<bool>,
    fail_collect: Mutex<bool>,
    fail_confirm: Mutex<bool>,
}

impl SimulatedTerminal {
    pub fn new() -> Self {
        Self::with_reader(Reader {
            serial_number: "SIM-READER-001".to_string(),
            label: Some("Simulated reader".to_string()),
            device_type: "simulated_wisepos_e".to_string(),
        })
    }

    pub fn with_reader(reader: Reader) -> Self {
        Self {
            reader,
            connected: Mutex::new(None),
            intents: Mutex::new(HashMap::new()),
            fail_discovery: Mutex::new(false),
            fail_collect: Mutex::new(false),
            fail_confirm: Mutex::new(false),
        }
    }

    /// Make the next discovery return no readers.
    pub fn set_fail_discovery(&self, fail: bool) {
        *self.fail_discovery.lock().unwrap() = fail;
    }

    /// Make collect fail as if the card could not be read.
    pub fn set_fail_collect(&self, fail: bool) {
        *self.fail_collect.lock().unwrap() = fail;
    }

    /// Make confirm fail as if the charge was declined.
    pub fn set_fail_confirm(&self, fail: bool) {
        *self.fail_confirm.lock().unwrap() = fail;
    }

    fn update_status(
        &self,
        intent: &TerminalIntent,
        status: TerminalIntentStatus,
    ) -> TerminalIntent {
        let updated = TerminalIntent {
            id: intent.id.clone(),
            client_secret: intent.client_secret.clone(),
            status,
        };
        self.intents
            .lock()
            .unwrap()
            .insert(updated.client_secret.clone(), updated.clone());
        updated
    }
}

impl Default for SimulatedTerminal {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TerminalConnector for SimulatedTerminal {
    async fn discover_readers(&self) -> Result<Vec<Reader>> {
        if *self.fail_discovery.lock().unwrap() {
            debug!("[SimTerminal] discovery returned no readers");
            return Ok(Vec::new());
        }
        Ok(vec![self.reader.clone()])
    }

    async fn connect_reader(&self, reader: &Reader, location_id: &str) -> Result<Reader> {
        info!(
            "[SimTerminal] connected reader {} at {}",
            reader.serial_number, location_id
        );
        *self.connected.lock().unwrap() = Some(reader.clone());
        Ok(reader.clone())
    }

    async fn connected_reader(&self) -> Option<Reader> {
        self.connected.lock().unwrap().clone()
    }

    async fn retrieve_payment_intent(&self, client_secret: &str) -> Result<TerminalIntent> {
        if let Some(known) = self.intents.lock().unwrap().get(client_secret) {
            return Ok(known.clone());
        }
        // Client secrets look like "<intent id>_secret_<nonce>".
        let id = match client_secret.split("_secret").next() {
            Some(prefix) if !prefix.is_empty() => prefix.to_string(),
            _ => format!("pi_sim_{}", Uuid::new_v4().simple()),
        };
        let intent = TerminalIntent {
            id,
            client_secret: client_secret.to_string(),
            status: TerminalIntentStatus::RequiresPaymentMethod,
        };
        self.intents
            .lock()
            .unwrap()
            .insert(client_secret.to_string(), intent.clone());
        Ok(intent)
    }

    async fn collect_payment_method(&self, intent: &TerminalIntent) -> Result<TerminalIntent> {
        if self.connected_reader().await.is_none() {
            return Err(Error::Terminal("No reader connected".to_string()));
        }
        tokio::time::sleep(Duration::from_millis(SIMULATED_TAP_DELAY_MS)).await;
        if *self.fail_collect.lock().unwrap() {
            return Err(Error::Terminal("Card read failed".to_string()));
        }
        Ok(self.update_status(intent, TerminalIntentStatus::RequiresConfirmation))
    }

    async fn confirm_payment_intent(&self, intent: &TerminalIntent) -> Result<TerminalIntent> {
        if *self.fail_confirm.lock().unwrap() {
            self.update_status(intent, TerminalIntentStatus::Canceled);
            return Err(Error::Terminal("Payment declined".to_string()));
        }
        Ok(self.update_status(intent, TerminalIntentStatus::Succeeded))
    }
}
