mod models;
mod orchestrator;
mod progress;

#[cfg(test)]
mod orchestrator_tests;

pub use models::*;
pub use orchestrator::{PaymentConfig, PaymentOrchestrator};
pub use progress::*;
