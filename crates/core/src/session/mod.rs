//! Session module - fundraiser shift state and login normalization.

mod session_model;

#[cfg(test)]
mod session_model_tests;

// Re-export the public interface
pub use session_model::{
    normalize_fundraiser_id, CharityPayload, Consents, FundraiserPayload, Session,
};
