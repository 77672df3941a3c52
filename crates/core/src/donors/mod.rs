//! Donors module - intake form, validation, and phone normalization.

mod donors_model;


// Re-export the public interface
pub use donors_model::{normalize_phone_e164, DonorForm, DonorProfile};
