//! Campaigns module - donation parameters for the active campaign.

mod campaigns_model;


// Re-export the public interface
pub use campaigns_model::{CampaignConfig, CampaignPayload, RawAmount, RawAmountList};
