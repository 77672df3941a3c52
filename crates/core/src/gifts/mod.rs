//! Gifts module - gift kind and the donor's selection.

mod gifts_model;


// Re-export the public interface
pub use gifts_model::{GiftKind, SelectedGift};
