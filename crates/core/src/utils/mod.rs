//! Shared helpers for money amounts.

mod money_utils;


pub use money_utils::*;
