//! Events module - analytics events the kiosk reports to the backend.

mod kiosk_event;

pub use kiosk_event::*;
