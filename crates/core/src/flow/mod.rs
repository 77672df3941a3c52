//! Flow module - screen ordering for the kiosk.

mod flow_model;


// Re-export the public interface
pub use flow_model::{after_comms, FlowState, FlowStep};
