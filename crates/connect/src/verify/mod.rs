mod poller;
mod progress;


pub use poller::{VerifyDecision, VerifyPoller};
pub use progress::*;
