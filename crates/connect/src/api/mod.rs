mod models;
mod traits;

pub use models::*;
pub use traits::*;
