pub mod error;
pub mod time;

pub use error::{AegisError, Result};
pub use time::now_millis;
