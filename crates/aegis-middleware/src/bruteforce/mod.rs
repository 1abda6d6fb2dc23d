pub mod middleware;
pub mod protection;

pub use middleware::brute_force_middleware;
pub use protection::{BruteForceConfig, BruteForceProtection};
