pub mod limiter;
pub mod middleware;

pub use limiter::{RateLimitRule, RateLimiter};
pub use middleware::rate_limit_middleware;
