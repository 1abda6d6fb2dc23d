pub mod bruteforce;
pub mod hooks;
pub mod ratelimit;
pub mod session;

pub use bruteforce::{brute_force_middleware, BruteForceConfig, BruteForceProtection};
pub use hooks::{client_identity, DenyResponse};
pub use ratelimit::{rate_limit_middleware, RateLimitRule, RateLimiter};
pub use session::{
    session_middleware, MemorySessionStore, SessionContext, SessionData, SessionManager,
    SessionManagerConfig, SessionStore,
};
