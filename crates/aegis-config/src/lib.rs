pub mod global;
pub mod loader;

pub use global::{
    BruteForceGlobalConfig, GlobalConfig, RateLimitGlobalConfig, SessionGlobalConfig, SystemConfig,
};
pub use loader::ConfigLoader;
