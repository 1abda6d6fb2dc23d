use serde::{Deserialize, Serialize};

/// 全局配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GlobalConfig {
    pub system: SystemConfig,
    pub session: SessionGlobalConfig,
    pub rate_limit: RateLimitGlobalConfig,
    pub brute_force: BruteForceGlobalConfig,
}

/// 系统配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SystemConfig {
    pub name: String,
    pub version: String,
}

/// 会话全局配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionGlobalConfig {
    /// 会话存活时间（毫秒）
    pub ttl_ms: i64,

    /// 后台清理间隔（毫秒）
    pub cleanup_interval_ms: u64,

    /// 单个用户创建会话的限流窗口（毫秒）
    pub creation_window_ms: i64,

    /// 窗口内允许的最大创建次数
    pub max_creations_per_window: u64,
}

/// 限流全局配置（默认规则）
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitGlobalConfig {
    /// 计数窗口（毫秒）
    pub window_ms: i64,

    /// 窗口内允许的最大请求数
    pub max_requests: u64,
}

/// 防暴力破解全局配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BruteForceGlobalConfig {
    /// 锁定前允许的失败次数
    pub max_attempts: u64,

    /// 锁定时长（毫秒），自最后一次失败起算
    pub lockout_duration_ms: i64,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            system: SystemConfig {
                name: "Aegis Security Middleware".to_string(),
                version: "1.0.0".to_string(),
            },
            session: SessionGlobalConfig::default(),
            rate_limit: RateLimitGlobalConfig::default(),
            brute_force: BruteForceGlobalConfig::default(),
        }
    }
}

impl Default for SessionGlobalConfig {
    fn default() -> Self {
        Self {
            ttl_ms: 30 * 60 * 1000,          // 30 分钟
            cleanup_interval_ms: 300_000,    // 5 分钟
            creation_window_ms: 60_000,
            max_creations_per_window: 10,
        }
    }
}

impl Default for RateLimitGlobalConfig {
    fn default() -> Self {
        Self {
            window_ms: 60_000,
            max_requests: 100,
        }
    }
}

impl Default for BruteForceGlobalConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            lockout_duration_ms: 15 * 60 * 1000, // 15 分钟
        }
    }
}
