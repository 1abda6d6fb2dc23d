use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use aegis_config::RateLimitGlobalConfig;
use aegis_core::now_millis;

/// 限流规则：窗口内最多允许 max_requests 个请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitRule {
    pub window_ms: i64,
    pub max_requests: u64,
}

impl RateLimitRule {
    pub fn new(window_ms: i64, max_requests: u64) -> Self {
        Self {
            window_ms,
            max_requests,
        }
    }

    /// 每分钟 N 个请求
    pub fn per_minute(max_requests: u64) -> Self {
        Self::new(60_000, max_requests)
    }

    /// 每秒 N 个请求
    pub fn per_second(max_requests: u64) -> Self {
        Self::new(1_000, max_requests)
    }
}

impl Default for RateLimitRule {
    fn default() -> Self {
        Self::new(60_000, 100)
    }
}

/// 单个计数窗口
#[derive(Debug, Clone)]
struct RateLimitInfo {
    count: u64,
    reset_time: i64,
}

/// 固定窗口限流器
///
/// 按 (客户端, 窗口) 维护计数器，所有规则同时生效。
pub struct RateLimiter {
    rules: Vec<RateLimitRule>,
    counters: Arc<RwLock<HashMap<(String, i64), RateLimitInfo>>>,
}

impl RateLimiter {
    /// 创建限流器，规则为空时使用默认规则
    pub fn new(rules: Vec<RateLimitRule>) -> Self {
        let rules = if rules.is_empty() {
            vec![RateLimitRule::default()]
        } else {
            rules
        };

        Self {
            rules,
            counters: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// 从全局配置构造
    pub fn from_config(config: &RateLimitGlobalConfig) -> Self {
        Self::new(vec![RateLimitRule::new(config.window_ms, config.max_requests)])
    }

    /// 检查请求是否放行
    ///
    /// 判定前先给所有规则计数，被拒绝的请求同样消耗每条规则的配额。
    /// 任何一条规则超限即拒绝。
    pub async fn is_allowed(&self, client_id: &str) -> bool {
        let now = now_millis();
        let mut counters = self.counters.write().await;

        // 每次调用先清理所有已过窗的计数器，复杂度与活跃键数成正比
        counters.retain(|_, info| now <= info.reset_time);

        let mut allowed = true;
        for rule in &self.rules {
            let key = (client_id.to_string(), rule.window_ms);
            let info = counters.entry(key).or_insert_with(|| RateLimitInfo {
                count: 0,
                reset_time: now + rule.window_ms,
            });

            if now > info.reset_time {
                // 窗口翻转，计数从 1 重新开始；恰好落在 reset_time
                // 上的请求仍计入旧窗口
                info.count = 1;
                info.reset_time = now + rule.window_ms;
            } else {
                info.count += 1;
            }

            if info.count > rule.max_requests {
                allowed = false;
            }
        }

        if !allowed {
            warn!(client_id = client_id, "Rate limit exceeded");
        }

        allowed
    }

    /// 管理用：清空某个客户端在所有规则下的计数
    pub async fn reset(&self, client_id: &str) {
        let mut counters = self.counters.write().await;
        counters.retain(|(client, _), _| client != client_id);
    }
}

impl Clone for RateLimiter {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
            counters: self.counters.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_first_request_always_passes() {
        let limiter = RateLimiter::new(vec![RateLimitRule::new(60_000, 1)]);
        assert!(limiter.is_allowed("192.168.1.1").await);
    }

    #[tokio::test]
    async fn test_window_limit_and_rollover() {
        let limiter = RateLimiter::new(vec![RateLimitRule::new(1_000, 2)]);

        // 窗口内前两个请求通过
        assert!(limiter.is_allowed("client").await);
        assert!(limiter.is_allowed("client").await);

        // 第三个请求被拒绝
        assert!(!limiter.is_allowed("client").await);

        // 窗口翻转后计数重置
        tokio::time::sleep(Duration::from_millis(1_100)).await;
        assert!(limiter.is_allowed("client").await);
    }

    #[tokio::test]
    async fn test_rejected_requests_consume_quota() {
        let limiter = RateLimiter::new(vec![RateLimitRule::new(60_000, 1)]);

        assert!(limiter.is_allowed("client").await);

        // 被拒绝的请求也会计数，窗口内不会因等待而恢复
        assert!(!limiter.is_allowed("client").await);
        assert!(!limiter.is_allowed("client").await);
    }

    #[tokio::test]
    async fn test_all_rules_enforced() {
        let limiter = RateLimiter::new(vec![
            RateLimitRule::new(1_000, 2),
            RateLimitRule::new(60_000, 3),
        ]);

        assert!(limiter.is_allowed("client").await);
        assert!(limiter.is_allowed("client").await);

        // 秒级规则先超限
        assert!(!limiter.is_allowed("client").await);

        // 秒级窗口翻转，但分钟级规则已经计到 4，仍然拒绝
        tokio::time::sleep(Duration::from_millis(1_100)).await;
        assert!(!limiter.is_allowed("client").await);
    }

    #[tokio::test]
    async fn test_clients_are_independent() {
        let limiter = RateLimiter::new(vec![RateLimitRule::new(60_000, 1)]);

        assert!(limiter.is_allowed("alice").await);
        assert!(!limiter.is_allowed("alice").await);

        assert!(limiter.is_allowed("bob").await);
    }

    #[tokio::test]
    async fn test_reset_clears_all_counters() {
        let limiter = RateLimiter::new(vec![
            RateLimitRule::new(1_000, 1),
            RateLimitRule::new(60_000, 1),
        ]);

        assert!(limiter.is_allowed("client").await);
        assert!(!limiter.is_allowed("client").await);

        limiter.reset("client").await;
        assert!(limiter.is_allowed("client").await);
    }

    #[tokio::test]
    async fn test_empty_rules_fall_back_to_default() {
        let limiter = RateLimiter::new(vec![]);
        assert_eq!(limiter.rules.len(), 1);
        assert_eq!(limiter.rules[0].max_requests, 100);
    }

    #[tokio::test]
    async fn test_from_config() {
        let config = RateLimitGlobalConfig {
            window_ms: 60_000,
            max_requests: 2,
        };
        let limiter = RateLimiter::from_config(&config);

        assert!(limiter.is_allowed("client").await);
        assert!(limiter.is_allowed("client").await);
        assert!(!limiter.is_allowed("client").await);
    }
}
