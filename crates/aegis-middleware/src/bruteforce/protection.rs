use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};

use aegis_config::BruteForceGlobalConfig;
use aegis_core::now_millis;

/// 防暴力破解配置
#[derive(Debug, Clone)]
pub struct BruteForceConfig {
    /// 锁定前允许的失败次数
    pub max_attempts: u64,

    /// 锁定时长（毫秒），自最后一次失败起算
    pub lockout_duration_ms: i64,
}

impl Default for BruteForceConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            lockout_duration_ms: 15 * 60 * 1000,
        }
    }
}

/// 失败尝试记录
#[derive(Debug, Clone)]
struct FailedAttemptRecord {
    count: u64,
    last_attempt_at: i64,
}

/// 防暴力破解保护
///
/// 计数不滑动，只有解锁滑动：连续 max_attempts 次失败立即锁定，
/// 锁定自最后一次失败起持续 lockout_duration_ms，到期后记录整体清除。
pub struct BruteForceProtection {
    config: BruteForceConfig,
    attempts: Arc<RwLock<HashMap<String, FailedAttemptRecord>>>,
}

impl BruteForceProtection {
    pub fn new(config: BruteForceConfig) -> Self {
        Self {
            config,
            attempts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// 从全局配置构造
    pub fn from_config(config: &BruteForceGlobalConfig) -> Self {
        Self::new(BruteForceConfig {
            max_attempts: config.max_attempts,
            lockout_duration_ms: config.lockout_duration_ms,
        })
    }

    /// 记录一次失败尝试
    ///
    /// 已锁定后再调用会刷新 last_attempt_at，从而延长锁定；
    /// 调用方应先用 is_allowed 判定，锁定期间不要再记录。
    pub async fn record_failed_attempt(&self, identifier: &str) {
        let now = now_millis();
        let mut attempts = self.attempts.write().await;

        let record = attempts
            .entry(identifier.to_string())
            .or_insert_with(|| FailedAttemptRecord {
                count: 0,
                last_attempt_at: now,
            });

        record.count += 1;
        record.last_attempt_at = now;

        if record.count >= self.config.max_attempts {
            warn!(
                identifier = identifier,
                count = record.count,
                "Identifier locked out"
            );
        }
    }

    /// 清除失败记录，认证成功后必须调用
    pub async fn reset_attempts(&self, identifier: &str) {
        let mut attempts = self.attempts.write().await;
        if attempts.remove(identifier).is_some() {
            info!(identifier = identifier, "Failed attempts reset");
        }
    }

    /// 检查标识是否放行
    ///
    /// 锁定到期的记录先整体清除（不衰减），下一次失败从零开始计数。
    pub async fn is_allowed(&self, identifier: &str) -> bool {
        let now = now_millis();
        let mut attempts = self.attempts.write().await;

        let lock_expired = attempts.get(identifier).map_or(false, |record| {
            record.count >= self.config.max_attempts
                && now - record.last_attempt_at > self.config.lockout_duration_ms
        });

        if lock_expired {
            attempts.remove(identifier);
        }

        attempts
            .get(identifier)
            .map(|record| record.count < self.config.max_attempts)
            .unwrap_or(true)
    }

    /// 累计失败次数
    pub async fn failure_count(&self, identifier: &str) -> u64 {
        let attempts = self.attempts.read().await;
        attempts.get(identifier).map(|r| r.count).unwrap_or(0)
    }

    /// 是否处于锁定状态
    pub async fn is_locked_out(&self, identifier: &str) -> bool {
        !self.is_allowed(identifier).await
    }

    /// 剩余锁定时长，未锁定时返回 None
    pub async fn lockout_remaining(&self, identifier: &str) -> Option<Duration> {
        let now = now_millis();
        let attempts = self.attempts.read().await;
        let record = attempts.get(identifier)?;

        if record.count < self.config.max_attempts {
            return None;
        }

        let remaining = self.config.lockout_duration_ms - (now - record.last_attempt_at);
        if remaining > 0 {
            Some(Duration::from_millis(remaining as u64))
        } else {
            None
        }
    }
}

impl Clone for BruteForceProtection {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            attempts: self.attempts.clone(),
        }
    }
}
