use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use aegis_config::SessionGlobalConfig;
use aegis_core::{AegisError, Result};
use aegis_logging::{LogEntryBuilder, LogLevel};

use crate::ratelimit::{RateLimitRule, RateLimiter};

use super::{SessionData, SessionStore};

/// 会话管理器配置
#[derive(Debug, Clone)]
pub struct SessionManagerConfig {
    /// 后台清理间隔
    pub cleanup_interval: Duration,

    /// 单个用户创建会话的限流规则
    pub creation_rule: RateLimitRule,
}

impl Default for SessionManagerConfig {
    fn default() -> Self {
        Self {
            cleanup_interval: Duration::from_secs(300),
            creation_rule: RateLimitRule::per_minute(10),
        }
    }
}

impl SessionManagerConfig {
    /// 从全局配置构造
    pub fn from_global(config: &SessionGlobalConfig) -> Self {
        Self {
            cleanup_interval: Duration::from_millis(config.cleanup_interval_ms),
            creation_rule: RateLimitRule::new(
                config.creation_window_ms,
                config.max_creations_per_window,
            ),
        }
    }
}

/// 会话管理器
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    creation_limiter: RateLimiter,
    cleanup_handle: JoinHandle<()>,
}

impl SessionManager {
    /// 创建会话管理器并启动定期清理任务
    pub fn new(store: Arc<dyn SessionStore>, config: SessionManagerConfig) -> Self {
        let cleanup_handle = tokio::spawn(Self::cleanup_task(
            store.clone(),
            config.cleanup_interval,
        ));

        Self {
            store,
            creation_limiter: RateLimiter::new(vec![config.creation_rule]),
            cleanup_handle,
        }
    }

    /// 创建新会话
    ///
    /// 同一用户在窗口内的创建次数超限时返回 RateLimitExceeded，
    /// 调用方需要显式处理。
    pub async fn create_session(
        &self,
        user_id: &str,
        data: Option<HashMap<String, serde_json::Value>>,
    ) -> Result<SessionData> {
        if !self.creation_limiter.is_allowed(user_id).await {
            warn!(user_id = user_id, "Session creation rate limit exceeded");
            return Err(AegisError::RateLimitExceeded(user_id.to_string()));
        }

        let session = self.store.create(user_id, data.unwrap_or_default()).await?;

        LogEntryBuilder::new(LogLevel::Info, "Session created".to_string())
            .target("aegis::session".to_string())
            .field("session_id".to_string(), serde_json::json!(session.session_id))
            .field("user_id".to_string(), serde_json::json!(session.user_id))
            .build()
            .emit();

        Ok(session)
    }

    /// 获取会话
    pub async fn get_session(&self, session_id: &str) -> Result<Option<SessionData>> {
        self.store.get(session_id).await
    }

    /// 更新会话附加数据（浅合并）
    pub async fn update_session(
        &self,
        session_id: &str,
        data: HashMap<String, serde_json::Value>,
    ) -> Result<()> {
        self.store.update(session_id, data).await?;
        debug!(session_id = session_id, "Session updated");
        Ok(())
    }

    /// 删除会话
    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.store.delete(session_id).await?;

        LogEntryBuilder::new(LogLevel::Info, "Session deleted".to_string())
            .target("aegis::session".to_string())
            .field("session_id".to_string(), serde_json::json!(session_id))
            .build()
            .emit();

        Ok(())
    }

    /// 刷新会话（滑动过期）
    pub async fn refresh_session(&self, session_id: &str) -> Result<()> {
        self.store.refresh(session_id).await?;
        debug!(session_id = session_id, "Session refreshed");
        Ok(())
    }

    /// 停止后台清理任务
    ///
    /// 管理器销毁时也会自动停止，定时器不会在管理器之后存活。
    pub fn shutdown(&self) {
        self.cleanup_handle.abort();
        info!("Session cleanup task stopped");
    }

    /// 定期清理过期会话
    async fn cleanup_task(store: Arc<dyn SessionStore>, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        // interval 的第一次 tick 立即触发，跳过
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match store.cleanup().await {
                Ok(removed) => {
                    if removed > 0 {
                        info!(removed = removed, "Cleaned up expired sessions");
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to cleanup expired sessions");
                }
            }
        }
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.cleanup_handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use serde_json::json;

    fn manager_with(
        ttl: chrono::Duration,
        config: SessionManagerConfig,
    ) -> (Arc<MemorySessionStore>, SessionManager) {
        let store = Arc::new(MemorySessionStore::new(ttl));
        let manager = SessionManager::new(store.clone(), config);
        (store, manager)
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let (_, manager) = manager_with(
            chrono::Duration::hours(1),
            SessionManagerConfig::default(),
        );

        // 创建会话
        let session = manager
            .create_session("user123", None)
            .await
            .unwrap();
        assert_eq!(session.user_id, "user123");
        assert!(!session.session_id.is_empty());

        // 获取会话
        let loaded = manager.get_session(&session.session_id).await.unwrap();
        assert!(loaded.is_some());

        // 更新会话
        let mut partial = HashMap::new();
        partial.insert("role".to_string(), json!("admin"));
        manager
            .update_session(&session.session_id, partial)
            .await
            .unwrap();

        let loaded = manager.get_session(&session.session_id).await.unwrap().unwrap();
        assert_eq!(loaded.data.get("role"), Some(&json!("admin")));

        // 刷新会话
        manager.refresh_session(&session.session_id).await.unwrap();

        // 删除会话
        manager.delete_session(&session.session_id).await.unwrap();
        let deleted = manager.get_session(&session.session_id).await.unwrap();
        assert!(deleted.is_none());
    }

    #[tokio::test]
    async fn test_creation_rate_limit() {
        let config = SessionManagerConfig {
            creation_rule: RateLimitRule::new(60_000, 1),
            ..Default::default()
        };
        let (_, manager) = manager_with(chrono::Duration::hours(1), config);

        // 第一次创建成功
        assert!(manager.create_session("user123", None).await.is_ok());

        // 同一用户第二次创建被限流
        let result = manager.create_session("user123", None).await;
        assert!(matches!(result, Err(AegisError::RateLimitExceeded(_))));

        // 不同用户不受影响
        assert!(manager.create_session("user456", None).await.is_ok());
    }

    #[tokio::test]
    async fn test_config_wiring_from_global() {
        let mut global = SessionGlobalConfig::default();
        global.max_creations_per_window = 1;

        let store = Arc::new(MemorySessionStore::from_config(&global));
        let manager = SessionManager::new(store, SessionManagerConfig::from_global(&global));

        assert!(manager.create_session("user123", None).await.is_ok());
        let result = manager.create_session("user123", None).await;
        assert!(matches!(result, Err(AegisError::RateLimitExceeded(_))));
    }

    #[tokio::test]
    async fn test_cleanup_task_sweeps_without_reads() {
        let config = SessionManagerConfig {
            cleanup_interval: Duration::from_millis(50),
            ..Default::default()
        };
        let (store, manager) = manager_with(chrono::Duration::milliseconds(30), config);

        manager.create_session("user123", None).await.unwrap();
        assert_eq!(store.len().await, 1);

        // 等待会话过期并被后台任务清扫，期间不做任何读取
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_shutdown_stops_cleanup_task() {
        let (_, manager) = manager_with(
            chrono::Duration::hours(1),
            SessionManagerConfig::default(),
        );

        manager.shutdown();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(manager.cleanup_handle.is_finished());
    }
}
