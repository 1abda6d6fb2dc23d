use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use aegis_config::SessionGlobalConfig;
use aegis_core::Result;

use super::SessionData;

/// 会话存储 trait
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// 创建会话并返回完整记录
    async fn create(
        &self,
        user_id: &str,
        data: HashMap<String, serde_json::Value>,
    ) -> Result<SessionData>;

    /// 读取会话
    ///
    /// 已过期的记录在读取时惰性删除并返回 None，过期记录绝不外泄。
    async fn get(&self, session_id: &str) -> Result<Option<SessionData>>;

    /// 浅合并附加数据，会话不存在或已过期时不做任何事
    async fn update(
        &self,
        session_id: &str,
        data: HashMap<String, serde_json::Value>,
    ) -> Result<()>;

    /// 删除会话（幂等）
    async fn delete(&self, session_id: &str) -> Result<()>;

    /// 将过期时间重置为 now + ttl，会话不存在时不做任何事
    async fn refresh(&self, session_id: &str) -> Result<()>;

    /// 清理所有已过期会话，返回删除数量
    async fn cleanup(&self) -> Result<u64>;
}

/// 内存会话存储（单进程）
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// 从全局配置构造
    pub fn from_config(config: &SessionGlobalConfig) -> Self {
        Self::new(Duration::milliseconds(config.ttl_ms))
    }

    /// 当前存储的会话数量（含未清理的过期会话）
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(
        &self,
        user_id: &str,
        data: HashMap<String, serde_json::Value>,
    ) -> Result<SessionData> {
        // ID 空间足够大，不做碰撞重试
        let session = SessionData::new(user_id.to_string(), data, self.ttl);

        let mut sessions = self.sessions.write().await;
        sessions.insert(session.session_id.clone(), session.clone());

        Ok(session)
    }

    async fn get(&self, session_id: &str) -> Result<Option<SessionData>> {
        let mut sessions = self.sessions.write().await;

        let expired = sessions
            .get(session_id)
            .map(|session| session.is_expired())
            .unwrap_or(false);

        if expired {
            sessions.remove(session_id);
            return Ok(None);
        }

        Ok(sessions.get(session_id).cloned())
    }

    async fn update(
        &self,
        session_id: &str,
        data: HashMap<String, serde_json::Value>,
    ) -> Result<()> {
        let mut sessions = self.sessions.write().await;

        if let Some(session) = sessions.get_mut(session_id) {
            if !session.is_expired() {
                session.merge_data(data);
            }
        }

        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id);
        Ok(())
    }

    async fn refresh(&self, session_id: &str) -> Result<()> {
        let mut sessions = self.sessions.write().await;

        // 只要尚未被删除就续期，不看剩余 TTL
        if let Some(session) = sessions.get_mut(session_id) {
            session.extend(self.ttl);
        }

        Ok(())
    }

    async fn cleanup(&self) -> Result<u64> {
        let mut sessions = self.sessions.write().await;
        let before_count = sessions.len();
        let now = Utc::now();

        sessions.retain(|_, session| session.expires_at >= now);

        let removed = (before_count - sessions.len()) as u64;
        Ok(removed)
    }
}
