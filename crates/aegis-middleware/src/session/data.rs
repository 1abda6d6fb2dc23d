use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 会话数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    /// 会话 ID
    pub session_id: String,

    /// 用户 ID
    pub user_id: String,

    /// 创建时间
    pub created_at: DateTime<Utc>,

    /// 过期时间
    pub expires_at: DateTime<Utc>,

    /// 附加数据
    pub data: HashMap<String, serde_json::Value>,
}

impl SessionData {
    /// 创建新的会话数据
    pub fn new(user_id: String, data: HashMap<String, serde_json::Value>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            session_id: generate_session_id(),
            user_id,
            created_at: now,
            expires_at: now + ttl,
            data,
        }
    }

    /// 添加附加数据
    pub fn with_data_entry(mut self, key: String, value: serde_json::Value) -> Self {
        self.data.insert(key, value);
        self
    }

    /// 检查会话是否过期
    ///
    /// 恰好到达过期时间仍视为有效，严格超过才算过期。
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }

    /// 将过期时间重置为 now + ttl
    pub fn extend(&mut self, ttl: Duration) {
        self.expires_at = Utc::now() + ttl;
    }

    /// 浅合并附加数据，同名键被覆盖，其余键不变
    pub fn merge_data(&mut self, partial: HashMap<String, serde_json::Value>) {
        for (key, value) in partial {
            self.data.insert(key, value);
        }
    }
}

/// 生成会话 ID（128 位 CSPRNG 随机数，十六进制编码）
pub fn generate_session_id() -> String {
    let mut bytes = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
