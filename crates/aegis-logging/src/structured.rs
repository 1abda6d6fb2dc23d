use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::sanitize;

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => LogLevel::Trace,
            tracing::Level::DEBUG => LogLevel::Debug,
            tracing::Level::INFO => LogLevel::Info,
            tracing::Level::WARN => LogLevel::Warn,
            tracing::Level::ERROR => LogLevel::Error,
        }
    }
}

/// 结构化日志条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// 时间戳
    pub timestamp: DateTime<Utc>,

    /// 日志级别
    pub level: LogLevel,

    /// 日志消息
    pub message: String,

    /// 日志目标（模块路径）
    pub target: String,

    /// 服务名称
    pub service_name: String,

    /// 主机名
    pub host: String,

    /// 环境（dev/staging/production）
    pub environment: String,

    /// 自定义字段
    #[serde(flatten)]
    pub fields: HashMap<String, serde_json::Value>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: String, target: String) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message,
            target,
            service_name: "aegis".to_string(),
            host: hostname::get()
                .ok()
                .and_then(|h| h.into_string().ok())
                .unwrap_or_else(|| "unknown".to_string()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            fields: HashMap::new(),
        }
    }

    pub fn with_field(mut self, key: String, value: serde_json::Value) -> Self {
        self.fields.insert(key, value);
        self
    }

    /// 序列化为 JSON，敏感字段在写出前脱敏
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut sanitized = self.clone();
        sanitized.fields = sanitize::redact_fields(&self.fields);
        serde_json::to_string(&sanitized)
    }

    /// 将条目写入审计日志流
    pub fn emit(&self) {
        match self.to_json() {
            Ok(json) => tracing::info!(target: "aegis::audit", entry = %json),
            Err(e) => tracing::warn!(error = %e, "Failed to serialize audit log entry"),
        }
    }
}

/// 结构化日志构建器
pub struct LogEntryBuilder {
    entry: LogEntry,
}

impl LogEntryBuilder {
    pub fn new(level: LogLevel, message: String) -> Self {
        Self {
            entry: LogEntry::new(level, message, "unknown".to_string()),
        }
    }

    pub fn target(mut self, target: String) -> Self {
        self.entry.target = target;
        self
    }

    pub fn field(mut self, key: String, value: serde_json::Value) -> Self {
        self.entry.fields.insert(key, value);
        self
    }

    pub fn build(self) -> LogEntry {
        self.entry
    }
}
