use serde_json::Value;
use std::collections::HashMap;

/// 脱敏占位符
pub const REDACTED: &str = "[REDACTED]";

/// 敏感字段名模式（子串匹配，不区分大小写）
const SENSITIVE_PATTERNS: &[&str] = &[
    "password",
    "passwd",
    "token",
    "secret",
    "key",
    "credential",
    "authorization",
    "cookie",
];

/// 判断字段名是否敏感
pub fn is_sensitive_field(name: &str) -> bool {
    let lower = name.to_lowercase();
    SENSITIVE_PATTERNS.iter().any(|p| lower.contains(p))
}

/// 对字段表做脱敏，敏感字段的值替换为占位符
pub fn redact_fields(fields: &HashMap<String, Value>) -> HashMap<String, Value> {
    fields
        .iter()
        .map(|(k, v)| {
            if is_sensitive_field(k) {
                (k.clone(), Value::String(REDACTED.to_string()))
            } else {
                (k.clone(), v.clone())
            }
        })
        .collect()
}
