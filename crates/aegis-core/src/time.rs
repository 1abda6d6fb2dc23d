use chrono::Utc;

/// 当前时间（毫秒时间戳）
///
/// 过期判断、限流窗口等所有时间运算统一使用毫秒时间戳。
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
