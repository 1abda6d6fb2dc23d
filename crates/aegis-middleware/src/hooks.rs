use axum::{
    extract::{ConnectInfo, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::net::SocketAddr;

/// 结构化拒绝响应
///
/// 只携带类别和状态码，不暴露计数器等内部状态。
#[derive(Debug, Serialize)]
pub struct DenyResponse {
    pub error: &'static str,
    pub code: u16,
}

/// 构造拒绝响应
pub fn deny(status: StatusCode, error: &'static str) -> Response {
    (
        status,
        Json(DenyResponse {
            error,
            code: status.as_u16(),
        }),
    )
        .into_response()
}

/// 提取客户端标识
///
/// 优先取连接地址，其次取 X-Forwarded-For 的第一跳（反向代理场景）。
pub fn client_identity(req: &Request) -> String {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    if let Some(xff) = req.headers().get("X-Forwarded-For") {
        if let Ok(value) = xff.to_str() {
            if let Some(first) = value.split(',').next() {
                let first = first.trim();
                if !first.is_empty() {
                    return first.to_string();
                }
            }
        }
    }

    "unknown".to_string()
}
