use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::hooks::{client_identity, deny};

use super::RateLimiter;

/// 限流中间件
///
/// 被拒绝的请求收到 429 和结构化错误体，除日志外没有其他副作用。
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request,
    next: Next,
) -> Response {
    let client_id = client_identity(&req);

    if limiter.is_allowed(&client_id).await {
        next.run(req).await
    } else {
        deny(StatusCode::TOO_MANY_REQUESTS, "rate_limit_exceeded")
    }
}
