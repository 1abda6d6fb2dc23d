use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

use crate::hooks::{client_identity, deny};

use super::BruteForceProtection;

/// 防暴力破解中间件
///
/// 放在登录等敏感路由之前，锁定中的客户端收到 403 和结构化错误体。
pub async fn brute_force_middleware(
    State(protection): State<Arc<BruteForceProtection>>,
    req: Request,
    next: Next,
) -> Response {
    let identifier = client_identity(&req);

    if protection.is_allowed(&identifier).await {
        next.run(req).await
    } else {
        warn!(identifier = %identifier, "Request denied: identifier locked out");
        deny(StatusCode::FORBIDDEN, "locked_out")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bruteforce::BruteForceConfig;
    use axum::{
        body::Body,
        http::Request as HttpRequest,
        middleware,
        routing::post,
        Router,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app(protection: Arc<BruteForceProtection>) -> Router {
        Router::new()
            .route("/login", post(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(
                protection,
                brute_force_middleware,
            ))
    }

    fn request(ip: &str) -> HttpRequest<Body> {
        HttpRequest::builder()
            .method("POST")
            .uri("/login")
            .header("X-Forwarded-For", ip)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_locked_identifier_gets_403() {
        let protection = Arc::new(BruteForceProtection::new(BruteForceConfig {
            max_attempts: 1,
            lockout_duration_ms: 60_000,
        }));
        protection.record_failed_attempt("203.0.113.9").await;

        let response = app(protection)
            .oneshot(request("203.0.113.9"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "locked_out");
        assert_eq!(body["code"], 403);
    }

    #[tokio::test]
    async fn test_unlocked_identifier_passes_through() {
        let protection = Arc::new(BruteForceProtection::new(BruteForceConfig::default()));

        let response = app(protection)
            .oneshot(request("203.0.113.10"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
