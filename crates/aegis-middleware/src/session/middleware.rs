use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::error;

use super::{SessionData, SessionManager};

/// 会话 Cookie 名称
pub const SESSION_COOKIE: &str = "aegis_session";

/// 请求上下文中的会话标记
///
/// Missing 表示已检查但没有有效会话，下游可以据此区分
/// "未认证"和"尚未检查"。
#[derive(Debug, Clone)]
pub enum SessionContext {
    Active(SessionData),
    Missing,
}

/// 会话拦截中间件
///
/// 命中会话时先刷新再回读，挂到请求上的是刷新后的记录（滑动过期）。
/// 查找或刷新过程中的任何内部错误只记日志，按无会话处理，
/// 绝不让会话层故障中断请求处理。
pub async fn session_middleware(
    State(manager): State<Arc<SessionManager>>,
    mut req: Request,
    next: Next,
) -> Response {
    let context = match extract_session_id(&req) {
        Some(session_id) => match resolve_session(&manager, &session_id).await {
            Some(session) => SessionContext::Active(session),
            None => SessionContext::Missing,
        },
        None => SessionContext::Missing,
    };

    req.extensions_mut().insert(context);
    next.run(req).await
}

/// 查找并刷新会话，任何内部错误都降级为无会话
async fn resolve_session(manager: &SessionManager, session_id: &str) -> Option<SessionData> {
    match manager.get_session(session_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return None,
        Err(e) => {
            error!(error = %e, "Session lookup failed");
            return None;
        }
    }

    if let Err(e) = manager.refresh_session(session_id).await {
        error!(error = %e, "Session refresh failed");
        return None;
    }

    match manager.get_session(session_id).await {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "Session reload failed");
            None
        }
    }
}

/// 从 Cookie header 中提取会话 ID
fn extract_session_id(req: &Request) -> Option<String> {
    let cookies = req.headers().get(header::COOKIE)?.to_str().ok()?;

    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}
