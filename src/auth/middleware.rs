//! 认证中间件

use crate::{
    auth::gateway::AuthGateway,
    error::{AppError, Challenge},
    models::user::UserRecord,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;

/// 认证上下文（附加到请求扩展）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub username: String,
    pub display_name: String,
}

impl AuthContext {
    /// 无认证策略下的匿名身份
    pub fn anonymous() -> Self {
        Self {
            username: "anonymous".to_string(),
            display_name: "Anonymous".to_string(),
        }
    }
}

impl From<&UserRecord> for AuthContext {
    fn from(user: &UserRecord) -> Self {
        Self {
            username: user.username.clone(),
            display_name: user.display_name.clone(),
        }
    }
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::Unauthorized(Challenge::Bearer))
    }
}

/// 拆分 Authorization 头为 (scheme, credentials)，scheme 不区分大小写
fn authorization<'a>(headers: &'a HeaderMap, scheme: &str) -> Option<&'a str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (given, credentials) = value.split_once(' ')?;
    let credentials = credentials.trim();
    (given.eq_ignore_ascii_case(scheme) && !credentials.is_empty()).then_some(credentials)
}

/// 从 Authorization 头提取 Bearer 令牌
pub fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    authorization(headers, "Bearer")
        .map(str::to_string)
        .ok_or(AppError::Unauthorized(Challenge::Bearer))
}

/// 从 Authorization 头提取 Basic 用户名和密码
pub fn extract_basic_credentials(headers: &HeaderMap) -> Result<(String, String), AppError> {
    let unauthorized = || AppError::Unauthorized(Challenge::Basic);

    let encoded = authorization(headers, "Basic").ok_or_else(unauthorized)?;
    let decoded = STANDARD.decode(encoded).map_err(|_| unauthorized())?;
    let decoded = String::from_utf8(decoded).map_err(|_| unauthorized())?;
    let (username, password) = decoded.split_once(':').ok_or_else(unauthorized)?;

    Ok((username.to_string(), password.to_string()))
}

/// 认证中间件：在任何业务逻辑之前调用网关
pub async fn require_auth(
    State(gateway): State<Arc<dyn AuthGateway>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_context = if gateway.hashes_per_request() {
        // Argon2 校验会占用工作线程，放到阻塞线程池
        let headers = req.headers().clone();
        tokio::task::spawn_blocking(move || gateway.authorize(&headers))
            .await
            .map_err(|e| AppError::Internal(format!("Authorization task failed: {}", e)))??
    } else {
        gateway.authorize(req.headers())?
    };

    tracing::debug!(username = %auth_context.username, "Request authorized");

    // 附加到请求扩展
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
