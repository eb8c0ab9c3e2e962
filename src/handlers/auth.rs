//! 认证相关的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::{
        auth::{LoginForm, TokenResponse},
        user::UserResponse,
    },
};
use axum::{extract::State, response::IntoResponse, Form, Json};
use std::sync::Arc;

/// 登录：用户名密码换取访问令牌
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, AppError> {
    // 密码哈希校验是 CPU 密集操作，移出异步工作线程
    let gateway = state.gateway.clone();
    let token = tokio::task::spawn_blocking(move || gateway.login(&form.username, &form.password))
        .await
        .map_err(|e| AppError::Internal(format!("Login task failed: {}", e)))??;

    Ok(Json(TokenResponse {
        expires_in: token.expires_in_secs(),
        access_token: token.into_string(),
        token_type: "bearer".to_string(),
    }))
}

/// 获取当前用户信息
pub async fn get_current_user(auth_context: AuthContext) -> Result<impl IntoResponse, AppError> {
    Ok(Json(UserResponse {
        username: auth_context.username,
        display_name: auth_context.display_name,
    }))
}
