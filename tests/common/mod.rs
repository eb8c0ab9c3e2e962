//! 测试公共模块
//! 提供测试配置、应用构建与请求辅助函数

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use http_body_util::BodyExt;
use items_api::{
    auth::{build_gateway, AuthStrategy, PasswordHasher},
    config::{AppConfig, AuthConfig, LogFormat, LoggingConfig, SecurityConfig, ServerConfig},
    middleware::AppState,
    routes, telemetry,
};
use secrecy::Secret;
use std::sync::Arc;
use tower::ServiceExt;

pub const USERNAME: &str = "alice";
pub const PASSWORD: &str = "wonderland";
pub const JWT_SECRET: &str = "test-secret-key-for-testing-only-min-32-chars";

/// 低成本参数的哈希器，只用于测试
pub fn fast_hasher() -> PasswordHasher {
    PasswordHasher::with_params(8, 1, 1).expect("valid argon2 params")
}

/// 创建测试配置
pub fn create_test_config(strategy: AuthStrategy) -> AppConfig {
    let hashed_password = fast_hasher().hash(PASSWORD).expect("Failed to hash password");

    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(), // 使用随机端口
            graceful_shutdown_timeout_secs: 5,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
        },
        security: SecurityConfig {
            jwt_secret: Some(Secret::new(JWT_SECRET.to_string())),
            jwt_algorithm: "HS256".to_string(),
            access_token_expire_minutes: 5,
        },
        auth: AuthConfig {
            strategy,
            username: Some(USERNAME.to_string()),
            hashed_password: Some(Secret::new(hashed_password)),
            display_name: "Alice Liddell".to_string(),
            disabled: false,
        },
    }
}

/// 按配置构建路由
pub fn create_app_with_config(config: AppConfig) -> Router {
    let gateway = build_gateway(&config, fast_hasher()).expect("Failed to build gateway");
    let metrics = telemetry::detached_metrics().expect("Failed to build metrics handle");
    let state = Arc::new(AppState::new(config, gateway, metrics));
    routes::create_router(state)
}

/// 按策略构建路由
pub fn create_app(strategy: AuthStrategy) -> Router {
    create_app_with_config(create_test_config(strategy))
}

/// 发送请求（Router 可克隆，每次 oneshot 使用副本）
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("request failed")
}

/// 读取 JSON 响应体
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body is not JSON")
}

/// 构造登录表单请求
pub fn login_request(username: &str, password: &str) -> Request<Body> {
    let form = format!("username={}&password={}", username, password);
    Request::builder()
        .method("POST")
        .uri("/token")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap()
}

/// 登录并返回 access_token
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = send(app, login_request(username, password)).await;
    assert_eq!(response.status(), 200, "login should succeed");
    let json = json_body(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

/// 构造请求，可选 Authorization 头与 JSON 体
pub fn request(
    method: &str,
    uri: &str,
    authorization: Option<String>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn bearer(token: &str) -> Option<String> {
    Some(format!("Bearer {}", token))
}

pub fn basic(username: &str, password: &str) -> Option<String> {
    Some(format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password))))
}

/// 测试用条目
pub fn sample_item() -> serde_json::Value {
    serde_json::json!({
        "name": "Looking glass",
        "description": "Slightly used",
        "price": 42.5
    })
}
