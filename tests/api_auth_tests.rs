//! 认证 API 集成测试（token 策略）

use axum::http::{header, StatusCode};
use chrono::Duration;
use items_api::auth::{
    jwt::{parse_algorithm, TokenIssuer, TokenKeys},
    AuthStrategy,
};
use items_api::models::user::UserRecord;
use secrecy::Secret;
use std::sync::Arc;

mod common;
use common::*;

#[tokio::test]
async fn test_login_success() {
    let app = create_app(AuthStrategy::Token);

    let response = send(&app, login_request(USERNAME, PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["token_type"], "bearer");
    assert_eq!(json["expires_in"], 300);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = create_app(AuthStrategy::Token);

    let response = send(&app, login_request(USERNAME, "WrongPassword")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");

    let json = json_body(response).await;
    assert!(json.get("access_token").is_none());
    assert_eq!(json["error"]["message"], "Incorrect username or password");

    // 之后不带令牌的受保护请求仍然被拒绝
    let response = send(&app, request("GET", "/items/", None, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_user_and_wrong_password_look_the_same() {
    let app = create_app(AuthStrategy::Token);

    let unknown = send(&app, login_request("nosuchuser", PASSWORD)).await;
    let wrong = send(&app, login_request(USERNAME, "wrongpassword")).await;

    assert_eq!(unknown.status(), wrong.status());
    assert_eq!(
        unknown.headers()[header::WWW_AUTHENTICATE],
        wrong.headers()[header::WWW_AUTHENTICATE]
    );

    let unknown = json_body(unknown).await;
    let wrong = json_body(wrong).await;
    assert_eq!(unknown["error"]["message"], wrong["error"]["message"]);
}

#[tokio::test]
async fn test_disabled_account_cannot_login() {
    let mut config = create_test_config(AuthStrategy::Token);
    config.auth.disabled = true;
    let app = create_app_with_config(config);

    let response = send(&app, login_request(USERNAME, PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = json_body(response).await;
    assert_eq!(json["error"]["message"], "Incorrect username or password");
}

#[tokio::test]
async fn test_login_missing_fields_rejected() {
    let app = create_app(AuthStrategy::Token);

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/token")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(axum::body::Body::from("username=alice"))
        .unwrap();
    let response = send(&app, request).await;

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_end_to_end_token_flow() {
    let app = create_app(AuthStrategy::Token);
    let token = login(&app, USERNAME, PASSWORD).await;

    let response = send(
        &app,
        request("POST", "/items/1", bearer(&token), Some(sample_item())),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, request("GET", "/items/1", bearer(&token), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["name"], "Looking glass");

    // 无令牌
    let response = send(&app, request("GET", "/items/1", None, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");

    // 乱码令牌
    let response = send(
        &app,
        request("GET", "/items/1", bearer("garbled.token.value"), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = json_body(response).await;
    assert_eq!(json["error"]["message"], "Could not validate credentials");
}

#[tokio::test]
async fn test_token_from_other_secret_rejected() {
    let app = create_app(AuthStrategy::Token);
    let token = login(&app, USERNAME, PASSWORD).await;
    send(
        &app,
        request("POST", "/items/1", bearer(&token), Some(sample_item())),
    )
    .await;

    let keys = TokenKeys::new(
        "a-completely-different-secret-of-32-chars",
        parse_algorithm("HS256").unwrap(),
        Duration::minutes(5),
    )
    .unwrap();
    let forged = TokenIssuer::new(Arc::new(keys))
        .issue(
            &UserRecord {
                username: USERNAME.to_string(),
                hashed_password: Secret::new(String::new()),
                display_name: "Alice".to_string(),
                disabled: false,
            },
            None,
        )
        .unwrap();

    let response = send(
        &app,
        request("GET", "/items/1", bearer(forged.as_str()), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
}

#[tokio::test]
async fn test_current_user() {
    let app = create_app(AuthStrategy::Token);
    let token = login(&app, USERNAME, PASSWORD).await;

    let response = send(&app, request("GET", "/users/me", bearer(&token), None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["username"], USERNAME);
    assert_eq!(json["display_name"], "Alice Liddell");
    assert!(json.get("hashed_password").is_none());
}

#[tokio::test]
async fn test_same_token_validates_repeatedly() {
    let app = create_app(AuthStrategy::Token);
    let token = login(&app, USERNAME, PASSWORD).await;

    let first = json_body(send(&app, request("GET", "/users/me", bearer(&token), None)).await).await;
    let second =
        json_body(send(&app, request("GET", "/users/me", bearer(&token), None)).await).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_metrics_endpoint_is_public() {
    let app = create_app(AuthStrategy::Token);

    let response = send(&app, request("GET", "/metrics", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_is_public() {
    let app = create_app(AuthStrategy::Token);

    let response = send(&app, request("GET", "/health", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["auth_strategy"], "token");
}
