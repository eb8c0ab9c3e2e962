//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

use crate::{
    auth::{middleware::require_auth, AuthStrategy},
    handlers,
    middleware::{request_tracking_middleware, AppState},
};

/// 请求体上限（字节）
const MAX_BODY_BYTES: usize = 64 * 1024;

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点（健康检查、指标）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::metrics_handler));

    // 登录端点只在 token 策略下存在
    let auth_routes: Router<Arc<AppState>> = match state.gateway.strategy() {
        AuthStrategy::Token => Router::new().route("/token", post(handlers::auth::login)),
        AuthStrategy::None | AuthStrategy::Basic => Router::new(),
    };

    // 受保护端点：认证网关先于任何业务逻辑执行
    let protected_routes = Router::new()
        .route("/users/me", get(handlers::auth::get_current_user))
        .route("/items", get(handlers::item::list_items))
        .route("/items/", get(handlers::item::list_items))
        .route(
            "/items/{item_id}",
            post(handlers::item::create_item)
                .get(handlers::item::get_item)
                .put(handlers::item::update_item)
                .delete(handlers::item::delete_item),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.gateway.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(protected_routes)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(request_tracking_middleware))
        .with_state(state)
}
