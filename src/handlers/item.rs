//! 条目 CRUD 的 HTTP 处理器
//! 所有路由都在认证中间件之后

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::item::{Item, ItemStatusResponse},
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use validator::Validate;

/// 创建条目
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(item_id): Path<i64>,
    Json(item): Json<Item>,
) -> Result<impl IntoResponse, AppError> {
    item.validate()?;

    if !state.items.insert_if_absent(item_id, item.clone()) {
        return Err(AppError::BadRequest("Item already exists".to_string()));
    }

    tracing::info!(item_id, username = %auth_context.username, "Item created");

    Ok(Json(ItemStatusResponse::created(item)))
}

/// 获取条目
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Path(item_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let item = state
        .items
        .get(item_id)
        .ok_or_else(|| AppError::not_found("Item not found"))?;

    Ok(Json(item))
}

/// 列出条目
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.items.list()))
}

/// 更新条目
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(item_id): Path<i64>,
    Json(item): Json<Item>,
) -> Result<impl IntoResponse, AppError> {
    item.validate()?;

    if !state.items.replace(item_id, item.clone()) {
        return Err(AppError::not_found("Item not found"));
    }

    tracing::info!(item_id, username = %auth_context.username, "Item updated");

    Ok(Json(ItemStatusResponse::updated(item)))
}

/// 删除条目
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(item_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let item = state
        .items
        .remove(item_id)
        .ok_or_else(|| AppError::not_found("Item not found"))?;

    tracing::info!(item_id, username = %auth_context.username, "Item deleted");

    Ok(Json(ItemStatusResponse::deleted(item)))
}
