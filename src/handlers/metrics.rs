//! 指标端点

use axum::extract::State;
use std::sync::Arc;

use crate::middleware::AppState;

/// Prometheus 文本格式的指标
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> String {
    state.metrics.render()
}
