//! HTTP 中间件
//! 应用状态与请求追踪

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::{auth::AuthGateway, config::AppConfig, repository::ItemRepository};

/// 应用状态
///
/// 所有共享对象在启动时构建并注入，Clone 只拷贝 Arc 指针
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// 启动时按配置选定的认证网关
    pub gateway: Arc<dyn AuthGateway>,
    pub items: Arc<ItemRepository>,
    /// Prometheus 渲染句柄
    pub metrics: PrometheusHandle,
}

impl AppState {
    pub fn new(config: AppConfig, gateway: Arc<dyn AuthGateway>, metrics: PrometheusHandle) -> Self {
        Self {
            config,
            gateway,
            items: Arc::new(ItemRepository::new()),
            metrics,
        }
    }
}

/// 请求追踪中间件
/// 为每个请求生成 trace_id 和 request_id，并记录指标
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    // 生成或提取 trace_id/request_id
    let trace_id = extract_or_generate_trace_id(req.headers());
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().to_string();
    // 只记录路径，避免查询串进入日志
    let path = req.uri().path().to_string();

    // 创建 span
    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        request_id = %request_id,
        method = %method,
        path = %path,
    );

    async move {
        let start = Instant::now();

        let mut response = next.run(req).await;

        let elapsed = start.elapsed();

        // 记录指标 - 使用静态字符串
        let status = response.status().as_u16();
        let method_name = match method.as_str() {
            "GET" => "GET",
            "POST" => "POST",
            "PUT" => "PUT",
            "DELETE" => "DELETE",
            _ => "OTHER",
        };
        let status_code = match status {
            200 => "200",
            400 => "400",
            401 => "401",
            404 => "404",
            422 => "422",
            500 => "500",
            _ => "other",
        };

        metrics::counter!("http_requests_total", "method" => method_name, "status" => status_code)
            .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            method = %method,
            path = %path,
            status = status,
            elapsed_ms = elapsed.as_millis(),
            "Request completed"
        );

        // 在响应头中添加 trace_id
        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            response.headers_mut().insert("x-trace-id", value);
        }
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

/// 从请求头中提取或生成 trace_id
fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty() && s.len() <= 128)
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_or_generate_trace_id() {
        let mut headers = HeaderMap::new();
        headers.insert("x-trace-id", "trace-123".parse().unwrap());
        assert_eq!(extract_or_generate_trace_id(&headers), "trace-123");

        let generated = extract_or_generate_trace_id(&HeaderMap::new());
        assert!(Uuid::parse_str(&generated).is_ok());
    }

    #[test]
    fn test_oversized_trace_id_replaced() {
        let mut headers = HeaderMap::new();
        headers.insert("x-trace-id", "x".repeat(200).parse().unwrap());

        let trace_id = extract_or_generate_trace_id(&headers);
        assert!(Uuid::parse_str(&trace_id).is_ok());
    }
}
