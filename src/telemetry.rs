//! 日志与指标
//! 结构化日志初始化，以及 Prometheus 指标记录器

use crate::{
    config::{LogFormat, LoggingConfig},
    error::AppError,
};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// 请求耗时直方图的桶（秒）；登录包含一次 Argon2 校验，上限放宽到 5 秒
const DURATION_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];

/// 初始化日志
///
/// `RUST_LOG` 优先于配置中的日志级别。重复调用（测试中）不会报错。
pub fn init_telemetry(config: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let log_layer = match config.format {
        // 请求 span 关闭时输出一行，带耗时
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(false)
            .boxed(),
        LogFormat::Plain => tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .boxed(),
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(log_layer)
        .try_init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.level,
        format = %config.format,
        "Telemetry initialized"
    );
}

fn metrics_builder() -> Result<PrometheusBuilder, AppError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            DURATION_BUCKETS,
        )
        .map_err(|e| AppError::Config(format!("Invalid metrics buckets: {}", e)))
}

/// 安装全局指标记录器，返回 `/metrics` 渲染用的句柄
///
/// 进程内只能安装一次。
pub fn init_metrics() -> Result<PrometheusHandle, AppError> {
    let handle = metrics_builder()?
        .install_recorder()
        .map_err(|e| AppError::Config(format!("Failed to install metrics recorder: {}", e)))?;

    tracing::debug!("Metrics recorder installed");
    Ok(handle)
}

/// 不安装为全局记录器的句柄（测试用）
pub fn detached_metrics() -> Result<PrometheusHandle, AppError> {
    Ok(metrics_builder()?.build_recorder().handle())
}
