//! 条目服务主入口

use items_api::{
    auth::{build_gateway, PasswordHasher},
    config::AppConfig,
    handlers::health,
    middleware::AppState,
    routes, telemetry,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ===== CLI 参数处理 =====
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" => {
                println!("items-api {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            "--hash-password" => {
                let Some(password) = args.get(2) else {
                    eprintln!("--hash-password 需要一个密码参数");
                    std::process::exit(1);
                };
                let hash = PasswordHasher::new()
                    .hash(password)
                    .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
                println!("{}", hash);
                return Ok(());
            }
            _ => {
                eprintln!("未知参数: {}", args[1]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // 加载 .env 文件（开发环境）
    // 按优先级加载：.env.local > .env.development > .env
    if let Ok(env) = std::env::var("APP_ENV") {
        dotenv::from_filename(format!(".env.{}", env)).ok();
    } else {
        dotenv::from_filename(".env.local").ok();
        dotenv::from_filename(".env.development").ok();
        dotenv::dotenv().ok();
    }

    health::set_start_time();

    // 1. 加载配置（缺失或非法配置直接终止启动）
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    // 2. 初始化日志
    telemetry::init_telemetry(&config.logging);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Items API starting...");

    let metrics = telemetry::init_metrics()
        .map_err(|e| anyhow::anyhow!("Failed to initialize metrics: {}", e))?;

    // 3. 按策略构建认证网关
    let gateway = build_gateway(&config, PasswordHasher::new())
        .map_err(|e| anyhow::anyhow!("Failed to initialize authentication: {}", e))?;

    // 4. 构建应用状态与路由
    let app_state = Arc::new(AppState::new(config.clone(), gateway, metrics));
    let app = routes::create_router(app_state);

    // 5. 启动服务器
    let addr = &config.server.addr;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        strategy = %config.auth.strategy,
        "Server listening"
    );

    // 6. 优雅关闭
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.graceful_shutdown_timeout_secs))
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// 优雅关闭信号处理
///
/// 收到信号后返回，开始排空连接；超时后强制退出进程
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Terminate signal received, starting graceful shutdown");
        },
    }

    tokio::spawn(async move {
        tokio::time::sleep(tokio::time::Duration::from_secs(timeout_secs)).await;
        tracing::warn!("Graceful shutdown timeout reached, forcing exit");
        std::process::exit(1);
    });
}

/// 打印帮助信息
fn print_help() {
    println!("items-api {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("用法: items-api [选项]");
    println!();
    println!("选项:");
    println!("  --version                  打印版本信息并退出");
    println!("  --help                     打印此帮助信息并退出");
    println!("  --hash-password <PASSWORD> 输出可用于 APP_AUTH__HASHED_PASSWORD 的 Argon2 哈希");
    println!();
    println!("环境变量:");
    println!("  所有配置通过 APP_ 前缀的环境变量完成，例如:");
    println!("  APP_AUTH__STRATEGY=token  APP_AUTH__USERNAME=alice");
    println!("  APP_AUTH__HASHED_PASSWORD=<hash>  APP_SECURITY__JWT_SECRET=<至少 32 字符>");
}
