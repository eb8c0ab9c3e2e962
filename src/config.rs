//! 配置系统
//! 从环境变量加载所有配置，使用 Secret 包装敏感信息

use config::{Config, ConfigError, Environment};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::fmt;

use crate::auth::{gateway::AuthStrategy, jwt::{parse_algorithm, MIN_SECRET_LEN}, password::PasswordHasher};

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址，例如 "0.0.0.0:8000"
    pub addr: String,
    /// 优雅关闭超时时间（秒）
    pub graceful_shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别: trace, debug, info, warn, error
    pub level: String,
    /// 日志格式: json, pretty, plain
    pub format: LogFormat,
}

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// 生产环境
    Json,
    /// 开发环境
    Pretty,
    Plain,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
            LogFormat::Plain => "plain",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// JWT 密钥（使用 Secret 包装，防止日志泄露）；token 策略下必填
    #[serde(default)]
    pub jwt_secret: Option<Secret<String>>,
    /// 签名算法: HS256, HS384, HS512
    pub jwt_algorithm: String,
    /// 访问令牌有效期（分钟）
    pub access_token_expire_minutes: u64,
}

/// 唯一静态用户的配置
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// 认证策略: none, basic, token
    pub strategy: AuthStrategy,
    /// 用户名（none 策略下可省略）
    #[serde(default)]
    pub username: Option<String>,
    /// 预先计算的 Argon2 PHC 哈希
    #[serde(default)]
    pub hashed_password: Option<Secret<String>>,
    /// 显示名称
    pub display_name: String,
    /// 账户是否被禁用
    pub disabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Config::builder();

        // 添加默认配置
        settings = settings
            .set_default("server.addr", "0.0.0.0:8000")?
            .set_default("server.graceful_shutdown_timeout_secs", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            .set_default("security.jwt_algorithm", "HS256")?
            .set_default("security.access_token_expire_minutes", 15)?
            .set_default("auth.strategy", "token")?
            .set_default("auth.display_name", "Test User")?
            .set_default("auth.disabled", false)?;

        // 从环境变量加载配置（前缀为 APP_）
        settings = settings.add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = settings.build()?.try_deserialize()?;

        // 验证配置
        config.validate()?;

        Ok(config)
    }

    /// 验证配置合法性
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 验证日志级别
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        if self.auth.strategy == AuthStrategy::None {
            return Ok(());
        }

        // basic 与 token 策略都需要一个静态用户
        match self.auth.username.as_deref() {
            Some(name) if !name.is_empty() => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "auth.username is required for the '{}' strategy",
                    self.auth.strategy
                )))
            }
        }

        let hashed = self.auth.hashed_password.as_ref().ok_or_else(|| {
            ConfigError::Message(format!(
                "auth.hashed_password is required for the '{}' strategy",
                self.auth.strategy
            ))
        })?;
        if !PasswordHasher::is_valid_hash(hashed.expose_secret()) {
            return Err(ConfigError::Message(
                "auth.hashed_password must be an Argon2 PHC hash string".to_string(),
            ));
        }

        if self.auth.strategy != AuthStrategy::Token {
            return Ok(());
        }

        // 验证 JWT 密钥长度（至少 32 字符）
        match &self.security.jwt_secret {
            Some(secret) if secret.expose_secret().len() >= MIN_SECRET_LEN => {}
            Some(_) => {
                return Err(ConfigError::Message(
                    "JWT secret must be at least 32 characters long".to_string(),
                ))
            }
            None => {
                return Err(ConfigError::Message(
                    "security.jwt_secret is required for the 'token' strategy".to_string(),
                ))
            }
        }

        parse_algorithm(&self.security.jwt_algorithm)
            .map_err(|e| ConfigError::Message(e.to_string()))?;

        // 验证令牌有效期（1 分钟到 24 小时）
        if self.security.access_token_expire_minutes < 1
            || self.security.access_token_expire_minutes > 1440
        {
            return Err(ConfigError::Message(
                "access_token_expire_minutes must be between 1 and 1440".to_string(),
            ));
        }

        Ok(())
    }
}
