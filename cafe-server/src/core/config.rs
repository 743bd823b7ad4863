use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::core::ServerError;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_PATH | {WORK_DIR}/database/cafe.db | SQLite 数据库文件 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | {WORK_DIR}/logs | 日志目录 (存在时写入滚动日志) |
/// | AUTH_DELAY_MS | 500 | 登录固定延迟(毫秒) |
/// | OPEN_REGISTRATION | false | 是否允许任何人注册管理员 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
///
/// JWT 相关变量见 [`JwtConfig`]。
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/srv/cafe HTTP_PORT=8080 cargo run -p cafe-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 数据库文件路径 (未设置时位于工作目录下)
    pub database_path: Option<String>,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// 日志目录
    pub log_dir: Option<String>,
    /// 登录接口固定延迟 (毫秒)
    pub auth_delay_ms: u64,
    /// 开放注册
    pub open_registration: bool,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: env_parse("HTTP_PORT").unwrap_or(3000),
            database_path: std::env::var("DATABASE_PATH").ok(),
            jwt: JwtConfig::from_env(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            auth_delay_ms: env_parse("AUTH_DELAY_MS").unwrap_or(500),
            open_registration: env_parse("OPEN_REGISTRATION").unwrap_or(false),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS").unwrap_or(30_000),
        }
    }

    /// 使用自定义工作目录和端口覆盖配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config.database_path = None;
        config
    }

    /// 启动前检查
    ///
    /// 生产环境必须显式配置 JWT_SECRET
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.is_production() && self.jwt.is_generated() {
            return Err(ServerError::Config(
                "JWT_SECRET must be set in production".to_string(),
            ));
        }
        if self.jwt.expiration_minutes <= 0 {
            return Err(ServerError::Config(
                "JWT_EXPIRATION_MINUTES must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// 数据库文件路径
    pub fn database_file(&self) -> PathBuf {
        match &self.database_path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(&self.work_dir).join("database").join("cafe.db"),
        }
    }

    /// 日志目录
    pub fn log_dir(&self) -> PathBuf {
        match &self.log_dir {
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(&self.work_dir).join("logs"),
        }
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.work_dir)?;
        if let Some(parent) = self.database_file().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
