//! Cafe Server - 咖啡馆官网与后台管理服务
//!
//! # 架构概述
//!
//! - **表接口** (`tables`): `/rest/{table}` 通用 CRUD，列白名单 + 按表访问策略
//! - **数据库** (`db`): 嵌入式 SQLite (sqlx, WAL, 迁移)
//! - **认证** (`auth`): JWT + Argon2 管理员认证
//! - **HTTP API** (`api`): 健康检查、认证、表接口路由
//!
//! # 模块结构
//!
//! ```text
//! cafe-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # JWT 认证、提取器、密码哈希
//! ├── tables/        # 表注册表、写入校验、SQL 生成
//! ├── api/           # HTTP 路由和处理器
//! ├── middleware/    # 请求日志
//! ├── utils/         # 日志初始化、错误类型
//! └── db/            # 连接池与管理员存储
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod middleware;
pub mod tables;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentAdmin, JwtService};
pub use core::{Config, Server, ServerState, build_app, serve};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ErrorBody, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: 加载 `.env`，初始化日志
///
/// | 环境变量 | 说明 |
/// |----------|------|
/// | LOG_LEVEL | 日志级别 (默认 info) |
/// | LOG_JSON | `true` 时输出 JSON 格式 |
/// | LOG_DIR / WORK_DIR | 日志目录 (存在时写入滚动日志) |
pub fn setup_environment() -> anyhow::Result<()> {
    // .env 不存在不是错误
    if let Err(e) = dotenv::dotenv()
        && !e.not_found()
    {
        return Err(anyhow::anyhow!("Failed to load .env: {e}"));
    }

    let log_level = std::env::var("LOG_LEVEL").ok();
    let json = std::env::var("LOG_JSON")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let log_dir = std::env::var("LOG_DIR").ok().or_else(|| {
        std::env::var("WORK_DIR")
            .ok()
            .map(|dir| format!("{dir}/logs"))
    });

    init_logger_with_file(
        log_level.as_deref(),
        json,
        log_dir.as_deref().map(std::path::Path::new),
    );
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
     ( (
      ) )
   ........
   |      |]    Cafe Server
   \      /     v{}
    `----'
    "#,
        env!("CARGO_PKG_VERSION")
    );
}
