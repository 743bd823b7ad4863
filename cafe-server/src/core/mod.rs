//! 服务器骨架
//!
//! 环境变量配置 ([`Config`])、启动时打开的数据库与密钥 ([`ServerState`])、
//! 路由装配与监听 ([`Server`], [`build_app`], [`serve`])，以及启动阶段的错误 ([`ServerError`])。
//! 请求级错误走 [`crate::utils::AppError`]。

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::{Server, build_app, serve};
pub use state::ServerState;
