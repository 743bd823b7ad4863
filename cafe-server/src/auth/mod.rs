//! 认证授权模块
//!
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentAdmin`] - 当前管理员上下文 (提取器)
//! - [`Caller`] - 可选认证的调用方 (按表策略判断)
//! - [`password`] - argon2 密码哈希

pub mod extractor;
pub mod jwt;
pub mod password;

pub use extractor::Caller;
pub use jwt::{Claims, CurrentAdmin, JwtConfig, JwtError, JwtService};
pub use password::{hash_password, verify_password};
