//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 管理员注册、登录与当前账号
//! - [`rest`] - `/rest/{table}` 通用表接口

pub mod auth;
pub mod health;
pub mod rest;
