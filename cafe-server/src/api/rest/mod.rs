//! 通用表接口路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /rest/{table} | GET | 查询 (过滤/排序/分页) |
//! | /rest/{table} | POST | 插入单行 |
//! | /rest/{table} | PATCH | 更新匹配行 (必须带过滤) |
//! | /rest/{table} | DELETE | 删除匹配行 (必须带过滤) |
//!
//! 访问控制按表策略在服务层判断。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/rest/{table}",
        get(handler::select)
            .post(handler::insert)
            .patch(handler::update)
            .delete(handler::delete),
    )
}
