//! 健康检查路由 (公开)
//!
//! | 路径 | 说明 |
//! |------|------|
//! | GET /health | 存活探针: 版本 + 运行环境 |
//! | GET /health/detailed | 数据库探针 + 各表行数 + 待处理的预约和留言 |
//!
//! ```json
//! {
//!   "status": "healthy",
//!   "uptime_seconds": 3600,
//!   "checks": { "database": { "status": "ok", "latency_ms": 1 } },
//!   "tables": { "products": 12, "reservations": 40 },
//!   "backlog": { "pending_reservations": 3, "pending_messages": 1 }
//! }
//! ```

use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::time::Instant;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use shared::models::{ContactMessage, Record, Reservation};
use sqlx::SqlitePool;

use crate::core::ServerState;
use crate::tables::registry;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/detailed", get(detailed_health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
}

#[derive(Serialize)]
pub struct DetailedHealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_seconds: u64,
    checks: HealthChecks,
    /// 行数; 统计失败的表不出现
    tables: BTreeMap<&'static str, i64>,
    backlog: Backlog,
}

#[derive(Serialize)]
pub struct HealthChecks {
    database: CheckResult,
}

#[derive(Serialize)]
pub struct CheckResult {
    /// ok | error
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// 后台尚未处理的条目
#[derive(Serialize, Default)]
pub struct Backlog {
    pending_reservations: i64,
    pending_messages: i64,
}

static STARTED_AT: OnceLock<Instant> = OnceLock::new();

/// 记录启动时刻, serve() 开始时调用
pub fn mark_started() {
    STARTED_AT.get_or_init(Instant::now);
}

fn uptime_seconds() -> u64 {
    STARTED_AT.get_or_init(Instant::now).elapsed().as_secs()
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
    })
}

async fn probe_database(pool: &SqlitePool) -> CheckResult {
    let start = Instant::now();
    match sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(pool).await {
        Ok(_) => CheckResult {
            status: "ok",
            latency_ms: Some(start.elapsed().as_millis() as u64),
            message: None,
        },
        Err(e) => CheckResult {
            status: "error",
            latency_ms: None,
            message: Some(format!("Database error: {e}")),
        },
    }
}

// 表名来自注册表常量, 不含用户输入
async fn count(pool: &SqlitePool, table: &str, pending_only: bool) -> Result<i64, sqlx::Error> {
    let sql = if pending_only {
        format!("SELECT COUNT(*) FROM \"{table}\" WHERE status = 'pending'")
    } else {
        format!("SELECT COUNT(*) FROM \"{table}\"")
    };
    sqlx::query_scalar::<_, i64>(&sql).fetch_one(pool).await
}

pub async fn detailed_health(State(state): State<ServerState>) -> Json<DetailedHealthResponse> {
    let pool = state.get_db();
    let database = probe_database(pool).await;
    let healthy = database.status == "ok";

    let mut tables = BTreeMap::new();
    let mut backlog = Backlog::default();
    if healthy {
        for table in registry::all() {
            match count(pool, table.name, false).await {
                Ok(n) => {
                    tables.insert(table.name, n);
                }
                Err(e) => tracing::warn!(table = table.name, error = %e, "Row count failed"),
            }
        }
        backlog.pending_reservations = count(pool, Reservation::TABLE, true)
            .await
            .unwrap_or(0);
        backlog.pending_messages = count(pool, ContactMessage::TABLE, true)
            .await
            .unwrap_or(0);
    }

    Json(DetailedHealthResponse {
        status: if healthy { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: uptime_seconds(),
        checks: HealthChecks { database },
        tables,
        backlog,
    })
}
