//! 表 API 服务
//!
//! `/rest/{table}` 背后的通用 CRUD:
//!
//! - [`registry`] - 表/列白名单与访问策略
//! - [`write`] - 写入载荷校验与规范化
//! - [`sql`] - SQL 生成、绑定与行解码
//!
//! insert 返回插入的行，其余操作返回行数组。

pub mod registry;
pub mod sql;
pub mod write;

use serde_json::Value;
use shared::query::{FilterOp, TableQuery};
use sqlx::SqlitePool;

use crate::auth::{Caller, CurrentAdmin};
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode};
use registry::{Access, Operation, TableDef, TableKind};

pub use registry::lookup;

/// 按表策略检查调用方权限
///
/// 返回已认证的管理员 (若有)。
pub fn authorize(
    table: &TableDef,
    op: Operation,
    caller: &Caller,
) -> AppResult<Option<CurrentAdmin>> {
    match table.policy.for_operation(op) {
        Access::Public => Ok(caller.admin().cloned()),
        Access::Admin => caller.require_admin().map(|admin| Some(admin.clone())),
        Access::Denied => {
            security_log!(
                "WARN",
                "table_operation_denied",
                table = table.name,
                operation = op.as_str()
            );
            Err(AppError::with_message(
                ErrorCode::OperationNotAllowed,
                format!("{} is not allowed on {}", op.as_str(), table.name),
            ))
        }
    }
}

fn require_filters(table: &TableDef, op: Operation, query: &TableQuery) -> AppResult<()> {
    if query.has_filters() {
        return Ok(());
    }
    Err(AppError::with_message(
        ErrorCode::FilterRequired,
        format!("{} on {} requires at least one filter", op.as_str(), table.name),
    ))
}

/// 单行写入的目标 id (`id=eq.N`)
fn target_id(query: &TableQuery) -> Option<&str> {
    query
        .filters
        .iter()
        .find(|f| f.column == "id" && f.op == FilterOp::Eq)
        .map(|f| f.value.as_str())
}

/// 按 id 指定的行不存在时返回该表的 404 错误码; 其他过滤条件允许空结果
fn ensure_target_found(table: &TableDef, query: &TableQuery, rows: &[Value]) -> AppResult<()> {
    match target_id(query) {
        Some(id) if rows.is_empty() => Err(AppError::with_message(
            table.not_found,
            format!("No row in {} with id {id}", table.name),
        )
        .with_detail("table", table.name)
        .with_detail("id", id)),
        _ => Ok(()),
    }
}

/// 查询
pub async fn select(
    pool: &SqlitePool,
    caller: &Caller,
    table_name: &str,
    query: &TableQuery,
) -> AppResult<Vec<Value>> {
    let table = lookup(table_name)?;
    authorize(table, Operation::Select, caller)?;
    sql::select(pool, table, query).await
}

/// 插入单行
pub async fn insert(
    pool: &SqlitePool,
    caller: &Caller,
    table_name: &str,
    body: Value,
) -> AppResult<Value> {
    let table = lookup(table_name)?;
    authorize(table, Operation::Insert, caller)?;

    let values = write::prepare_insert(table, body)?;
    let row = sql::insert(pool, table, values).await?;

    tracing::info!(table = table.name, id = ?row.get("id"), "Row inserted");
    Ok(row)
}

/// 更新匹配行 (必须带过滤条件)
pub async fn update(
    pool: &SqlitePool,
    caller: &Caller,
    table_name: &str,
    query: &TableQuery,
    body: Value,
) -> AppResult<Vec<Value>> {
    let table = lookup(table_name)?;
    let admin = authorize(table, Operation::Update, caller)?;
    require_filters(table, Operation::Update, query)?;

    let values = write::prepare_update(table, body)?;
    let rows = sql::update(pool, table, &query.filters, values).await?;
    ensure_target_found(table, query, &rows)?;

    tracing::info!(
        table = table.name,
        rows = rows.len(),
        admin = admin.as_ref().map(|a| a.username.as_str()),
        "Rows updated"
    );
    Ok(rows)
}

/// 删除匹配行 (必须带过滤条件)
pub async fn delete(
    pool: &SqlitePool,
    caller: &Caller,
    table_name: &str,
    query: &TableQuery,
) -> AppResult<Vec<Value>> {
    let table = lookup(table_name)?;
    let admin = authorize(table, Operation::Delete, caller)?;
    require_filters(table, Operation::Delete, query)?;

    if table.kind == TableKind::Admin
        && let Some(admin) = &admin
    {
        let ids = sql::matching_ids(pool, table, &query.filters).await?;
        if ids.contains(&admin.id) {
            security_log!(
                "WARN",
                "admin_self_delete_blocked",
                username = admin.username.as_str()
            );
            return Err(AppError::new(ErrorCode::CannotDeleteSelf));
        }
    }

    let rows = sql::delete(pool, table, &query.filters).await?;
    ensure_target_found(table, query, &rows)?;

    tracing::info!(
        table = table.name,
        rows = rows.len(),
        admin = admin.as_ref().map(|a| a.username.as_str()),
        "Rows deleted"
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use serde_json::json;
    use shared::query::Direction;

    async fn pool() -> (tempfile::TempDir, SqlitePool) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cafe.db");
        let db = DbService::new(&path.to_string_lossy()).await.unwrap();
        (dir, db.pool)
    }

    fn admin() -> Caller {
        Caller::Admin(CurrentAdmin {
            id: 42,
            username: "dewi".to_string(),
        })
    }

    fn budi() -> Value {
        json!({
            "name": "Budi",
            "email": "budi@x.com",
            "phone": "081234567890",
            "date": "2099-01-01",
            "time": "19:00",
            "guests": 4
        })
    }

    async fn seed_products(pool: &SqlitePool) {
        for (name, price, category) in [
            ("Es Kopi Susu", 22000, "Kopi"),
            ("Kopi Tubruk", 15000, "Kopi"),
            ("Teh Tarik", 18000, "Teh"),
        ] {
            insert(
                pool,
                &admin(),
                "products",
                json!({"name": name, "price": price, "category": category}),
            )
            .await
            .unwrap();
        }
    }

    #[tokio::test]
    async fn test_public_reservation_defaults_to_pending() {
        let (_dir, pool) = pool().await;
        let row = insert(&pool, &Caller::Anonymous, "reservations", budi())
            .await
            .unwrap();
        assert_eq!(row["status"], "pending");
        assert_eq!(row["guests"], 4);
        assert!(row["special_request"].is_null());
    }

    #[tokio::test]
    async fn test_anonymous_cannot_read_reservations() {
        let (_dir, pool) = pool().await;
        let err = select(&pool, &Caller::Anonymous, "reservations", &TableQuery::new())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
    }

    #[tokio::test]
    async fn test_select_filters_and_order() {
        let (_dir, pool) = pool().await;
        seed_products(&pool).await;

        let query = TableQuery::new()
            .filter("category", FilterOp::Eq, "Kopi")
            .order_by("price", Direction::Desc);
        let rows = select(&pool, &Caller::Anonymous, "products", &query)
            .await
            .unwrap();
        let names: Vec<_> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Es Kopi Susu", "Kopi Tubruk"]);
        assert_eq!(rows[0]["price"], 22000.0);
        assert_eq!(rows[0]["is_available"], true);

        let query = TableQuery::new().filter("name", FilterOp::Ilike, "*kopi*");
        let rows = select(&pool, &Caller::Anonymous, "products", &query)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);

        // like is case-sensitive
        let query = TableQuery::new().filter("name", FilterOp::Like, "*kopi*");
        let rows = select(&pool, &Caller::Anonymous, "products", &query)
            .await
            .unwrap();
        assert!(rows.is_empty());

        let query = TableQuery::new().limit(1).offset(1);
        let rows = select(&pool, &Caller::Anonymous, "products", &query)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_column_rejected() {
        let (_dir, pool) = pool().await;
        let query = TableQuery::new().filter("password_hash", FilterOp::Like, "*");
        let err = select(&pool, &admin(), "admin", &query).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ColumnNotFound);

        let query = TableQuery::new().order_by("secret", Direction::Asc);
        let err = select(&pool, &Caller::Anonymous, "products", &query)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ColumnNotFound);
    }

    #[tokio::test]
    async fn test_update_and_delete_require_filter() {
        let (_dir, pool) = pool().await;
        seed_products(&pool).await;

        let err = update(
            &pool,
            &admin(),
            "products",
            &TableQuery::new(),
            json!({"is_available": false}),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::FilterRequired);

        let err = delete(&pool, &admin(), "products", &TableQuery::new())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::FilterRequired);

        let all = select(&pool, &Caller::Anonymous, "products", &TableQuery::new())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|p| p["is_available"] == true));
    }

    #[tokio::test]
    async fn test_update_status_alias_stored_canonical() {
        let (_dir, pool) = pool().await;
        let row = insert(&pool, &Caller::Anonymous, "reservations", budi())
            .await
            .unwrap();
        let id = row["id"].as_i64().unwrap();

        let query = TableQuery::new().filter("id", FilterOp::Eq, id.to_string());
        let rows = update(
            &pool,
            &admin(),
            "reservations",
            &query,
            json!({"status": "accepted"}),
        )
        .await
        .unwrap();
        assert_eq!(rows[0]["status"], "diterima");

        // Filter by alias as well
        let query = TableQuery::new().filter("status", FilterOp::Eq, "accepted");
        let rows = select(&pool, &admin(), "reservations", &query).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_returns_removed_rows() {
        let (_dir, pool) = pool().await;
        seed_products(&pool).await;

        let query = TableQuery::new().filter("name", FilterOp::Eq, "Teh Tarik");
        let removed = delete(&pool, &admin(), "products", &query).await.unwrap();
        assert_eq!(removed.len(), 1);

        let rows = select(&pool, &Caller::Anonymous, "products", &TableQuery::new())
            .await
            .unwrap();
        assert!(rows.iter().all(|r| r["name"] != "Teh Tarik"));
    }

    #[tokio::test]
    async fn test_duplicate_category_name() {
        let (_dir, pool) = pool().await;
        insert(&pool, &admin(), "categories", json!({"name": "Kopi"}))
            .await
            .unwrap();
        let err = insert(&pool, &admin(), "categories", json!({"name": "Kopi"}))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CategoryNameExists);
    }

    #[tokio::test]
    async fn test_admin_table_policy() {
        let (_dir, pool) = pool().await;
        let err = insert(&pool, &admin(), "admin", json!({"username": "x"}))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OperationNotAllowed);

        let query = TableQuery::new().filter("id", FilterOp::Eq, "42");
        let err = delete(&pool, &admin(), "admin", &query).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CannotDeleteSelf);
    }

    #[tokio::test]
    async fn test_write_by_missing_id_reports_table_not_found() {
        let (_dir, pool) = pool().await;
        seed_products(&pool).await;

        let by_id = TableQuery::new().filter("id", FilterOp::Eq, "777");
        let err = update(
            &pool,
            &admin(),
            "reservations",
            &by_id,
            json!({"status": "rejected"}),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationNotFound);
        assert!(err.is_not_found());
        assert_eq!(err.details.unwrap()["id"], "777");

        let err = delete(&pool, &admin(), "products", &by_id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotFound);

        let err = delete(&pool, &admin(), "contact_messages", &by_id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ContactMessageNotFound);

        // Non-id filters may match nothing
        let by_name = TableQuery::new().filter("name", FilterOp::Eq, "Matcha");
        let removed = delete(&pool, &admin(), "products", &by_name).await.unwrap();
        assert!(removed.is_empty());
    }
}
