//! Admin account storage

use shared::client::RegisterRequest;
use shared::models::Admin;
use shared::types::RowId;
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const ADMIN_COLUMNS: &str = "id, full_name, email, username, phone, password_hash, created_at";

/// Admin row including the password hash (never leaves the server)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminRow {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub created_at: i64,
}

impl AdminRow {
    pub fn into_admin(self) -> Admin {
        Admin {
            id: self.id,
            full_name: self.full_name,
            email: self.email,
            username: self.username,
            phone: self.phone,
            created_at: self.created_at,
        }
    }
}

/// Number of admin accounts
pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admin")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn find_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<AdminRow>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {ADMIN_COLUMNS} FROM admin WHERE username = ? LIMIT 1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_id(pool: &SqlitePool, id: RowId) -> Result<Option<Admin>, sqlx::Error> {
    let row: Option<AdminRow> =
        sqlx::query_as(&format!("SELECT {ADMIN_COLUMNS} FROM admin WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(AdminRow::into_admin))
}

pub async fn username_exists(pool: &SqlitePool, username: &str) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM admin WHERE username = ? LIMIT 1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

pub async fn email_exists(pool: &SqlitePool, email: &str) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT 1 FROM admin WHERE lower(email) = lower(?) LIMIT 1")
            .bind(email)
            .fetch_optional(pool)
            .await?;
    Ok(row.is_some())
}

/// Insert a new admin with an already hashed password
pub async fn create(
    pool: &SqlitePool,
    req: &RegisterRequest,
    password_hash: &str,
) -> Result<Admin, sqlx::Error> {
    let phone = req
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());

    let row: AdminRow = sqlx::query_as(&format!(
        "INSERT INTO admin (id, full_name, email, username, phone, password_hash, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING {ADMIN_COLUMNS}"
    ))
    .bind(snowflake_id())
    .bind(req.full_name.trim())
    .bind(req.email.trim())
    .bind(&req.username)
    .bind(phone)
    .bind(password_hash)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;

    Ok(row.into_admin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn pool() -> (tempfile::TempDir, SqlitePool) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cafe.db");
        let db = DbService::new(&path.to_string_lossy()).await.unwrap();
        (dir, db.pool)
    }

    fn dewi() -> RegisterRequest {
        RegisterRequest {
            full_name: "Dewi Lestari".to_string(),
            email: "dewi@cafe.id".to_string(),
            username: "dewi".to_string(),
            phone: Some(" ".to_string()),
            password: "kopi-susu-2024".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let (_dir, pool) = pool().await;
        assert_eq!(count(&pool).await.unwrap(), 0);

        let admin = create(&pool, &dewi(), "$argon2id$fake").await.unwrap();
        assert_eq!(admin.username, "dewi");
        assert_eq!(admin.phone, None);
        assert_eq!(count(&pool).await.unwrap(), 1);

        let row = find_by_username(&pool, "dewi").await.unwrap().unwrap();
        assert_eq!(row.password_hash, "$argon2id$fake");
        assert_eq!(find_by_id(&pool, admin.id).await.unwrap(), Some(admin));

        assert!(username_exists(&pool, "dewi").await.unwrap());
        assert!(email_exists(&pool, "DEWI@cafe.id").await.unwrap());
        assert!(!username_exists(&pool, "budi").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_unique_violation() {
        let (_dir, pool) = pool().await;
        create(&pool, &dewi(), "h").await.unwrap();

        let mut other = dewi();
        other.email = "other@cafe.id".to_string();
        let err = create(&pool, &other, "h").await.unwrap_err();
        let is_unique = err
            .as_database_error()
            .map(|e| e.is_unique_violation())
            .unwrap_or(false);
        assert!(is_unique);
    }
}
