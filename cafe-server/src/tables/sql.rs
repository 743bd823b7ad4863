//! SQL generation and execution for registry tables
//!
//! Identifiers only ever come from the registry, values are always bound.

use serde_json::{Map, Number, Value};
use shared::models::{ContactStatus, ReservationStatus};
use shared::query::{Direction, Filter, FilterOp, TableQuery};
use sqlx::error::ErrorKind;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use super::registry::{ColumnDef, ColumnKind, TableDef, TableKind};
use crate::utils::{AppError, AppResult, ErrorCode};

/// A bound parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Bool(bool),
}

impl SqlValue {
    /// Convert a filter value according to the column type
    pub fn from_filter(column: &ColumnDef, raw: &str) -> AppResult<Self> {
        let invalid = || {
            AppError::invalid_filter(format!(
                "Invalid value `{raw}` for column {}",
                column.name
            ))
            .with_detail("column", column.name)
        };

        Ok(match column.kind {
            ColumnKind::Integer => SqlValue::Integer(raw.parse().map_err(|_| invalid())?),
            ColumnKind::Real => SqlValue::Real(raw.parse().map_err(|_| invalid())?),
            ColumnKind::Bool => match raw {
                "true" | "1" => SqlValue::Bool(true),
                "false" | "0" => SqlValue::Bool(false),
                _ => return Err(invalid()),
            },
            ColumnKind::Text => SqlValue::Text(raw.to_string()),
            ColumnKind::ReservationStatus => SqlValue::Text(
                raw.parse::<ReservationStatus>()
                    .map_err(|_| invalid())?
                    .as_str()
                    .to_string(),
            ),
            ColumnKind::ContactStatus => SqlValue::Text(
                raw.parse::<ContactStatus>()
                    .map_err(|_| invalid())?
                    .as_str()
                    .to_string(),
            ),
        })
    }

    /// Convert a (validated) JSON body value according to the column type
    pub fn from_json(column: &ColumnDef, value: &Value) -> AppResult<Self> {
        let invalid = || {
            AppError::validation(format!("Invalid value for column {}", column.name))
                .with_detail("column", column.name)
        };

        if value.is_null() {
            return Ok(SqlValue::Null);
        }
        Ok(match column.kind {
            ColumnKind::Integer => SqlValue::Integer(value.as_i64().ok_or_else(invalid)?),
            ColumnKind::Real => SqlValue::Real(value.as_f64().ok_or_else(invalid)?),
            ColumnKind::Bool => SqlValue::Bool(value.as_bool().ok_or_else(invalid)?),
            ColumnKind::Text | ColumnKind::ReservationStatus | ColumnKind::ContactStatus => {
                SqlValue::Text(value.as_str().ok_or_else(invalid)?.to_string())
            }
        })
    }

    fn push_bind(self, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            SqlValue::Null => qb.push_bind(None::<String>),
            SqlValue::Integer(v) => qb.push_bind(v),
            SqlValue::Real(v) => qb.push_bind(v),
            SqlValue::Text(v) => qb.push_bind(v),
            SqlValue::Bool(v) => qb.push_bind(v),
        };
    }
}

/// `ilike` pattern for LIKE: `*` and `%` match any run, everything else is literal
pub fn ilike_pattern(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '*' | '%' => out.push('%'),
            '_' => out.push_str("\\_"),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out
}

/// `like` pattern for GLOB (case-sensitive): `*` and `%` match any run
pub fn glob_pattern(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '*' | '%' => out.push('*'),
            '?' => out.push_str("[?]"),
            '[' => out.push_str("[[]"),
            c => out.push(c),
        }
    }
    out
}

fn push_where(
    qb: &mut QueryBuilder<'_, Sqlite>,
    table: &TableDef,
    filters: &[Filter],
) -> AppResult<()> {
    for (i, filter) in filters.iter().enumerate() {
        let column = table.column(&filter.column)?;
        qb.push(if i == 0 { " WHERE " } else { " AND " });

        if filter.op.is_pattern() {
            if !column.kind.is_textual() {
                return Err(AppError::invalid_filter(format!(
                    "`{}` is not supported on column {}",
                    filter.op, column.name
                )));
            }
            if filter.op == FilterOp::Like {
                qb.push(column.name).push(" GLOB ");
                qb.push_bind(glob_pattern(&filter.value));
            } else {
                qb.push("lower(").push(column.name).push(") LIKE lower(");
                qb.push_bind(ilike_pattern(&filter.value));
                qb.push(") ESCAPE '\\'");
            }
            continue;
        }

        let op = match filter.op {
            FilterOp::Eq => " = ",
            FilterOp::Neq => " <> ",
            FilterOp::Gt => " > ",
            FilterOp::Gte => " >= ",
            FilterOp::Lt => " < ",
            FilterOp::Lte => " <= ",
            FilterOp::Like | FilterOp::Ilike => unreachable!("pattern ops handled above"),
        };
        qb.push(column.name).push(op);
        SqlValue::from_filter(column, &filter.value)?.push_bind(qb);
    }
    Ok(())
}

/// Decode a row into a JSON object using the registry column types
pub fn row_to_json(table: &TableDef, row: &SqliteRow) -> AppResult<Value> {
    let mut obj = Map::with_capacity(table.columns.len());
    for column in table.columns {
        let name = column.name;
        let value = match column.kind {
            ColumnKind::Integer => row
                .try_get::<Option<i64>, _>(name)
                .map(|v| v.map(Value::from).unwrap_or(Value::Null)),
            ColumnKind::Real => row.try_get::<Option<f64>, _>(name).map(|v| {
                v.and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }),
            ColumnKind::Bool => row
                .try_get::<Option<bool>, _>(name)
                .map(|v| v.map(Value::Bool).unwrap_or(Value::Null)),
            ColumnKind::Text | ColumnKind::ReservationStatus | ColumnKind::ContactStatus => row
                .try_get::<Option<String>, _>(name)
                .map(|v| v.map(Value::String).unwrap_or(Value::Null)),
        }
        .map_err(|e| AppError::database(format!("Failed to decode {}.{name}: {e}", table.name)))?;
        obj.insert(name.to_string(), value);
    }
    Ok(Value::Object(obj))
}

/// Map a driver error to an API error
pub fn map_db_error(table: &TableDef, err: sqlx::Error) -> AppError {
    let Some(db_err) = err.as_database_error() else {
        return AppError::database(err.to_string());
    };
    match db_err.kind() {
        ErrorKind::UniqueViolation => {
            let code = match table.kind {
                TableKind::Categories => ErrorCode::CategoryNameExists,
                _ => ErrorCode::AlreadyExists,
            };
            AppError::with_message(code, format!("Duplicate value in {}", table.name))
        }
        ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
            AppError::validation(format!("Constraint violated in {}: {}", table.name, db_err.message()))
        }
        _ => AppError::database(err.to_string()),
    }
}

fn fetch_rows(table: &TableDef, rows: Vec<SqliteRow>) -> AppResult<Vec<Value>> {
    rows.iter().map(|row| row_to_json(table, row)).collect()
}

/// SELECT with filters, ordering and paging
pub async fn select(pool: &SqlitePool, table: &TableDef, query: &TableQuery) -> AppResult<Vec<Value>> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT ");
    qb.push(table.column_list()).push(" FROM ").push(table.name);
    push_where(&mut qb, table, &query.filters)?;

    qb.push(" ORDER BY ");
    for order in &query.order {
        let column = table.column(&order.column)?;
        qb.push(column.name).push(match order.direction {
            Direction::Asc => " ASC, ",
            Direction::Desc => " DESC, ",
        });
    }
    // Stable tie-breaker (and default order)
    qb.push("id ASC");

    match (query.limit, query.offset) {
        (Some(limit), offset) => {
            qb.push(" LIMIT ").push_bind(clamp_i64(limit));
            if let Some(offset) = offset {
                qb.push(" OFFSET ").push_bind(clamp_i64(offset));
            }
        }
        (None, Some(offset)) => {
            qb.push(" LIMIT -1 OFFSET ").push_bind(clamp_i64(offset));
        }
        (None, None) => {}
    }

    let rows = qb
        .build()
        .fetch_all(pool)
        .await
        .map_err(|e| map_db_error(table, e))?;
    fetch_rows(table, rows)
}

fn clamp_i64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

/// INSERT one row, returning it
pub async fn insert(
    pool: &SqlitePool,
    table: &TableDef,
    values: Vec<(&'static str, SqlValue)>,
) -> AppResult<Value> {
    let mut qb = QueryBuilder::<Sqlite>::new("INSERT INTO ");
    qb.push(table.name).push(" (");
    {
        let mut cols = qb.separated(", ");
        for (name, _) in &values {
            cols.push(*name);
        }
    }
    qb.push(") VALUES (");
    for (i, (_, value)) in values.into_iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        value.push_bind(&mut qb);
    }
    qb.push(") RETURNING ").push(table.column_list());

    let row = qb
        .build()
        .fetch_one(pool)
        .await
        .map_err(|e| map_db_error(table, e))?;
    row_to_json(table, &row)
}

/// UPDATE matching rows, returning them
pub async fn update(
    pool: &SqlitePool,
    table: &TableDef,
    filters: &[Filter],
    values: Vec<(&'static str, SqlValue)>,
) -> AppResult<Vec<Value>> {
    let mut qb = QueryBuilder::<Sqlite>::new("UPDATE ");
    qb.push(table.name).push(" SET ");
    for (i, (name, value)) in values.into_iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(name).push(" = ");
        value.push_bind(&mut qb);
    }
    push_where(&mut qb, table, filters)?;
    qb.push(" RETURNING ").push(table.column_list());

    let rows = qb
        .build()
        .fetch_all(pool)
        .await
        .map_err(|e| map_db_error(table, e))?;
    fetch_rows(table, rows)
}

/// DELETE matching rows, returning them
pub async fn delete(pool: &SqlitePool, table: &TableDef, filters: &[Filter]) -> AppResult<Vec<Value>> {
    let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM ");
    qb.push(table.name);
    push_where(&mut qb, table, filters)?;
    qb.push(" RETURNING ").push(table.column_list());

    let rows = qb
        .build()
        .fetch_all(pool)
        .await
        .map_err(|e| map_db_error(table, e))?;
    fetch_rows(table, rows)
}

/// IDs of rows matching the filters
pub async fn matching_ids(pool: &SqlitePool, table: &TableDef, filters: &[Filter]) -> AppResult<Vec<i64>> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT id FROM ");
    qb.push(table.name);
    push_where(&mut qb, table, filters)?;

    let rows = qb
        .build()
        .fetch_all(pool)
        .await
        .map_err(|e| map_db_error(table, e))?;
    rows.iter()
        .map(|r| r.try_get::<i64, _>("id").map_err(|e| AppError::database(e.to_string())))
        .collect()
}
