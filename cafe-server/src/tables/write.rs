//! Write payload preparation
//!
//! Bodies are checked against the column whitelist, decoded into the typed
//! payload of the target table and validated. The validated payload is then
//! turned back into column values, which normalizes status aliases.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use shared::models::{
    CategoryCreate, CategoryUpdate, ContactMessageCreate, ContactMessageUpdate, ProductCreate,
    ProductUpdate, ReservationCreate, ReservationUpdate,
};
use shared::util::{now_millis, snowflake_id};
use shared::validation::Validate;

use super::registry::{Operation, TableDef, TableKind};
use super::sql::SqlValue;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Column/value pairs ready for binding
pub type ColumnValues = Vec<(&'static str, SqlValue)>;

fn body_object(body: Value) -> AppResult<Map<String, Value>> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::invalid_request("Request body must be a JSON object")),
    }
}

/// Decode + validate, then re-encode as a JSON object
fn normalize<T>(body: &Map<String, Value>) -> AppResult<Map<String, Value>>
where
    T: DeserializeOwned + Serialize + Validate,
{
    let payload: T = serde_json::from_value(Value::Object(body.clone()))
        .map_err(|e| AppError::validation(e.to_string()))?;
    payload.validate()?;

    match serde_json::to_value(&payload) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::internal("Payload did not encode as an object")),
        Err(e) => Err(AppError::internal(e.to_string())),
    }
}

fn denied(table: &TableDef, op: Operation) -> AppError {
    AppError::with_message(
        ErrorCode::OperationNotAllowed,
        format!("{} is not allowed on {}", op.as_str(), table.name),
    )
}

/// Collect bindable values for the body keys in registry order
///
/// A key sent as `null` clears the column; the normalized payload drops it.
fn column_values(
    table: &TableDef,
    body: &Map<String, Value>,
    normalized: &Map<String, Value>,
) -> AppResult<ColumnValues> {
    let mut values = Vec::with_capacity(body.len());
    for column in table.columns {
        if !body.contains_key(column.name) {
            continue;
        }
        let value = normalized.get(column.name).unwrap_or(&Value::Null);
        values.push((column.name, SqlValue::from_json(column, value)?));
    }
    Ok(values)
}

/// Prepare an INSERT: validated client columns plus server-assigned id and timestamp
pub fn prepare_insert(table: &TableDef, body: Value) -> AppResult<ColumnValues> {
    let body = body_object(body)?;
    table.check_writable(body.keys(), Operation::Insert)?;

    let normalized = match table.kind {
        TableKind::Products => normalize::<ProductCreate>(&body)?,
        TableKind::Categories => normalize::<CategoryCreate>(&body)?,
        TableKind::Reservations => normalize::<ReservationCreate>(&body)?,
        TableKind::ContactMessages => normalize::<ContactMessageCreate>(&body)?,
        TableKind::Admin => return Err(denied(table, Operation::Insert)),
    };

    let mut values = vec![("id", SqlValue::Integer(snowflake_id()))];
    values.extend(column_values(table, &body, &normalized)?);
    values.push(("created_at", SqlValue::Integer(now_millis())));
    Ok(values)
}

/// Prepare an UPDATE patch
pub fn prepare_update(table: &TableDef, body: Value) -> AppResult<ColumnValues> {
    let body = body_object(body)?;
    if body.is_empty() {
        return Err(AppError::invalid_request("Update body has no columns"));
    }
    table.check_writable(body.keys(), Operation::Update)?;

    let normalized = match table.kind {
        TableKind::Products => normalize::<ProductUpdate>(&body)?,
        TableKind::Categories => normalize::<CategoryUpdate>(&body)?,
        TableKind::Reservations => normalize::<ReservationUpdate>(&body)?,
        TableKind::ContactMessages => normalize::<ContactMessageUpdate>(&body)?,
        TableKind::Admin => return Err(denied(table, Operation::Update)),
    };

    column_values(table, &body, &normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::registry::lookup;
    use serde_json::json;

    fn value_of<'a>(values: &'a ColumnValues, name: &str) -> Option<&'a SqlValue> {
        values.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    #[test]
    fn test_insert_reservation_assigns_server_columns() {
        let table = lookup("reservations").unwrap();
        let values = prepare_insert(
            table,
            json!({
                "name": "Budi",
                "email": "budi@x.com",
                "phone": "081234567890",
                "date": "2099-01-01",
                "time": "19:00",
                "guests": 4
            }),
        )
        .unwrap();

        assert!(matches!(value_of(&values, "id"), Some(SqlValue::Integer(id)) if *id > 0));
        assert!(matches!(value_of(&values, "created_at"), Some(SqlValue::Integer(_))));
        assert_eq!(value_of(&values, "guests"), Some(&SqlValue::Integer(4)));
        // Status comes from the column default
        assert_eq!(value_of(&values, "status"), None);
    }

    #[test]
    fn test_insert_rejects_client_status() {
        let table = lookup("reservations").unwrap();
        let err = prepare_insert(
            table,
            json!({"name": "Budi", "status": "diterima"}),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ColumnNotWritable);
    }

    #[test]
    fn test_insert_validates_payload() {
        let table = lookup("reservations").unwrap();
        let err = prepare_insert(
            table,
            json!({
                "name": "Budi",
                "email": "budi@x.com",
                "phone": "081234567890",
                "date": "2099-01-01",
                "time": "19:00",
                "guests": 13
            }),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::GuestCountOutOfRange);
    }

    #[test]
    fn test_update_normalizes_status_alias() {
        let table = lookup("reservations").unwrap();
        let values = prepare_update(table, json!({"status": "accepted"})).unwrap();
        assert_eq!(
            values,
            vec![("status", SqlValue::Text("diterima".to_string()))]
        );

        let err = prepare_update(table, json!({"status": "done"})).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_update_null_clears_nullable_column() {
        let table = lookup("products").unwrap();
        let values = prepare_update(table, json!({"image_url": null, "price": 18000})).unwrap();
        assert_eq!(
            values,
            vec![
                ("price", SqlValue::Real(18000.0)),
                ("image_url", SqlValue::Null),
            ]
        );
    }

    #[test]
    fn test_update_rejects_empty_and_server_columns() {
        let table = lookup("products").unwrap();
        let err = prepare_update(table, json!({})).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);

        let err = prepare_update(table, json!({"created_at": 1})).unwrap_err();
        assert_eq!(err.code, ErrorCode::ColumnNotWritable);

        let err = prepare_update(table, json!([1, 2])).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[test]
    fn test_admin_table_writes_denied() {
        let table = lookup("admin").unwrap();
        let err = prepare_update(table, json!({"username": "x"})).unwrap_err();
        assert_eq!(err.code, ErrorCode::ColumnNotWritable);
    }

    #[test]
    fn test_submitted_columns_fixed_after_insert() {
        let reservations = lookup("reservations").unwrap();
        for key in ["name", "email", "phone"] {
            let err = prepare_update(reservations, json!({ key: "x" })).unwrap_err();
            assert_eq!(err.code, ErrorCode::ColumnNotWritable, "{key}");
        }
        let values =
            prepare_update(reservations, json!({"special_request": null, "guests": 6})).unwrap();
        assert_eq!(values.len(), 2);

        let messages = lookup("contact_messages").unwrap();
        let err = prepare_update(messages, json!({"message": "edited"})).unwrap_err();
        assert_eq!(err.code, ErrorCode::ColumnNotWritable);
    }

    #[test]
    fn test_updatable_columns_match_update_payloads() {
        fn accepts(table: &TableDef, key: &str) -> bool {
            let body = Value::Object(Map::from_iter([(key.to_string(), Value::Null)]));
            match table.kind {
                TableKind::Products => serde_json::from_value::<ProductUpdate>(body).is_ok(),
                TableKind::Categories => serde_json::from_value::<CategoryUpdate>(body).is_ok(),
                TableKind::Reservations => {
                    serde_json::from_value::<ReservationUpdate>(body).is_ok()
                }
                TableKind::ContactMessages => {
                    serde_json::from_value::<ContactMessageUpdate>(body).is_ok()
                }
                TableKind::Admin => false,
            }
        }

        for table in crate::tables::registry::all() {
            for column in table.columns.iter().filter(|c| c.updatable) {
                assert!(accepts(table, column.name), "{}.{}", table.name, column.name);
            }
        }
    }
}
