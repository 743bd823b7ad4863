//! Table API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::Value;
use shared::query::TableQuery;

use crate::auth::Caller;
use crate::core::ServerState;
use crate::tables;
use crate::utils::AppResult;

type QueryPairs = Query<Vec<(String, String)>>;

/// GET /rest/{table}
pub async fn select(
    State(state): State<ServerState>,
    caller: Caller,
    Path(table): Path<String>,
    Query(pairs): QueryPairs,
) -> AppResult<Json<Vec<Value>>> {
    let query = TableQuery::from_query_pairs(pairs)?;
    let rows = tables::select(state.get_db(), &caller, &table, &query).await?;
    Ok(Json(rows))
}

/// POST /rest/{table}
pub async fn insert(
    State(state): State<ServerState>,
    caller: Caller,
    Path(table): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<Json<Value>> {
    let row = tables::insert(state.get_db(), &caller, &table, body).await?;
    Ok(Json(row))
}

/// PATCH /rest/{table}
pub async fn update(
    State(state): State<ServerState>,
    caller: Caller,
    Path(table): Path<String>,
    Query(pairs): QueryPairs,
    Json(body): Json<Value>,
) -> AppResult<Json<Vec<Value>>> {
    let query = TableQuery::from_query_pairs(pairs)?;
    let rows = tables::update(state.get_db(), &caller, &table, &query, body).await?;
    Ok(Json(rows))
}

/// DELETE /rest/{table}
pub async fn delete(
    State(state): State<ServerState>,
    caller: Caller,
    Path(table): Path<String>,
    Query(pairs): QueryPairs,
) -> AppResult<Json<Vec<Value>>> {
    let query = TableQuery::from_query_pairs(pairs)?;
    let rows = tables::delete(state.get_db(), &caller, &table, &query).await?;
    Ok(Json(rows))
}
