// cafe-client/src/table.rs
// 远程表客户端 - select/insert/update/delete + 过滤链

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::client::{LoginRequest, LoginResponse, RegisterRequest};
use shared::models::Admin;
use shared::query::{Direction, FilterOp, TableQuery};

use crate::http::{HttpClient, NetworkHttpClient, RemoteRequest};
use crate::{ClientConfig, ClientError, ClientResult};

/// Handle to the café table service
///
/// Cheap to clone; clones share the transport and the bearer token.
#[derive(Clone)]
pub struct CafeClient {
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for CafeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CafeClient")
            .field("authenticated", &self.http.token().is_some())
            .finish()
    }
}

impl CafeClient {
    /// Build a network client
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        Ok(Self::with_http(Arc::new(NetworkHttpClient::new(&config)?)))
    }

    /// Build on a custom transport
    pub fn with_http(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    /// Table handle
    pub fn from(&self, table: &str) -> TableRef {
        TableRef {
            client: self.clone(),
            table: table.to_string(),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.http.token()
    }

    pub fn set_token(&self, token: Option<String>) {
        self.http.set_token(token);
    }

    pub fn is_authenticated(&self) -> bool {
        self.http.token().is_some()
    }

    async fn call<T: DeserializeOwned>(&self, request: RemoteRequest) -> ClientResult<T> {
        let value = self.http.send(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    // ========== Auth API ==========

    /// Login with username and password; the token is kept for later calls
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let req = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let resp: LoginResponse = self
            .call(
                RemoteRequest::new(Method::POST, "/api/auth/login")
                    .with_body(serde_json::to_value(&req)?),
            )
            .await?;
        self.set_token(Some(resp.token.clone()));
        Ok(resp)
    }

    /// Register an admin account
    ///
    /// An anonymous client is signed in as the new account; a signed-in
    /// admin adding a colleague keeps their own token.
    pub async fn register(&self, req: &RegisterRequest) -> ClientResult<LoginResponse> {
        let resp: LoginResponse = self
            .call(
                RemoteRequest::new(Method::POST, "/api/auth/register")
                    .with_body(serde_json::to_value(req)?),
            )
            .await?;
        if !self.is_authenticated() {
            self.set_token(Some(resp.token.clone()));
        }
        Ok(resp)
    }

    /// Current admin profile
    pub async fn me(&self) -> ClientResult<Admin> {
        self.call(RemoteRequest::new(Method::GET, "/api/auth/me"))
            .await
    }

    /// Forget the token (tokens are stateless on the server)
    pub fn logout(&self) {
        self.set_token(None);
    }
}

/// A named remote table
#[derive(Debug, Clone)]
pub struct TableRef {
    client: CafeClient,
    table: String,
}

impl TableRef {
    pub fn name(&self) -> &str {
        &self.table
    }

    fn path(&self) -> String {
        format!("/rest/{}", self.table)
    }

    pub fn select(&self) -> SelectBuilder {
        SelectBuilder {
            table: self.clone(),
            query: TableQuery::new(),
        }
    }

    pub fn insert<B: Serialize>(&self, body: &B) -> InsertBuilder {
        InsertBuilder {
            table: self.clone(),
            body: serde_json::to_value(body).map_err(ClientError::from),
        }
    }

    pub fn update<B: Serialize>(&self, patch: &B) -> UpdateBuilder {
        UpdateBuilder {
            table: self.clone(),
            query: TableQuery::new(),
            body: serde_json::to_value(patch).map_err(ClientError::from),
        }
    }

    pub fn delete(&self) -> DeleteBuilder {
        DeleteBuilder {
            table: self.clone(),
            query: TableQuery::new(),
        }
    }
}

/// Filter chaining shared by select/update/delete
pub trait FilterBuilder: Sized {
    fn query_mut(&mut self) -> &mut TableQuery;

    fn filter(mut self, column: &str, op: FilterOp, value: impl ToString) -> Self {
        let query = std::mem::take(self.query_mut());
        *self.query_mut() = query.filter(column, op, value.to_string());
        self
    }

    fn eq(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Eq, value)
    }

    fn neq(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Neq, value)
    }

    fn gt(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Gt, value)
    }

    fn gte(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Gte, value)
    }

    fn lt(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Lt, value)
    }

    fn lte(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Lte, value)
    }

    /// Case-sensitive pattern, `*` matches any run
    fn like(self, column: &str, pattern: impl ToString) -> Self {
        self.filter(column, FilterOp::Like, pattern)
    }

    /// Case-insensitive pattern, `*` matches any run
    fn ilike(self, column: &str, pattern: impl ToString) -> Self {
        self.filter(column, FilterOp::Ilike, pattern)
    }
}

#[derive(Debug, Clone)]
pub struct SelectBuilder {
    table: TableRef,
    query: TableQuery,
}

impl FilterBuilder for SelectBuilder {
    fn query_mut(&mut self) -> &mut TableQuery {
        &mut self.query
    }
}

impl SelectBuilder {
    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.query = self.query.order_by(column, direction);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.query = self.query.limit(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.query = self.query.offset(offset);
        self
    }

    pub fn query(&self) -> &TableQuery {
        &self.query
    }

    /// All matching rows
    pub async fn fetch<T: DeserializeOwned>(self) -> ClientResult<Vec<T>> {
        let request = RemoteRequest::new(Method::GET, self.table.path())
            .with_query(self.query.to_query_pairs());
        self.table.client.call(request).await
    }

    /// Exactly one matching row
    pub async fn single<T: DeserializeOwned>(self) -> ClientResult<T> {
        let table = self.table.table.clone();
        let mut rows: Vec<T> = self.limit(2).fetch().await?;
        match rows.len() {
            1 => Ok(rows.remove(0)),
            0 => Err(ClientError::NotFound(format!("No matching row in {table}"))),
            n => Err(ClientError::InvalidResponse(format!(
                "Expected one row in {table}, got {n}"
            ))),
        }
    }
}

#[derive(Debug)]
pub struct InsertBuilder {
    table: TableRef,
    body: ClientResult<Value>,
}

impl InsertBuilder {
    /// The inserted row
    pub async fn execute<T: DeserializeOwned>(self) -> ClientResult<T> {
        let request = RemoteRequest::new(Method::POST, self.table.path()).with_body(self.body?);
        self.table.client.call(request).await
    }
}

#[derive(Debug)]
pub struct UpdateBuilder {
    table: TableRef,
    query: TableQuery,
    body: ClientResult<Value>,
}

impl FilterBuilder for UpdateBuilder {
    fn query_mut(&mut self) -> &mut TableQuery {
        &mut self.query
    }
}

impl UpdateBuilder {
    /// The updated rows
    pub async fn execute<T: DeserializeOwned>(self) -> ClientResult<Vec<T>> {
        let request = RemoteRequest::new(Method::PATCH, self.table.path())
            .with_query(self.query.to_query_pairs())
            .with_body(self.body?);
        self.table.client.call(request).await
    }
}

#[derive(Debug, Clone)]
pub struct DeleteBuilder {
    table: TableRef,
    query: TableQuery,
}

impl FilterBuilder for DeleteBuilder {
    fn query_mut(&mut self) -> &mut TableQuery {
        &mut self.query
    }
}

impl DeleteBuilder {
    /// The deleted rows
    pub async fn execute<T: DeserializeOwned>(self) -> ClientResult<Vec<T>> {
        let request = RemoteRequest::new(Method::DELETE, self.table.path())
            .with_query(self.query.to_query_pairs());
        self.table.client.call(request).await
    }
}
