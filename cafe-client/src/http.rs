// cafe-client/src/http.rs
// HTTP 传输层 - 网络通信

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Client, Method};
use serde_json::Value;
use shared::error::{ErrorBody, ErrorCode};

use crate::{ClientConfig, ClientError, ClientResult};

/// One remote round trip
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRequest {
    pub method: Method,
    /// Path relative to the base URL, starting with `/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RemoteRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// HTTP 客户端 trait
///
/// The bearer token lives with the transport so that every handle cloned
/// from the same client observes login and logout.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: RemoteRequest) -> ClientResult<Value>;
    fn token(&self) -> Option<String>;
    fn set_token(&self, token: Option<String>);
}

/// 网络 HTTP 客户端
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.normalized_base_url().to_string(),
            token: Arc::new(RwLock::new(config.token.clone())),
        })
    }

    /// 获取基础 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth_header(&self) -> Option<String> {
        self.token.read().as_ref().map(|t| format!("Bearer {}", t))
    }

    async fn handle_response(response: reqwest::Response) -> ClientResult<Value> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // 尝试解析为 API 错误响应
            if let Ok(body) = serde_json::from_str::<ErrorBody>(&text) {
                return Err(ClientError::Api {
                    status: status.as_u16(),
                    code: body.error_code(),
                    message: body.message,
                    details: body.details,
                });
            }
            // 降级: 非结构化错误 (代理、超时层等)
            return Err(ClientError::Api {
                status: status.as_u16(),
                code: ErrorCode::Unknown,
                message: if text.is_empty() {
                    status.to_string()
                } else {
                    text
                },
                details: None,
            });
        }

        if text.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn send(&self, request: RemoteRequest) -> ClientResult<Value> {
        let url = format!("{}{}", self.base_url, request.path);
        tracing::debug!(method = %request.method, url = %url, query = ?request.query, "Remote call");

        let mut req = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }
        if let Some(auth) = self.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }

        let result = match req.send().await {
            Ok(response) => Self::handle_response(response).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = &result {
            tracing::warn!(method = %request.method, url = %url, error = %e, "Remote call failed");
        }
        result
    }

    fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }
}
