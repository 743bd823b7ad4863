// cafe-client/src/mock.rs
// 测试用 HTTP 客户端: 按顺序返回预设响应并记录请求

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use parking_lot::Mutex;
use serde_json::Value;
use shared::error::ErrorCode;

use crate::http::{HttpClient, RemoteRequest};
use crate::{ClientError, ClientResult};

#[derive(Default)]
pub struct MockHttpClient {
    responses: Mutex<VecDeque<ClientResult<Value>>>,
    requests: Mutex<Vec<RemoteRequest>>,
    token: Mutex<Option<String>>,
}

impl MockHttpClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_ok(&self, value: Value) {
        self.responses.lock().push_back(Ok(value));
    }

    pub fn push_api_error(&self, status: u16, code: ErrorCode) {
        self.responses.lock().push_back(Err(ClientError::Api {
            status,
            code,
            message: code.message().to_string(),
            details: None,
        }));
    }

    pub fn requests(&self) -> Vec<RemoteRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn last_request(&self) -> Option<RemoteRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn send(&self, request: RemoteRequest) -> ClientResult<Value> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::InvalidResponse("no mock response".into())))
    }

    fn token(&self) -> Option<String> {
        self.token.lock().clone()
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.lock() = token;
    }
}

/// Unsigned JWT-shaped token with the given `exp`
pub fn fake_token(exp: i64) -> String {
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"1","exp":{exp}}}"#));
    format!("eyJhbGciOiJIUzI1NiJ9.{payload}.sig")
}

/// Login response body for `dewi`, valid for an hour
pub fn login_body() -> Value {
    serde_json::json!({
        "token": fake_token(chrono::Utc::now().timestamp() + 3600),
        "admin": {
            "id": 1,
            "full_name": "Dewi Lestari",
            "email": "dewi@cafe.id",
            "username": "dewi",
            "phone": null,
            "created_at": 0
        }
    })
}
