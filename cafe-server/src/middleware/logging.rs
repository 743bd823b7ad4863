//! 请求日志中间件
//!
//! 每个请求一行: 请求 ID、方法、路由、表名 (表接口)、状态码和耗时

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use http::StatusCode;
use std::time::Instant;

/// Table named by a `/rest/{table}` URI
fn table_of(uri_path: &str) -> Option<&str> {
    uri_path
        .strip_prefix("/rest/")
        .map(|rest| rest.split('/').next().unwrap_or(rest))
        .filter(|t| !t.is_empty())
}

fn outcome(status: StatusCode) -> &'static str {
    if status.is_server_error() {
        "server error"
    } else if status.is_client_error() {
        "rejected"
    } else {
        "ok"
    }
}

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();

    // SetRequestIdLayer runs first, so the header is always present
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let method = req.method().clone();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let table = table_of(req.uri().path()).unwrap_or("-").to_string();
    let query_len = req.uri().query().map(str::len).unwrap_or(0);

    tracing::debug!(%request_id, %method, %route, %table, query_len, "Request started");

    let response = next.run(req).await;
    let status = response.status();
    let latency_ms = start.elapsed().as_millis() as u64;

    macro_rules! done {
        ($level:ident) => {
            tracing::$level!(
                %request_id,
                %method,
                %route,
                %table,
                status = status.as_u16(),
                latency_ms,
                "Request {}",
                outcome(status)
            )
        };
    }

    if status.is_server_error() {
        done!(error);
    } else if status.is_client_error() {
        done!(warn);
    } else {
        done!(info);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_of() {
        assert_eq!(table_of("/rest/reservations"), Some("reservations"));
        assert_eq!(table_of("/rest/products/extra"), Some("products"));
        assert_eq!(table_of("/rest/"), None);
        assert_eq!(table_of("/api/auth/login"), None);
    }

    #[test]
    fn test_outcome() {
        assert_eq!(outcome(StatusCode::OK), "ok");
        assert_eq!(outcome(StatusCode::CONFLICT), "rejected");
        assert_eq!(outcome(StatusCode::SERVICE_UNAVAILABLE), "server error");
    }
}
