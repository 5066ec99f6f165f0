//! Error response bodies.
//!
//! # Design Decisions
//! - 404 bodies are JSON and carry the underlying error text, the request
//!   URI and, for static routes, the resolved file path
//! - Upstream transport failures map to 502 Bad Gateway

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: String,
    pub uri: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// 404 for a request no route matched.
pub fn no_route(uri: &str) -> Response {
    let body = ErrorBody {
        error: "no route".to_string(),
        uri,
        path: None,
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

/// 404 for a static lookup that failed.
pub fn not_found(uri: &str, path: &str, error: impl ToString) -> Response {
    let body = ErrorBody {
        error: error.to_string(),
        uri,
        path: Some(path.to_string()),
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

/// 502 for a backend that could not be reached.
pub fn bad_gateway(uri: &str, target: &str, error: impl ToString) -> Response {
    let body = ErrorBody {
        error: error.to_string(),
        uri,
        path: Some(target.to_string()),
    };
    (StatusCode::BAD_GATEWAY, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let response = not_found("/static/missing.txt", "assets/missing.txt", "path not found");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["error"], "path not found");
        assert_eq!(json["uri"], "/static/missing.txt");
        assert_eq!(json["path"], "assets/missing.txt");
    }

    #[tokio::test]
    async fn test_no_route_body_omits_path() {
        let json = body_json(no_route("/nowhere")).await;
        assert_eq!(json["error"], "no route");
        assert!(json.get("path").is_none());
    }
}
