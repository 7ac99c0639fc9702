//! Error response normalization
//!
//! Every response with status 400 or above leaves the service as
//! `{"success": false, "msg": <message>}`. The message is taken from the
//! original body: the first value of an `errors` map, else a `msg`,
//! `message` or `error` string, else the raw text. An empty or unreadable
//! body becomes "Unknown error occurred".

use axum::{
    body::{Body, to_bytes},
    http::{HeaderValue, header},
    response::Response,
};
use serde_json::{Value, json};
use tracing::{debug, warn};

const MAX_ERROR_BODY: usize = 64 * 1024;
const UNKNOWN_ERROR: &str = "Unknown error occurred";

pub async fn normalize_error_response(response: Response) -> Response {
    if response.status().as_u16() < 400 {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let msg = match to_bytes(body, MAX_ERROR_BODY).await {
        Ok(bytes) => {
            debug!(status = %parts.status, "Normalizing error response");
            error_message(&bytes)
        }
        Err(e) => {
            warn!(error = %e, "Could not read error response body");
            UNKNOWN_ERROR.to_string()
        }
    };

    let body = json!({ "success": false, "msg": msg }).to_string();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    Response::from_parts(parts, Body::from(body))
}

fn error_message(bytes: &[u8]) -> String {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => {
            if let Some(Value::Object(errors)) = map.get("errors") {
                if let Some(first) = errors.values().next() {
                    return scalar_text(first);
                }
            }
            ["msg", "message", "error"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .map(str::to_string)
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
        }
        Ok(Value::String(text)) if !text.trim().is_empty() => text,
        Ok(_) => UNKNOWN_ERROR.to_string(),
        Err(_) => {
            let text = String::from_utf8_lossy(bytes).trim().to_string();
            if text.is_empty() {
                UNKNOWN_ERROR.to_string()
            } else {
                text
            }
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.first().map(scalar_text).unwrap_or_default(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    async fn normalized(status: StatusCode, body: &'static str) -> Value {
        let response = Response::builder()
            .status(status)
            .body(Body::from(body))
            .unwrap();
        let response = normalize_error_response(response).await;
        assert_eq!(response.status(), status);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let bytes = to_bytes(response.into_body(), MAX_ERROR_BODY).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn first_entry_of_errors_map_wins() {
        let body = normalized(
            StatusCode::BAD_REQUEST,
            r#"{"errors": {"username": "Username too short", "email": "Email is required"}}"#,
        )
        .await;
        assert_eq!(body, json!({ "success": false, "msg": "Username too short" }));
    }

    #[tokio::test]
    async fn existing_msg_is_kept() {
        let body = normalized(
            StatusCode::UNAUTHORIZED,
            r#"{"success": false, "msg": "Token has been revoked"}"#,
        )
        .await;
        assert_eq!(body["msg"], "Token has been revoked");
    }

    #[tokio::test]
    async fn plain_text_becomes_msg() {
        let body = normalized(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Failed to deserialize the JSON body",
        )
        .await;
        assert_eq!(body["msg"], "Failed to deserialize the JSON body");
    }

    #[tokio::test]
    async fn empty_body_is_unknown_error() {
        let body = normalized(StatusCode::METHOD_NOT_ALLOWED, "").await;
        assert_eq!(body, json!({ "success": false, "msg": "Unknown error occurred" }));
    }

    #[tokio::test]
    async fn success_passes_through() {
        let response = Response::builder()
            .status(StatusCode::OK)
            .body(Body::from("ok"))
            .unwrap();
        let response = normalize_error_response(response).await;
        let bytes = to_bytes(response.into_body(), MAX_ERROR_BODY).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }
}
