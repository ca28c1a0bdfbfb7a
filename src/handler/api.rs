//! JSON API handlers
//!
//! Store and notify endpoints. Every failure is converted here into the
//! `{"error": "..."}` envelope; nothing propagates past the dispatch boundary.

use crate::config::AppState;
use crate::error::ApiError;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response, StatusCode};
use percent_encoding::percent_decode_str;
use serde_json::{json, Map, Value};
use std::sync::Arc;

const STORE_PREFIX: &str = "/api/store/";

/// Dispatch an API request. Returns `None` when the method/path pair is not an
/// API route, letting the caller fall through to the static responder.
pub async fn dispatch(
    method: &Method,
    path: &str,
    body: &Bytes,
    state: &Arc<AppState>,
) -> Option<Response<Full<Bytes>>> {
    let response = match (method, path) {
        (&Method::GET, "/api/store") => {
            http::json_response(StatusCode::OK, &state.store.get_all().await)
        }
        (&Method::POST, "/api/notify") => handle_notify(body, state).await,
        _ if path.starts_with(STORE_PREFIX) => {
            let key = normalize_key(path);
            match *method {
                Method::GET => handle_get_one(&key, state).await,
                Method::PUT => handle_put(&key, body, state).await,
                _ => return None,
            }
        }
        _ => return None,
    };

    logger::log_api_request(method.as_str(), path, response.status().as_u16());
    Some(response)
}

// Store keys arrive percent-encoded in the path; decode then trim.
fn normalize_key(path: &str) -> String {
    let raw = path.strip_prefix(STORE_PREFIX).unwrap_or("");
    percent_decode_str(raw)
        .decode_utf8_lossy()
        .trim()
        .to_string()
}

// An empty or whitespace body parses as an empty object, so a bare PUT still
// fails the missing-value check rather than the JSON parse.
fn parse_json_body(body: &Bytes) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body).map_err(|_| ApiError::invalid("Invalid JSON body"))
}

async fn handle_get_one(key: &str, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    match state.store.get_one(key).await {
        Ok(value) => http::json_response(
            StatusCode::OK,
            &json!({ "value": value.unwrap_or(Value::Null) }),
        ),
        Err(e) => http::error_response(&e),
    }
}

async fn handle_put(key: &str, body: &Bytes, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    match put_value(key, body, state).await {
        Ok(()) => http::json_response(StatusCode::OK, &json!({ "ok": true })),
        Err(e) => http::error_response(&e),
    }
}

async fn put_value(key: &str, body: &Bytes, state: &Arc<AppState>) -> Result<(), ApiError> {
    let parsed = parse_json_body(body)?;
    let value = parsed
        .as_object()
        .and_then(|obj| obj.get("value"))
        .ok_or_else(|| ApiError::invalid("Body must include value"))?;

    state.store.put(key, value.clone()).await?;
    logger::log_store_write(key);
    Ok(())
}

async fn handle_notify(body: &Bytes, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    match send_notification(body, state).await {
        Ok(()) => http::json_response(StatusCode::OK, &json!({ "ok": true })),
        Err(e) => http::error_response(&e),
    }
}

async fn send_notification(body: &Bytes, state: &Arc<AppState>) -> Result<(), ApiError> {
    let parsed = parse_json_body(body)?;
    let kind = parsed.get("type").and_then(Value::as_str).unwrap_or("");
    let payload = parsed.get("payload").cloned().unwrap_or(Value::Null);
    state.notifier.notify(kind, &payload).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::test_support::{body_json, test_state};

    #[tokio::test]
    async fn test_put_then_get_round_trips_over_the_api() {
        let (_dir, state) = test_state();
        let body = Bytes::from(r#"{"value":[{"id":1,"name":"Test"}]}"#);

        let resp = dispatch(&Method::PUT, "/api/store/bookings", &body, &state)
            .await
            .expect("api route");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!({"ok": true}));

        let resp = dispatch(&Method::GET, "/api/store/bookings", &Bytes::new(), &state)
            .await
            .expect("api route");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(resp).await,
            json!({"value": [{"id": 1, "name": "Test"}]})
        );
    }

    #[tokio::test]
    async fn test_get_all_returns_full_document() {
        let (_dir, state) = test_state();
        state
            .store
            .put("courses", json!(["tally"]))
            .await
            .expect("put");

        let resp = dispatch(&Method::GET, "/api/store", &Bytes::new(), &state)
            .await
            .expect("api route");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!({"courses": ["tally"]}));
    }

    #[tokio::test]
    async fn test_missing_key_reads_as_null() {
        let (_dir, state) = test_state();
        let resp = dispatch(&Method::GET, "/api/store/absent", &Bytes::new(), &state)
            .await
            .expect("api route");
        assert_eq!(body_json(resp).await, json!({"value": null}));
    }

    #[tokio::test]
    async fn test_blank_key_is_bad_request() {
        let (_dir, state) = test_state();
        let resp = dispatch(&Method::GET, "/api/store/%20%20", &Bytes::new(), &state)
            .await
            .expect("api route");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await, json!({"error": "Missing key"}));
    }

    #[tokio::test]
    async fn test_percent_encoded_keys_are_decoded() {
        let (_dir, state) = test_state();
        let body = Bytes::from(r#"{"value":1}"#);
        dispatch(&Method::PUT, "/api/store/cert%20count", &body, &state)
            .await
            .expect("api route");
        assert_eq!(
            state.store.get_one("cert count").await.expect("get"),
            Some(json!(1))
        );
    }

    #[tokio::test]
    async fn test_put_without_value_member_leaves_document_unchanged() {
        let (_dir, state) = test_state();
        state.store.put("k", json!("old")).await.expect("put");

        for body in [r#"{}"#, r#"{"other":1}"#, ""] {
            let resp = dispatch(
                &Method::PUT,
                "/api/store/k",
                &Bytes::from(body.to_owned()),
                &state,
            )
            .await
            .expect("api route");
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(resp).await, json!({"error": "Body must include value"}));
        }
        assert_eq!(state.store.get_one("k").await.expect("get"), Some(json!("old")));
    }

    #[tokio::test]
    async fn test_explicit_null_value_is_accepted() {
        let (_dir, state) = test_state();
        let resp = dispatch(
            &Method::PUT,
            "/api/store/k",
            &Bytes::from(r#"{"value":null}"#),
            &state,
        )
        .await
        .expect("api route");
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(state.store.get_all().await.contains_key("k"));
    }

    #[tokio::test]
    async fn test_malformed_json_body() {
        let (_dir, state) = test_state();
        let resp = dispatch(
            &Method::PUT,
            "/api/store/k",
            &Bytes::from("{not json"),
            &state,
        )
        .await
        .expect("api route");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await, json!({"error": "Invalid JSON body"}));
    }

    #[tokio::test]
    async fn test_notify_without_smtp_credentials() {
        let (_dir, state) = test_state();
        let resp = dispatch(
            &Method::POST,
            "/api/notify",
            &Bytes::from(r#"{"type":"Enquiry","payload":{"name":"Test"}}"#),
            &state,
        )
        .await
        .expect("api route");
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await, json!({"error": "email not configured"}));
    }

    #[tokio::test]
    async fn test_notify_validates_shape_before_configuration() {
        let (_dir, state) = test_state();
        for body in [
            r#"{"payload":{}}"#,
            r#"{"type":"  ","payload":{}}"#,
            r#"{"type":"Enquiry","payload":[1]}"#,
            r#"{"type":"Enquiry"}"#,
        ] {
            let resp = dispatch(
                &Method::POST,
                "/api/notify",
                &Bytes::from(body.to_owned()),
                &state,
            )
            .await
            .expect("api route");
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
        }
    }

    #[tokio::test]
    async fn test_unhandled_methods_fall_through() {
        let (_dir, state) = test_state();
        assert!(dispatch(&Method::POST, "/api/store/k", &Bytes::new(), &state)
            .await
            .is_none());
        assert!(dispatch(&Method::GET, "/api/other", &Bytes::new(), &state)
            .await
            .is_none());
        assert!(dispatch(&Method::GET, "/index.html", &Bytes::new(), &state)
            .await
            .is_none());
    }
}
