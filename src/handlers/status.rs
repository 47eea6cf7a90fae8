use crate::auth::WriteAuth;
use crate::error::{ApiError, ErrorResponse};
use crate::models::UpdateStatusResponse;
use crate::routes;
use crate::state::AppState;
use crate::store::keys;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value as JsonValue};

/// GET /status handler - Retrieve the bot status
///
/// Synthesizes an offline status if nothing has been written yet.
#[utoipa::path(
    get,
    path = routes::STATUS,
    responses(
        (status = 200, description = "Current bot status", body = serde_json::Value),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "status"
)]
pub async fn get_status_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let status = state
        .store
        .get(keys::BOT_STATUS)
        .await?
        .unwrap_or_else(|| json!({ "online": false }));

    tracing::debug!("Serving bot status");
    Ok((
        [(header::CACHE_CONTROL, "public, max-age=30")],
        Json(status),
    ))
}

/// POST /update-status handler - Replace the bot status
///
/// Accepts an arbitrary JSON object and stamps it with the current UTC time
/// under `lastUpdate` before persisting.
#[utoipa::path(
    post,
    path = routes::UPDATE_STATUS,
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Status replaced", body = UpdateStatusResponse),
        (status = 400, description = "Body is not a JSON object", body = ErrorResponse),
        (status = 401, description = "Missing or wrong bearer token", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    security(("write_secret" = [])),
    tag = "status"
)]
pub async fn update_status_handler(
    State(state): State<AppState>,
    _auth: WriteAuth,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Json<UpdateStatusResponse>, ApiError> {
    let Json(mut status) = payload.map_err(|_| ApiError::InvalidPayload)?;

    let Some(fields) = status.as_object_mut() else {
        return Err(ApiError::InvalidPayload);
    };
    fields.insert(
        "lastUpdate".to_string(),
        JsonValue::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );

    state.store.put(keys::BOT_STATUS, &status).await?;

    tracing::info!("Replaced bot status");
    Ok(Json(UpdateStatusResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, StoreConfig};
    use crate::store::{MemoryStore, Store};
    use axum::http::StatusCode;
    use axum::{
        body::Body,
        http::Request,
        routing::{get, post},
        Router,
    };
    use chrono::DateTime;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_app(secret: &str) -> Router {
        let config = Config {
            api_secret: secret.to_string(),
            store: StoreConfig::Memory,
            service_port: 3000,
            service_host: "0.0.0.0".to_string(),
        };

        let state = AppState {
            store: Store::Memory(MemoryStore::new()),
            config: Arc::new(config),
        };

        Router::new()
            .route(routes::STATUS, get(get_status_handler))
            .route(routes::UPDATE_STATUS, post(update_status_handler))
            .with_state(state)
    }

    fn post_update(token: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/update-status")
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_status() -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri("/status")
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> JsonValue {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_get_before_any_write_returns_offline() {
        let app = test_app("abc");

        let response = app.oneshot(get_status()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("cache-control").unwrap(),
            "public, max-age=30"
        );
        assert_eq!(body_json(response).await, json!({ "online": false }));
    }

    #[tokio::test]
    async fn test_update_stamps_last_update() {
        let app = test_app("abc");

        let response = app
            .clone()
            .oneshot(post_update(Some("abc"), r#"{"a":1}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "success": true }));

        let response = app.oneshot(get_status()).await.unwrap();
        let status = body_json(response).await;

        assert_eq!(status["a"], json!(1));
        let last_update = status["lastUpdate"].as_str().unwrap();
        DateTime::parse_from_rfc3339(last_update).unwrap();
        assert!(last_update.ends_with('Z'));
    }

    #[tokio::test]
    async fn test_last_update_increases_across_writes() {
        let app = test_app("abc");

        app.clone()
            .oneshot(post_update(Some("abc"), r#"{"online":true}"#))
            .await
            .unwrap();
        let first = body_json(app.clone().oneshot(get_status()).await.unwrap()).await;

        tokio::time::sleep(Duration::from_millis(10)).await;

        app.clone()
            .oneshot(post_update(Some("abc"), r#"{"online":true}"#))
            .await
            .unwrap();
        let second = body_json(app.oneshot(get_status()).await.unwrap()).await;

        // Fixed-width RFC 3339 UTC strings compare chronologically
        assert!(second["lastUpdate"].as_str().unwrap() > first["lastUpdate"].as_str().unwrap());
    }

    #[tokio::test]
    async fn test_update_overwrites_whole_status() {
        let app = test_app("abc");

        app.clone()
            .oneshot(post_update(Some("abc"), r#"{"online":true,"guilds":3}"#))
            .await
            .unwrap();
        app.clone()
            .oneshot(post_update(Some("abc"), r#"{"online":false}"#))
            .await
            .unwrap();

        let status = body_json(app.oneshot(get_status()).await.unwrap()).await;

        assert_eq!(status["online"], json!(false));
        assert!(status.get("guilds").is_none());
    }

    #[tokio::test]
    async fn test_update_without_auth_is_rejected_and_record_unchanged() {
        let app = test_app("abc");

        app.clone()
            .oneshot(post_update(Some("abc"), r#"{"online":true}"#))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(post_update(None, r#"{"online":false}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await, json!({ "error": "Unauthorized" }));

        let status = body_json(app.oneshot(get_status()).await.unwrap()).await;
        assert_eq!(status["online"], json!(true));
    }

    #[tokio::test]
    async fn test_update_with_wrong_token_is_rejected() {
        let app = test_app("abc");

        let response = app
            .oneshot(post_update(Some("wrong"), r#"{"online":true}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_update_with_non_object_body_is_rejected() {
        let app = test_app("abc");

        let response = app
            .oneshot(post_update(Some("abc"), r#"[1,2,3]"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Invalid payload" })
        );
    }

    #[tokio::test]
    async fn test_update_with_malformed_json_is_rejected() {
        let app = test_app("abc");

        let response = app
            .oneshot(post_update(Some("abc"), "{not json}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
