use crate::auth::WriteAuth;
use crate::error::{ApiError, ErrorResponse};
use crate::models::{EmojiUpdate, UpdateEmojisResponse};
use crate::routes;
use crate::state::AppState;
use crate::store::keys;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// GET /emojis handler - Retrieve the emoji collection
///
/// Synthesizes an empty collection if nothing has been written yet.
#[utoipa::path(
    get,
    path = routes::EMOJIS,
    responses(
        (status = 200, description = "Current emoji collection", body = serde_json::Value),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "emojis"
)]
pub async fn get_emojis_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let collection = state
        .store
        .get(keys::EMOJIS)
        .await?
        .unwrap_or_else(|| json!({ "emojis": [] }));

    tracing::debug!("Serving emoji collection");
    Ok((
        [(header::CACHE_CONTROL, "public, max-age=60")],
        Json(collection),
    ))
}

/// POST /update-emojis handler - Replace the emoji collection
///
/// Whole-document overwrite; only the validated `emojis` array is persisted.
#[utoipa::path(
    post,
    path = routes::UPDATE_EMOJIS,
    request_body = EmojiUpdate,
    responses(
        (status = 200, description = "Collection replaced", body = UpdateEmojisResponse),
        (status = 400, description = "Malformed or wrongly-shaped payload", body = ErrorResponse),
        (status = 401, description = "Missing or wrong bearer token", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    security(("write_secret" = [])),
    tag = "emojis"
)]
pub async fn update_emojis_handler(
    State(state): State<AppState>,
    _auth: WriteAuth,
    payload: Result<Json<EmojiUpdate>, JsonRejection>,
) -> Result<Json<UpdateEmojisResponse>, ApiError> {
    let Json(update) = payload.map_err(|_| ApiError::InvalidPayload)?;
    let count = update.emojis.len();

    state
        .store
        .put(keys::EMOJIS, &json!({ "emojis": update.emojis }))
        .await?;

    tracing::info!("Replaced emoji collection ({} entries)", count);
    Ok(Json(UpdateEmojisResponse {
        success: true,
        count,
    }))
}
