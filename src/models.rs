use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Write payload for the emoji collection
///
/// Unknown top-level fields are dropped at the parse step; only the validated
/// `emojis` array is persisted.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct EmojiUpdate {
    pub emojis: Vec<JsonValue>,
}

/// Response type for successful emoji updates
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateEmojisResponse {
    pub success: bool,
    pub count: usize,
}

/// Response type for successful status updates
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateStatusResponse {
    pub success: bool,
}
