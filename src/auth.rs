use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::state::AppState;

/// Proof that a request carried the configured write secret.
///
/// Extractor for write routes: compares `Authorization: Bearer <secret>`
/// against the configured secret for exact equality. Runs as a request-parts
/// extractor, so it always resolves before the body is read.
pub struct WriteAuth;

impl FromRequestParts<AppState> for WriteAuth {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let authorized = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "))
            .is_some_and(|token| token == state.config.api_secret);

        async move {
            if authorized {
                Ok(WriteAuth)
            } else {
                Err(ApiError::Unauthorized)
            }
        }
    }
}
