use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{EmojiUpdate, UpdateEmojisResponse, UpdateStatusResponse};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "emoji-status-api",
        version = "1.0.0",
        description = "Stores a site's emoji collection and bot status in a hosted key-value store"
    ),
    paths(
        handlers::health::health_handler,
        handlers::emojis::get_emojis_handler,
        handlers::emojis::update_emojis_handler,
        handlers::status::get_status_handler,
        handlers::status::update_status_handler
    ),
    components(
        schemas(
            EmojiUpdate,
            UpdateEmojisResponse,
            UpdateStatusResponse,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    modifiers(&WriteSecret),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "emojis", description = "Emoji collection operations"),
        (name = "status", description = "Bot status operations")
    )
)]
pub struct ApiDoc;

/// Registers the bearer scheme the write routes reference as `write_secret`.
struct WriteSecret;

impl Modify for WriteSecret {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "write_secret",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}
