/// Plain-text listing served for any method+path outside the routing table.
const ROUTE_LISTING: &str = "emoji-status-api\n\n\
Available routes:\n\
- GET /emojis\n\
- POST /update-emojis (bearer auth)\n\
- GET /status\n\
- POST /update-status (bearer auth)\n\
- GET /health\n";

/// Fallback handler - static route listing
///
/// Wired both as the router-wide fallback and as the per-route method
/// fallback, so an unmatched method on a known path gets the listing too.
pub async fn index_handler() -> &'static str {
    ROUTE_LISTING
}
