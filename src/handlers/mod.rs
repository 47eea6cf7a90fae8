pub mod emojis;
pub mod health;
pub mod index;
pub mod status;

pub use emojis::{get_emojis_handler, update_emojis_handler};
pub use health::health_handler;
pub use index::index_handler;
pub use status::{get_status_handler, update_status_handler};
