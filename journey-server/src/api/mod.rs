//! HTTP API handlers

pub mod auth;
pub mod captions;
pub mod health;
pub mod photos;
pub mod sync;

pub use captions::{list_captions, update_caption};
pub use health::health_routes;
pub use photos::list_photos;
pub use sync::{dev_sync, trigger_sync};
