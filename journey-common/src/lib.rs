//! # Journey Map Common Library
//!
//! Shared code for the Journey Map service:
//! - Domain model (stored photos/locations, sync metadata, client views)
//! - Domain store over a whole-value key-value contract
//! - Configuration loading
//! - Error types and timestamp helpers

pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod time;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use store::{DomainStore, KvStore};
