//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod tags;

pub use health::health_handler;
pub use tags::{delete_tags_handler, list_tags_handler, rename_tag_handler, tags_stats_handler};
