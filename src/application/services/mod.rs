//! Business logic services for the application layer.

pub mod auth_service;
pub mod tag_service;

pub use auth_service::AuthService;
pub use tag_service::{TagService, TagsPage};
