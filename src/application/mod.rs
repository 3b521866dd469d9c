//! Application layer services implementing business logic.
//!
//! Services consume repository traits and apply authorization and validation
//! rules before delegating to the data layer.
//!
//! # Available Services
//!
//! - [`services::tag_service::TagService`] - Tag listing, statistics, rename and delete
//! - [`services::auth_service::AuthService`] - API token authentication
pub mod services;
