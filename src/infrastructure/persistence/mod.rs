//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx. Queries
//! with a dynamic shape are assembled in [`tag_queries`] with bound values.
//!
//! # Repositories
//!
//! - [`PgTagRepository`] - Tag listing, statistics and maintenance
//! - [`PgTokenRepository`] - API token storage and validation

pub mod pg_tag_repository;
pub mod pg_token_repository;
pub mod tag_queries;

pub use pg_tag_repository::PgTagRepository;
pub use pg_token_repository::PgTokenRepository;
