//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and
//! are implemented in `crate::infrastructure::persistence`. Mock
//! implementations are generated via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`TagRepository`] - Tag listing, statistics, existence, rename and delete
//! - [`TokenRepository`] - API token authentication

pub mod tag_repository;
pub mod token_repository;

pub use tag_repository::{OrderDirection, TagRepository, TagsListFilter};
pub use token_repository::{ApiToken, TokenRepository, TokenRole};

#[cfg(test)]
pub use tag_repository::MockTagRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
