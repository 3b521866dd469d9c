//! Core domain entities.
//!
//! Entities are plain data structures without persistence concerns.
//!
//! # Entity Types
//!
//! - [`Tag`] - A label attached to short URLs
//! - [`TagStats`] - Per-tag short URL and visit counts, computed on read
//! - [`AccessScope`] - Which short URLs a caller is allowed to see

pub mod access_scope;
pub mod tag;

pub use access_scope::AccessScope;
pub use tag::{Tag, TagStats};
