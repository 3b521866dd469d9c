//! Helpers shared by the service, the HTTP layer and the admin CLI.
//!
//! - [`tag_name`] - Tag name validation and list parsing
//! - [`token`] - API token generation and hashing

pub mod tag_name;
pub mod token;
