//! Permission boundary limiting which short URLs a caller may see.

use std::fmt;

/// Restriction applied to every tag query on behalf of a caller.
///
/// The scope filters short URLs, and through them the visits and tags that
/// are reachable. It is resolved from the authenticated API token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccessScope {
    /// Every short URL is visible.
    #[default]
    Unrestricted,
    /// Only short URLs served from the given domain id are visible.
    Domain(i64),
    /// Only short URLs authored by the given API token id are visible.
    Author(i64),
}

impl AccessScope {
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, AccessScope::Unrestricted)
    }
}

impl fmt::Display for AccessScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessScope::Unrestricted => f.write_str("unrestricted"),
            AccessScope::Domain(id) => write!(f, "domain:{id}"),
            AccessScope::Author(id) => write!(f, "author:{id}"),
        }
    }
}
