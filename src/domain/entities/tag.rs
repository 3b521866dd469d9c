//! Tag entity and its derived statistics.

/// A user-assigned label attachable to short URLs.
///
/// Tag names are unique across the system and double as the stable sort key
/// for every listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

impl Tag {
    /// Creates a new Tag instance.
    pub fn new(id: i64, name: String) -> Self {
        Self { id, name }
    }
}

/// Per-tag aggregate computed at query time.
///
/// Both counters are distinct cardinalities: a short URL with several visits
/// is counted once in `short_urls_count`, and a visit reached through several
/// tag links is counted once in `visits_count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagStats {
    pub name: String,
    pub short_urls_count: i64,
    pub visits_count: i64,
}

impl TagStats {
    pub fn new(name: impl Into<String>, short_urls_count: i64, visits_count: i64) -> Self {
        Self {
            name: name.into(),
            short_urls_count,
            visits_count,
        }
    }
}
