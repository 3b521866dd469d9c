//! SQL construction for tag queries.
//!
//! Every tag query is built here with [`QueryBuilder`] so that values are
//! always bound as parameters. The functions are pure: they return a builder
//! and never touch the database, which keeps the generated SQL testable.
//!
//! # Two-phase listing
//!
//! [`selection_query`] picks the `(id, name)` window of tags first.
//! [`aggregation_query`] then counts short URLs and visits for exactly those
//! ids. Both order by name in the same direction.

use sqlx::{Postgres, QueryBuilder};

use crate::domain::entities::AccessScope;
use crate::domain::repositories::TagsListFilter;

/// How a tag's name must match.
#[derive(Debug, Clone, Copy)]
enum NameMatch<'a> {
    Any,
    Contains(&'a str),
    Exact(&'a str),
}

/// Pushes the access scope condition for the short URL aliased as `alias`.
///
/// Emits ` AND <alias>.<column> = $n` for restricted scopes and nothing for
/// [`AccessScope::Unrestricted`]. The same function feeds the selection,
/// aggregation, count and existence queries so the scope means the same
/// thing everywhere.
pub fn push_scope_condition(qb: &mut QueryBuilder<'_, Postgres>, scope: AccessScope, alias: &str) {
    match scope {
        AccessScope::Unrestricted => {}
        AccessScope::Domain(domain_id) => {
            qb.push(format!(" AND {alias}.domain_id = "));
            qb.push_bind(domain_id);
        }
        AccessScope::Author(api_key_id) => {
            qb.push(format!(" AND {alias}.author_api_key_id = "));
            qb.push_bind(api_key_id);
        }
    }
}

/// Escapes `LIKE` wildcards so `term` matches literally, then wraps it for a
/// substring match.
pub fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Pushes the `WHERE` clause shared by selection, count and existence
/// queries. `t` must alias the `tags` table.
fn push_tag_conditions(qb: &mut QueryBuilder<'_, Postgres>, name: NameMatch<'_>, scope: AccessScope) {
    let mut keyword = " WHERE ";

    match name {
        NameMatch::Any => {}
        NameMatch::Contains(term) => {
            qb.push(keyword).push("t.name ILIKE ");
            qb.push_bind(contains_pattern(term));
            keyword = " AND ";
        }
        NameMatch::Exact(exact) => {
            qb.push(keyword).push("t.name = ");
            qb.push_bind(exact.to_string());
            keyword = " AND ";
        }
    }

    if !scope.is_unrestricted() {
        qb.push(keyword).push(
            "EXISTS (SELECT 1 FROM short_urls_in_tags st \
             INNER JOIN short_urls s ON s.id = st.short_url_id \
             WHERE st.tag_id = t.id",
        );
        push_scope_condition(qb, scope, "s");
        qb.push(")");
    }
}

fn name_match(filter: &TagsListFilter) -> NameMatch<'_> {
    match filter.search_term.as_deref() {
        Some(term) => NameMatch::Contains(term),
        None => NameMatch::Any,
    }
}

/// Phase one: the ordered, windowed `(id, name)` set of matching tags.
pub fn selection_query(filter: &TagsListFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT t.id, t.name FROM tags t");
    push_tag_conditions(&mut qb, name_match(filter), filter.scope);

    qb.push(format!(" ORDER BY t.name {}", filter.order.as_sql()));

    if let Some(limit) = filter.limit {
        qb.push(" LIMIT ");
        qb.push_bind(limit);
    }
    if let Some(offset) = filter.offset {
        qb.push(" OFFSET ");
        qb.push_bind(offset);
    }

    qb
}

/// Phase two: distinct short URL and visit counts for exactly `tag_ids`.
///
/// The scope goes into the short URL join condition rather than `WHERE`, so
/// a selected tag with no visible short URLs still comes back with zeros.
pub fn aggregation_query(
    tag_ids: Vec<i64>,
    filter: &TagsListFilter,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT t.id, t.name, \
         COUNT(DISTINCT s.id) AS short_urls_count, \
         COUNT(DISTINCT v.id) AS visits_count \
         FROM tags t \
         LEFT JOIN short_urls_in_tags st ON st.tag_id = t.id \
         LEFT JOIN short_urls s ON s.id = st.short_url_id",
    );
    push_scope_condition(&mut qb, filter.scope, "s");
    qb.push(" LEFT JOIN visits v ON v.short_url_id = s.id WHERE t.id = ANY(");
    qb.push_bind(tag_ids);
    qb.push(")");
    qb.push(format!(
        " GROUP BY t.id, t.name ORDER BY t.name {}",
        filter.order.as_sql()
    ));

    qb
}

/// Number of tags matching the filter's search term and scope.
pub fn count_query(filter: &TagsListFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM tags t");
    push_tag_conditions(&mut qb, name_match(filter), filter.scope);
    qb
}

/// Number of tags named exactly `name` that are visible under `scope`.
pub fn exists_query(name: &str, scope: AccessScope) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM tags t");
    push_tag_conditions(&mut qb, NameMatch::Exact(name), scope);
    qb
}
