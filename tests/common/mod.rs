#![allow(dead_code)]

use sqlx::PgPool;
use std::sync::Arc;
use tag_stats::state::AppState;
use tag_stats::utils::token::hash_token;

pub const TEST_SECRET: &str = "test-signing-secret";
pub const MAX_ITEMS_PER_PAGE: u32 = 100;

pub async fn create_test_domain(pool: &PgPool, authority: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO domains (authority) VALUES ($1) RETURNING id")
        .bind(authority)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Inserts a token row directly. `scope_kind` is `all`, `domain` or `author`.
pub async fn create_test_token(
    pool: &PgPool,
    name: &str,
    raw_token: &str,
    scope_kind: &str,
    scope_domain_id: Option<i64>,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO api_tokens (name, token_hash, scope_kind, scope_domain_id) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(name)
    .bind(hash_token(TEST_SECRET, raw_token))
    .bind(scope_kind)
    .bind(scope_domain_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_short_url(
    pool: &PgPool,
    code: &str,
    domain_id: Option<i64>,
    author_api_key_id: Option<i64>,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO short_urls (short_code, original_url, domain_id, author_api_key_id) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(code)
    .bind(format!("https://example.com/{code}"))
    .bind(domain_id)
    .bind(author_api_key_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_tag(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO tags (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn tag_short_url(pool: &PgPool, short_url_id: i64, tag_id: i64) {
    sqlx::query("INSERT INTO short_urls_in_tags (short_url_id, tag_id) VALUES ($1, $2)")
        .bind(short_url_id)
        .bind(tag_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn create_test_visits(pool: &PgPool, short_url_id: i64, count: usize) {
    for _ in 0..count {
        sqlx::query("INSERT INTO visits (short_url_id) VALUES ($1)")
            .bind(short_url_id)
            .execute(pool)
            .await
            .unwrap();
    }
}

/// Fixture used across tag tests.
///
/// - `foo` on two short URLs (`s1` with 2 visits on `a.test`, `s2` with 3
///   visits authored by the `author` token)
/// - `bar` with no short URLs
/// - `baz` on `s3` (1 visit, `b.test`)
pub struct TagFixture {
    pub domain_a: i64,
    pub domain_b: i64,
    pub author_token: i64,
    pub short_urls: [i64; 3],
}

pub async fn seed_tags(pool: &PgPool) -> TagFixture {
    let domain_a = create_test_domain(pool, "a.test").await;
    let domain_b = create_test_domain(pool, "b.test").await;
    let author_token = create_test_token(pool, "author", "author-token", "author", None).await;

    let s1 = create_test_short_url(pool, "s1", Some(domain_a), None).await;
    let s2 = create_test_short_url(pool, "s2", None, Some(author_token)).await;
    let s3 = create_test_short_url(pool, "s3", Some(domain_b), None).await;

    let foo = create_test_tag(pool, "foo").await;
    create_test_tag(pool, "bar").await;
    let baz = create_test_tag(pool, "baz").await;

    tag_short_url(pool, s1, foo).await;
    tag_short_url(pool, s2, foo).await;
    tag_short_url(pool, s3, baz).await;

    create_test_visits(pool, s1, 2).await;
    create_test_visits(pool, s2, 3).await;
    create_test_visits(pool, s3, 1).await;

    TagFixture {
        domain_a,
        domain_b,
        author_token,
        short_urls: [s1, s2, s3],
    }
}

pub fn create_test_state(pool: PgPool) -> AppState {
    AppState::new(
        Arc::new(pool),
        TEST_SECRET.to_string(),
        MAX_ITEMS_PER_PAGE,
    )
}
