mod common;

use sqlx::PgPool;
use std::sync::Arc;
use tag_stats::domain::entities::AccessScope;
use tag_stats::domain::repositories::{TokenRepository, TokenRole};
use tag_stats::error::AppError;
use tag_stats::infrastructure::persistence::PgTokenRepository;

#[sqlx::test]
async fn test_create_token(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let token = repo
        .create_token("test-token", "hash123", TokenRole::Admin)
        .await
        .unwrap();

    assert_eq!(token.name, "test-token");
    assert_eq!(token.token_hash, "hash123");
    assert_eq!(token.role, TokenRole::Admin);
    assert!(token.revoked_at.is_none());
}

#[sqlx::test]
async fn test_create_token_duplicate_name(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    repo.create_token("dup", "hash-a", TokenRole::Admin)
        .await
        .unwrap();
    let result = repo.create_token("dup", "hash-b", TokenRole::Admin).await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
}

#[sqlx::test]
async fn test_roles_round_trip_through_storage(pool: PgPool) {
    let domain_id = common::create_test_domain(&pool, "scoped.test").await;
    let repo = PgTokenRepository::new(Arc::new(pool));

    let domain = repo
        .create_token("domain", "hash-domain", TokenRole::DomainSpecific(domain_id))
        .await
        .unwrap();
    let author = repo
        .create_token("author", "hash-author", TokenRole::AuthoredShortUrls)
        .await
        .unwrap();

    let found = repo.find_active_by_hash("hash-domain").await.unwrap().unwrap();
    assert_eq!(found.role, TokenRole::DomainSpecific(domain_id));
    assert_eq!(found.access_scope(), AccessScope::Domain(domain_id));
    assert_eq!(found.id, domain.id);

    let found = repo.find_active_by_hash("hash-author").await.unwrap().unwrap();
    assert_eq!(found.access_scope(), AccessScope::Author(author.id));
}

#[sqlx::test]
async fn test_find_active_by_hash_unknown(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    assert!(repo.find_active_by_hash("nonexistent").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_revoked_token_is_not_active(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let token = repo
        .create_token("revoked-token", "revokedhash", TokenRole::Admin)
        .await
        .unwrap();
    repo.revoke_token(token.id).await.unwrap();

    assert!(repo.find_active_by_hash("revokedhash").await.unwrap().is_none());

    let stored = repo.find_by_id(token.id).await.unwrap().unwrap();
    assert!(stored.revoked_at.is_some());
}

#[sqlx::test]
async fn test_revoke_twice_is_not_found(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let token = repo
        .create_token("once", "oncehash", TokenRole::Admin)
        .await
        .unwrap();
    repo.revoke_token(token.id).await.unwrap();

    let result = repo.revoke_token(token.id).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
}

#[sqlx::test]
async fn test_update_last_used(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool.clone()));

    let token = repo
        .create_token("usage", "usagehash", TokenRole::Admin)
        .await
        .unwrap();

    repo.update_last_used(token.id).await.unwrap();

    let last_used: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT last_used_at FROM api_tokens WHERE id = $1")
            .bind(token.id)
            .fetch_one(&pool)
            .await
            .unwrap();

    assert!(last_used.is_some());
}

#[sqlx::test]
async fn test_list_and_find_by_name(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    repo.create_token("first", "h1", TokenRole::Admin).await.unwrap();
    repo.create_token("second", "h2", TokenRole::AuthoredShortUrls)
        .await
        .unwrap();

    let tokens = repo.list_tokens().await.unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].name, "first");

    let found = repo.find_by_name("second").await.unwrap().unwrap();
    assert_eq!(found.role, TokenRole::AuthoredShortUrls);
    assert!(repo.find_by_name("third").await.unwrap().is_none());
}
