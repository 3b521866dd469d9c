//! PostgreSQL implementation of token repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::repositories::{ApiToken, TokenRepository, TokenRole};
use crate::error::AppError;

const TOKEN_COLUMNS: &str = "id, name, token_hash, scope_kind, scope_domain_id, created_at, revoked_at";

#[derive(Debug, FromRow)]
struct TokenRow {
    id: i64,
    name: String,
    token_hash: String,
    scope_kind: String,
    scope_domain_id: Option<i64>,
    created_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
}

impl TryFrom<TokenRow> for ApiToken {
    type Error = AppError;

    fn try_from(row: TokenRow) -> Result<Self, Self::Error> {
        let role = role_from_columns(&row.scope_kind, row.scope_domain_id)?;

        Ok(ApiToken {
            id: row.id,
            name: row.name,
            token_hash: row.token_hash,
            role,
            created_at: row.created_at,
            revoked_at: row.revoked_at,
        })
    }
}

/// Splits a role into the `scope_kind` / `scope_domain_id` column pair.
fn role_to_columns(role: TokenRole) -> (&'static str, Option<i64>) {
    match role {
        TokenRole::Admin => ("all", None),
        TokenRole::DomainSpecific(domain_id) => ("domain", Some(domain_id)),
        TokenRole::AuthoredShortUrls => ("author", None),
    }
}

fn role_from_columns(kind: &str, domain_id: Option<i64>) -> Result<TokenRole, AppError> {
    match (kind, domain_id) {
        ("all", _) => Ok(TokenRole::Admin),
        ("domain", Some(id)) => Ok(TokenRole::DomainSpecific(id)),
        ("author", _) => Ok(TokenRole::AuthoredShortUrls),
        _ => Err(AppError::internal(
            "Corrupted token scope",
            json!({ "scope_kind": kind, "scope_domain_id": domain_id }),
        )),
    }
}

/// PostgreSQL repository for API token storage and validation.
///
/// Stores hashed tokens only. Raw tokens are never persisted.
pub struct PgTokenRepository {
    pool: Arc<PgPool>,
}

impl PgTokenRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn find_active_by_hash(&self, token_hash: &str) -> Result<Option<ApiToken>, AppError> {
        let row: Option<TokenRow> = sqlx::query_as(&format!(
            "SELECT {TOKEN_COLUMNS} FROM api_tokens WHERE token_hash = $1 AND revoked_at IS NULL"
        ))
        .bind(token_hash)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(ApiToken::try_from).transpose()
    }

    async fn update_last_used(&self, token_id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE api_tokens SET last_used_at = NOW() WHERE id = $1")
            .bind(token_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn create_token(
        &self,
        name: &str,
        token_hash: &str,
        role: TokenRole,
    ) -> Result<ApiToken, AppError> {
        let (scope_kind, scope_domain_id) = role_to_columns(role);

        let row: TokenRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO api_tokens (name, token_hash, scope_kind, scope_domain_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {TOKEN_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(token_hash)
        .bind(scope_kind)
        .bind(scope_domain_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        ApiToken::try_from(row)
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        let rows: Vec<TokenRow> = sqlx::query_as(&format!(
            "SELECT {TOKEN_COLUMNS} FROM api_tokens ORDER BY id"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(ApiToken::try_from).collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        let row: Option<TokenRow> =
            sqlx::query_as(&format!("SELECT {TOKEN_COLUMNS} FROM api_tokens WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        row.map(ApiToken::try_from).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        let row: Option<TokenRow> =
            sqlx::query_as(&format!("SELECT {TOKEN_COLUMNS} FROM api_tokens WHERE name = $1"))
                .bind(name)
                .fetch_optional(self.pool.as_ref())
                .await?;

        row.map(ApiToken::try_from).transpose()
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE api_tokens SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Token not found",
                json!({ "id": id }),
            ));
        }

        Ok(())
    }
}
