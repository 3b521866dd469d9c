//! Shared application state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{AuthService, TagService};
use crate::infrastructure::persistence::{PgTagRepository, PgTokenRepository};

/// Services and resources shared across requests.
///
/// Cloning is cheap: every field is reference-counted or `Copy`.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<PgPool>,
    pub tag_service: Arc<TagService<PgTagRepository>>,
    pub auth_service: Arc<AuthService<PgTokenRepository>>,
    pub max_items_per_page: u32,
}

impl AppState {
    /// Wires PostgreSQL repositories into the services.
    pub fn new(pool: Arc<PgPool>, token_signing_secret: String, max_items_per_page: u32) -> Self {
        let tag_repository = Arc::new(PgTagRepository::new(pool.clone()));
        let token_repository = Arc::new(PgTokenRepository::new(pool.clone()));

        Self {
            db: pool,
            tag_service: Arc::new(TagService::new(tag_repository)),
            auth_service: Arc::new(AuthService::new(token_repository, token_signing_secret)),
            max_items_per_page,
        }
    }
}
