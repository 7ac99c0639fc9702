//! Append-only store of revoked session tokens

use chrono::Utc;
use common::{Database, error::DatabaseResult};

use crate::{codec, models::RevokedToken};

/// Revoked token repository
#[derive(Debug, Clone)]
pub struct RevokedTokenRepository {
    db: Database,
}

impl RevokedTokenRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Record a token as revoked
    ///
    /// Revoking the same token twice stores two rows; membership is unaffected.
    pub async fn insert(&self, jwt_token: &str) -> DatabaseResult<RevokedToken> {
        let row = sqlx::query(
            r#"
            INSERT INTO revoked_tokens (jwt_token, created_at)
            VALUES ($1, $2)
            RETURNING id, jwt_token, created_at
            "#,
        )
        .bind(jwt_token)
        .bind(codec::encode_timestamp(Utc::now()))
        .fetch_one(self.db.pool())
        .await?;

        Ok(RevokedToken {
            id: codec::integer(&row, "id")?,
            jwt_token: codec::text(&row, "jwt_token")?,
            created_at: codec::timestamp(&row, "created_at")?,
        })
    }

    pub async fn exists(&self, jwt_token: &str) -> DatabaseResult<bool> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM revoked_tokens WHERE jwt_token = $1")
            .bind(jwt_token)
            .fetch_one(self.db.pool())
            .await?;
        Ok(codec::integer(&row, "total")? > 0)
    }

    pub async fn count(&self) -> DatabaseResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM revoked_tokens")
            .fetch_one(self.db.pool())
            .await?;
        codec::integer(&row, "total")
    }
}
