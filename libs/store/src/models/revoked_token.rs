use chrono::{DateTime, Utc};
use serde::Serialize;

/// A session token that must no longer authenticate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevokedToken {
    pub id: i64,
    pub jwt_token: String,
    pub created_at: DateTime<Utc>,
}
