//! Session revocation list backed by the entity store

use store::RevokedTokenRepository;
use tracing::info;

use crate::error::AuthResult;

/// Append-only set of tokens that must never authenticate again
#[derive(Debug, Clone)]
pub struct RevocationList {
    tokens: RevokedTokenRepository,
}

impl RevocationList {
    pub fn new(tokens: RevokedTokenRepository) -> Self {
        Self { tokens }
    }

    /// Add a token to the list
    pub async fn revoke(&self, token: &str) -> AuthResult<()> {
        let record = self.tokens.insert(token).await?;
        info!(revocation_id = record.id, "Session token revoked");
        Ok(())
    }

    pub async fn is_revoked(&self, token: &str) -> AuthResult<bool> {
        Ok(self.tokens.exists(token).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::Store;

    #[tokio::test]
    async fn revoked_tokens_are_members() {
        let store = Store::in_memory().await.unwrap();
        let list = RevocationList::new(store.revoked_tokens.clone());

        list.revoke("aaa.bbb.ccc").await.unwrap();
        assert!(list.is_revoked("aaa.bbb.ccc").await.unwrap());
        assert!(!list.is_revoked("never.issued.token").await.unwrap());

        list.revoke("aaa.bbb.ccc").await.unwrap();
        assert_eq!(store.revoked_tokens.count().await.unwrap(), 2);
    }
}
