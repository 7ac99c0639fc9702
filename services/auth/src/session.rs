//! Session management: issued tokens checked against the revocation list

use tracing::info;

use crate::{
    error::{AuthError, AuthResult},
    jwt::{Claims, JwtService},
    revocation::RevocationList,
};

/// Session manager for issuing, authenticating and invalidating tokens
#[derive(Clone)]
pub struct SessionManager {
    jwt_service: JwtService,
    revocations: RevocationList,
}

impl SessionManager {
    pub fn new(jwt_service: JwtService, revocations: RevocationList) -> Self {
        Self {
            jwt_service,
            revocations,
        }
    }

    /// Start a session for a user
    pub fn issue(&self, user_id: i64) -> AuthResult<String> {
        info!(user_id, "Creating session");
        self.jwt_service.issue(user_id)
    }

    /// Validate a token, then reject it if it was revoked
    pub async fn authenticate(&self, token: &str) -> AuthResult<Claims> {
        let claims = self.jwt_service.validate(token)?;

        if self.revocations.is_revoked(token).await? {
            info!(user_id = claims.sub, "Rejected revoked session token");
            return Err(AuthError::TokenRevoked);
        }

        Ok(claims)
    }

    /// End a session; the token is rejected from now on
    pub async fn invalidate(&self, token: &str) -> AuthResult<()> {
        self.revocations.revoke(token).await
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtConfig;
    use store::Store;

    async fn sessions() -> SessionManager {
        let store = Store::in_memory().await.unwrap();
        let jwt = JwtService::new(&JwtConfig {
            secret: "session-secret".to_string(),
            access_token_expiry: 600,
        });
        SessionManager::new(jwt, RevocationList::new(store.revoked_tokens))
    }

    #[tokio::test]
    async fn issued_token_authenticates() {
        let sessions = sessions().await;
        let token = sessions.issue(5).unwrap();
        assert_eq!(sessions.authenticate(&token).await.unwrap().sub, 5);
    }

    #[tokio::test]
    async fn revoked_token_is_rejected_despite_valid_signature() {
        let sessions = sessions().await;
        let token = sessions.issue(5).unwrap();
        let other = sessions.issue(5).unwrap();

        sessions.invalidate(&token).await.unwrap();

        assert!(sessions.jwt_service().validate(&token).is_ok());
        assert!(matches!(
            sessions.authenticate(&token).await.unwrap_err(),
            AuthError::TokenRevoked
        ));
        assert!(sessions.authenticate(&other).await.is_ok());
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let sessions = sessions().await;
        assert!(matches!(
            sessions.authenticate("not-a-jwt").await.unwrap_err(),
            AuthError::InvalidToken(_)
        ));
    }
}
