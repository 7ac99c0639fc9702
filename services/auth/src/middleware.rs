//! Middleware for bearer token validation and authentication

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::warn;

use crate::{error::AuthError, session::SessionManager};

/// Identity attached to an authenticated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    /// Raw bearer token, kept so the session can be revoked
    pub token: String,
}

/// Reject the request unless it carries a valid, unrevoked bearer token
pub async fn auth_middleware(
    State(sessions): State<SessionManager>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AuthError::MissingToken)?;
    let token = bearer.token();

    let claims = sessions.authenticate(token).await.map_err(|e| {
        warn!(error = %e, "Rejected bearer token");
        e
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: claims.sub,
        token: token.to_string(),
    });

    Ok(next.run(req).await)
}
