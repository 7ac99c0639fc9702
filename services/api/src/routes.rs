//! API service routes

use auth::{
    AuthError, AuthenticatedUser, auth_middleware, hash_password, validation, verify_password,
};
use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};

use crate::{
    error::{ApiError, ApiResult},
    middleware::normalize_error_response,
    models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, present},
    state::AppState,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/users/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(
            state.sessions.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/users/register", post(register))
        .route("/api/users/login", post(login))
        .route("/api/users/notifications", post(notifications))
        .merge(protected_routes)
        .fallback(not_found)
        .layer(middleware::map_response(normalize_error_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = state.store.database().health_check().await.unwrap_or(false);
    Json(json!({
        "status": if database { "ok" } else { "degraded" },
        "service": "leadconnect-api",
        "database": database,
    }))
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_username(&payload.username)?;
    validation::validate_email(&payload.email)?;
    validation::validate_password(&payload.password)?;
    if let Some(confirmation) = &payload.confirm_password {
        validation::validate_confirmation(&payload.password, confirmation)?;
    }
    if let Some(phone) = present(payload.phone_number.clone()) {
        validation::validate_phone(&phone)?;
    }

    if state.store.users.find_by_email(&payload.email).await?.is_some() {
        return Err(ApiError::BadRequest("Email already taken".to_string()));
    }
    if state
        .store
        .users
        .find_by_username(&payload.username)
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest("Username already taken".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;
    let new_user = payload.into_new_user(password_hash)?;
    let user = state.store.users.create(&new_user).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            user_id: user.user_id,
            msg: "The user was successfully registered".to_string(),
        }),
    ))
}

/// Exchange email and password for a session token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .store
        .users
        .find_by_email(&payload.email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = user.user_id, "Rejected login");
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.sessions.issue(user.user_id)?;
    info!(user_id = user.user_id, "User logged in");

    Ok(Json(LoginResponse {
        success: true,
        token,
        user,
    }))
}

/// Revoke the token the request was authenticated with
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<impl IntoResponse> {
    state.sessions.invalidate(&user.token).await?;
    info!(user_id = user.user_id, "User logged out");

    Ok(Json(json!({ "success": true, "msg": "Token revoked" })))
}

/// Daily notification hook: reports the connections due for a follow-up
pub async fn notifications(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let today = Utc::now().date_naive();
    let due = state.store.connections.list_due(today).await?;

    for connection in &due {
        debug!(
            user_id = connection.user_id,
            contact_url = %connection.contact_url,
            next_due = %connection.next_due(),
            "Connection due"
        );
    }
    info!(due = due.len(), %today, "Notification run");

    Ok(Json(json!({ "success": true, "due": due.len() })))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Resource not found".to_string())
}
