use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, RefreshRequest},
        jwt::{CurrentProfile, JwtKeys},
    },
    error::AppError,
    profiles::{dto::ProfileSummary, model::UserProfile},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn issue_pair(keys: &JwtKeys, profile: UserProfile) -> Result<AuthResponse, AppError> {
    Ok(AuthResponse {
        access_token: keys.sign_access(profile.id)?,
        refresh_token: keys.sign_refresh(profile.id)?,
        profile: profile.into(),
    })
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(payload) = payload?;
    let profile = state
        .profiles
        .authenticate(&payload.email, &payload.password)
        .await?;

    info!(profile_id = profile.id, email = %profile.email, "profile logged in");
    let keys = JwtKeys::from_ref(&state);
    Ok(Json(issue_pair(&keys, profile)?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(payload) = payload?;
    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify_refresh(&payload.refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        AppError::Unauthorized(e.to_string())
    })?;

    let profile = state
        .profiles
        .find_active(claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User inactive or deleted.".into()))?;

    Ok(Json(issue_pair(&keys, profile)?))
}

#[instrument(skip_all)]
pub async fn get_me(CurrentProfile(profile): CurrentProfile) -> Json<ProfileSummary> {
    Json(profile.into())
}
