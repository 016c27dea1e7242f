use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{ProfilePayload, ProfileSummary, SearchQuery};
use crate::{auth::jwt::CurrentProfile, error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profiles", get(list_profiles).post(create_profile))
        .route(
            "/profiles/:id",
            get(retrieve_profile)
                .put(update_profile)
                .patch(partial_update_profile)
                .delete(delete_profile),
        )
}

/// A non-integer id can't name a record, so it's a 404 like any unknown id.
fn profile_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    path.map(|Path(id)| id).map_err(|_| AppError::NotFound)
}

fn body(payload: Result<Json<ProfilePayload>, JsonRejection>) -> Result<ProfilePayload, AppError> {
    payload.map(|Json(p)| p).map_err(AppError::from)
}

#[instrument(skip(state))]
pub async fn list_profiles(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ProfileSummary>>, AppError> {
    Ok(Json(state.profiles.list(&query).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_profile(
    State(state): State<AppState>,
    payload: Result<Json<ProfilePayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let created = state.profiles.create(body(payload)?).await?;
    let location = format!("/profiles/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

#[instrument(skip(state))]
pub async fn retrieve_profile(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ProfileSummary>, AppError> {
    Ok(Json(state.profiles.retrieve(profile_id(path)?).await?))
}

#[instrument(skip(state, actor, payload), fields(actor_id = actor.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentProfile(actor): CurrentProfile,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProfilePayload>, JsonRejection>,
) -> Result<Json<ProfileSummary>, AppError> {
    let id = profile_id(path)?;
    let updated = state.profiles.update(&actor, id, body(payload)).await?;
    Ok(Json(updated))
}

#[instrument(skip(state, actor, payload), fields(actor_id = actor.id))]
pub async fn partial_update_profile(
    State(state): State<AppState>,
    CurrentProfile(actor): CurrentProfile,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProfilePayload>, JsonRejection>,
) -> Result<Json<ProfileSummary>, AppError> {
    let id = profile_id(path)?;
    let updated = state
        .profiles
        .partial_update(&actor, id, body(payload))
        .await?;
    Ok(Json(updated))
}

#[instrument(skip(state, actor), fields(actor_id = actor.id))]
pub async fn delete_profile(
    State(state): State<AppState>,
    CurrentProfile(actor): CurrentProfile,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    state.profiles.delete(&actor, profile_id(path)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
