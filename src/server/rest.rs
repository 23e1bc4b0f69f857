use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;

use super::{AppState, error::ApiError};
use crate::Profile;

/// Body of `POST /profiles`. Any client-supplied `id` is ignored.
#[derive(Debug, Deserialize)]
pub struct NewProfile {
    pub email: String,
}

/// `POST /profiles`: 201 with a `Location` header and an empty body.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewProfile>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.profiles.create(&body.email).await?;
    tracing::info!(profile = %profile.id, "profile created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/profiles/{}", profile.id))],
    ))
}

/// `GET /profiles`
pub async fn all(State(state): State<AppState>) -> Json<Vec<Profile>> {
    Json(state.profiles.all().await)
}

/// `GET /profiles/{id}`
pub async fn by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    state
        .profiles
        .by_id(&id)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}
