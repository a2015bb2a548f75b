use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use models::errors::ModelError;
use models::instructor;
use serde::Deserialize;
use serde_json::Value;
use service::instructor_service;

use crate::errors::ApiError;
use crate::input::{self, present};
use crate::state::ServerState;

#[derive(Debug, Default, Deserialize)]
pub struct InstructorInput {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub specialty: Option<Value>,
}

impl InstructorInput {
    pub fn into_new(self) -> Result<instructor::NewInstructor, ModelError> {
        Ok(instructor::NewInstructor {
            name: input::text_or_empty("name", &self.name)?,
            specialty: input::patch_nullable_text("specialty", &self.specialty)?.flatten(),
        })
    }

    pub fn into_patch(self) -> Result<instructor::InstructorPatch, ModelError> {
        Ok(instructor::InstructorPatch {
            name: input::patch_text("name", &self.name)?,
            specialty: input::patch_nullable_text("specialty", &self.specialty)?,
        })
    }
}

#[utoipa::path(get, path = "/api/instructors", tag = "instructors",
    responses((status = 200, description = "All instructors ordered by id")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<instructor::Model>>, ApiError> {
    Ok(Json(instructor_service::list_instructors(&state.db).await?))
}

#[utoipa::path(post, path = "/api/instructors", tag = "instructors",
    request_body = crate::openapi::InstructorInputDoc,
    responses((status = 201, description = "Instructor created"), (status = 400, description = "Invalid payload")))]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<InstructorInput>, JsonRejection>,
) -> Result<(StatusCode, Json<instructor::Model>), ApiError> {
    let new = input::body(payload)?.into_new()?;
    let created = instructor_service::create_instructor(&state.db, new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/api/instructors/{id}", tag = "instructors",
    params(("id" = i32, Path, description = "Instructor id")),
    responses((status = 200, description = "Instructor"), (status = 404, description = "Unknown id")))]
pub async fn get(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<instructor::Model>, ApiError> {
    let id = input::id(path, "instructor")?;
    Ok(Json(instructor_service::get_instructor(&state.db, id).await?))
}

#[utoipa::path(patch, path = "/api/instructors/{id}", tag = "instructors",
    params(("id" = i32, Path, description = "Instructor id")),
    request_body = crate::openapi::InstructorInputDoc,
    responses(
        (status = 200, description = "Updated instructor"),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Unknown id")
    ))]
pub async fn update(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<InstructorInput>, JsonRejection>,
) -> Result<Json<instructor::Model>, ApiError> {
    let existing = instructor_service::get_instructor(&state.db, input::id(path, "instructor")?).await?;
    let patch = input::body(payload)?.into_patch()?;
    Ok(Json(instructor_service::update_instructor(&state.db, existing, patch).await?))
}

/// Removes the instructor with its courses and their enrollments.
#[utoipa::path(delete, path = "/api/instructors/{id}", tag = "instructors",
    params(("id" = i32, Path, description = "Instructor id")),
    responses((status = 204, description = "Instructor deleted with its courses"), (status = 404, description = "Unknown id")))]
pub async fn delete(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    instructor_service::delete_instructor(&state.db, input::id(path, "instructor")?).await?;
    Ok(StatusCode::NO_CONTENT)
}
