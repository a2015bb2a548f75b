use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use models::errors::ModelError;
use models::student;
use serde::Deserialize;
use serde_json::Value;
use service::student_service;

use crate::errors::ApiError;
use crate::input::{self, present};
use crate::state::ServerState;

/// Loosely typed body for create and partial update; unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct StudentInput {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub year: Option<Value>,
}

impl StudentInput {
    pub fn into_new(self) -> Result<student::NewStudent, ModelError> {
        Ok(student::NewStudent {
            name: input::text_or_empty("name", &self.name)?,
            email: input::text_or_empty("email", &self.email)?,
            year: input::patch_integer("year", &self.year)?.unwrap_or(student::DEFAULT_YEAR),
        })
    }

    pub fn into_patch(self) -> Result<student::StudentPatch, ModelError> {
        Ok(student::StudentPatch {
            name: input::patch_text("name", &self.name)?,
            email: input::patch_text("email", &self.email)?,
            year: input::patch_integer("year", &self.year)?,
        })
    }
}

#[utoipa::path(get, path = "/api/students", tag = "students",
    responses((status = 200, description = "All students ordered by id")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<student::Model>>, ApiError> {
    Ok(Json(student_service::list_students(&state.db).await?))
}

#[utoipa::path(post, path = "/api/students", tag = "students",
    request_body = crate::openapi::StudentInputDoc,
    responses(
        (status = 201, description = "Student created"),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Email already registered")
    ))]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<StudentInput>, JsonRejection>,
) -> Result<(StatusCode, Json<student::Model>), ApiError> {
    let new = input::body(payload)?.into_new()?;
    let created = student_service::create_student(&state.db, new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/api/students/{id}", tag = "students",
    params(("id" = i32, Path, description = "Student id")),
    responses((status = 200, description = "Student"), (status = 404, description = "Unknown id")))]
pub async fn get(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<student::Model>, ApiError> {
    let id = input::id(path, "student")?;
    Ok(Json(student_service::get_student(&state.db, id).await?))
}

#[utoipa::path(patch, path = "/api/students/{id}", tag = "students",
    params(("id" = i32, Path, description = "Student id")),
    request_body = crate::openapi::StudentInputDoc,
    responses(
        (status = 200, description = "Updated student"),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Unknown id")
    ))]
pub async fn update(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<StudentInput>, JsonRejection>,
) -> Result<Json<student::Model>, ApiError> {
    let existing = student_service::get_student(&state.db, input::id(path, "student")?).await?;
    let patch = input::body(payload)?.into_patch()?;
    Ok(Json(student_service::update_student(&state.db, existing, patch).await?))
}

#[utoipa::path(delete, path = "/api/students/{id}", tag = "students",
    params(("id" = i32, Path, description = "Student id")),
    responses((status = 204, description = "Student and its enrollments deleted"), (status = 404, description = "Unknown id")))]
pub async fn delete(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    student_service::delete_student(&state.db, input::id(path, "student")?).await?;
    Ok(StatusCode::NO_CONTENT)
}
