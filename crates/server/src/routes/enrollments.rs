use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use models::enrollment;
use models::errors::ModelError;
use models::validation;
use serde::Deserialize;
use serde_json::Value;
use service::enrollment_service;

use crate::errors::ApiError;
use crate::input::{self, present};
use crate::state::ServerState;

#[derive(Debug, Default, Deserialize)]
pub struct EnrollmentInput {
    #[serde(default, deserialize_with = "present")]
    pub student_id: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub course_id: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub grade: Option<Value>,
}

impl EnrollmentInput {
    pub fn into_new(self) -> Result<enrollment::NewEnrollment, ModelError> {
        Ok(enrollment::NewEnrollment {
            student_id: input::required_integer("student_id", &self.student_id)?,
            course_id: input::required_integer("course_id", &self.course_id)?,
            grade: match &self.grade {
                None | Some(Value::Null) => None,
                Some(v) => Some(validation::grade(v)?),
            },
        })
    }

    /// `"grade": null` clears the grade.
    pub fn into_patch(self) -> Result<enrollment::EnrollmentPatch, ModelError> {
        Ok(enrollment::EnrollmentPatch {
            student_id: input::patch_integer("student_id", &self.student_id)?,
            course_id: input::patch_integer("course_id", &self.course_id)?,
            grade: match &self.grade {
                None => None,
                Some(Value::Null) => Some(None),
                Some(v) => Some(Some(validation::grade(v)?)),
            },
        })
    }
}

#[utoipa::path(get, path = "/api/enrollments", tag = "enrollments",
    responses((status = 200, description = "All enrollments ordered by id")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<enrollment::Model>>, ApiError> {
    Ok(Json(enrollment_service::list_enrollments(&state.db).await?))
}

#[utoipa::path(post, path = "/api/enrollments", tag = "enrollments",
    request_body = crate::openapi::EnrollmentInputDoc,
    responses(
        (status = 201, description = "Enrollment created"),
        (status = 400, description = "Invalid payload or grade"),
        (status = 409, description = "Duplicate pair or unknown reference")
    ))]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<EnrollmentInput>, JsonRejection>,
) -> Result<(StatusCode, Json<enrollment::Model>), ApiError> {
    let new = input::body(payload)?.into_new()?;
    let created = enrollment_service::create_enrollment(&state.db, new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/api/enrollments/{id}", tag = "enrollments",
    params(("id" = i32, Path, description = "Enrollment id")),
    responses((status = 200, description = "Enrollment"), (status = 404, description = "Unknown id")))]
pub async fn get(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<enrollment::Model>, ApiError> {
    let id = input::id(path, "enrollment")?;
    Ok(Json(enrollment_service::get_enrollment(&state.db, id).await?))
}

#[utoipa::path(patch, path = "/api/enrollments/{id}", tag = "enrollments",
    params(("id" = i32, Path, description = "Enrollment id")),
    request_body = crate::openapi::EnrollmentInputDoc,
    responses(
        (status = 200, description = "Updated enrollment"),
        (status = 400, description = "Invalid payload or grade"),
        (status = 404, description = "Unknown id"),
        (status = 409, description = "Duplicate pair or unknown reference")
    ))]
pub async fn update(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<EnrollmentInput>, JsonRejection>,
) -> Result<Json<enrollment::Model>, ApiError> {
    let existing = enrollment_service::get_enrollment(&state.db, input::id(path, "enrollment")?).await?;
    let patch = input::body(payload)?.into_patch()?;
    Ok(Json(enrollment_service::update_enrollment(&state.db, existing, patch).await?))
}

#[utoipa::path(delete, path = "/api/enrollments/{id}", tag = "enrollments",
    params(("id" = i32, Path, description = "Enrollment id")),
    responses((status = 204, description = "Enrollment deleted"), (status = 404, description = "Unknown id")))]
pub async fn delete(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    enrollment_service::delete_enrollment(&state.db, input::id(path, "enrollment")?).await?;
    Ok(StatusCode::NO_CONTENT)
}
