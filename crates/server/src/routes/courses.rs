use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use models::course;
use models::errors::ModelError;
use serde::Deserialize;
use serde_json::Value;
use service::course_service::{self, CourseDetail, CourseFilter, CourseWithInstructor};

use crate::errors::ApiError;
use crate::input::{self, present};
use crate::state::ServerState;

#[derive(Debug, Default, Deserialize)]
pub struct CourseInput {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub duration: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub level: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub instructor_id: Option<Value>,
}

impl CourseInput {
    pub fn into_new(self) -> Result<course::NewCourse, ModelError> {
        Ok(course::NewCourse {
            title: input::text_or_empty("title", &self.title)?,
            duration: input::required_integer("duration", &self.duration)?,
            level: input::text_or_empty("level", &self.level)?,
            instructor_id: input::required_integer("instructor_id", &self.instructor_id)?,
        })
    }

    pub fn into_patch(self) -> Result<course::CoursePatch, ModelError> {
        Ok(course::CoursePatch {
            title: input::patch_text("title", &self.title)?,
            duration: input::patch_integer("duration", &self.duration)?,
            level: input::patch_text("level", &self.level)?,
            instructor_id: input::patch_integer("instructor_id", &self.instructor_id)?,
        })
    }
}

/// Query string filters; values that do not parse are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct CourseQuery {
    pub level: Option<String>,
    pub instructor_id: Option<String>,
}

impl From<CourseQuery> for CourseFilter {
    fn from(q: CourseQuery) -> Self {
        CourseFilter {
            level: q.level,
            instructor_id: q.instructor_id.and_then(|v| v.trim().parse().ok()),
        }
    }
}

#[utoipa::path(get, path = "/api/courses", tag = "courses",
    params(
        ("level" = Option<String>, Query, description = "Exact level match"),
        ("instructor_id" = Option<i32>, Query, description = "Owning instructor")
    ),
    responses(
        (status = 200, description = "Courses with their instructor"),
        (status = 400, description = "Malformed query string")
    ))]
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<CourseQuery>, QueryRejection>,
) -> Result<Json<Vec<CourseWithInstructor>>, ApiError> {
    let filter = input::query(query)?.into();
    Ok(Json(course_service::list_courses(&state.db, filter).await?))
}

#[utoipa::path(post, path = "/api/courses", tag = "courses",
    request_body = crate::openapi::CourseInputDoc,
    responses(
        (status = 201, description = "Course created"),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Unknown instructor")
    ))]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CourseInput>, JsonRejection>,
) -> Result<(StatusCode, Json<CourseWithInstructor>), ApiError> {
    let new = input::body(payload)?.into_new()?;
    let created = course_service::create_course(&state.db, new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Course with its instructor and enrolled students.
#[utoipa::path(get, path = "/api/courses/{id}", tag = "courses",
    params(("id" = i32, Path, description = "Course id")),
    responses((status = 200, description = "Course detail"), (status = 404, description = "Unknown id")))]
pub async fn get(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<CourseDetail>, ApiError> {
    let id = input::id(path, "course")?;
    Ok(Json(course_service::get_course_detail(&state.db, id).await?))
}

#[utoipa::path(patch, path = "/api/courses/{id}", tag = "courses",
    params(("id" = i32, Path, description = "Course id")),
    request_body = crate::openapi::CourseInputDoc,
    responses(
        (status = 200, description = "Updated course"),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Unknown id")
    ))]
pub async fn update(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<CourseInput>, JsonRejection>,
) -> Result<Json<CourseWithInstructor>, ApiError> {
    let existing = course_service::get_course(&state.db, input::id(path, "course")?).await?;
    let patch = input::body(payload)?.into_patch()?;
    Ok(Json(course_service::update_course(&state.db, existing, patch).await?))
}

#[utoipa::path(delete, path = "/api/courses/{id}", tag = "courses",
    params(("id" = i32, Path, description = "Course id")),
    responses((status = 204, description = "Course and its enrollments deleted"), (status = 404, description = "Unknown id")))]
pub async fn delete(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    course_service::delete_course(&state.db, input::id(path, "course")?).await?;
    Ok(StatusCode::NO_CONTENT)
}
