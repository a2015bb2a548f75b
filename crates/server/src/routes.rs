pub mod courses;
pub mod enrollments;
pub mod instructors;
pub mod students;

use axum::{
    http::{Method, Uri},
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::errors::ApiError;
use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub async fn index() -> &'static str {
    "school tracker api"
}

#[utoipa::path(get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Fallback for every verb a resource path does not support.
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed(format!("{method} is not allowed on {}", uri.path()))
}

fn api_routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/students",
            get(students::list).post(students::create).fallback(method_not_allowed),
        )
        .route(
            "/students/:id",
            get(students::get)
                .patch(students::update)
                .delete(students::delete)
                .fallback(method_not_allowed),
        )
        .route(
            "/instructors",
            get(instructors::list).post(instructors::create).fallback(method_not_allowed),
        )
        .route(
            "/instructors/:id",
            get(instructors::get)
                .patch(instructors::update)
                .delete(instructors::delete)
                .fallback(method_not_allowed),
        )
        .route(
            "/courses",
            get(courses::list).post(courses::create).fallback(method_not_allowed),
        )
        .route(
            "/courses/:id",
            get(courses::get)
                .patch(courses::update)
                .delete(courses::delete)
                .fallback(method_not_allowed),
        )
        .route(
            "/enrollments",
            get(enrollments::list).post(enrollments::create).fallback(method_not_allowed),
        )
        .route(
            "/enrollments/:id",
            get(enrollments::get)
                .patch(enrollments::update)
                .delete(enrollments::delete)
                .fallback(method_not_allowed),
        )
}

/// Build the application router. Resource routes live under `api_prefix`
/// (already normalized; empty mounts them at the root).
pub fn build_router(state: ServerState, cors: CorsLayer, api_prefix: &str) -> Router {
    let public = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json));

    let app = if api_prefix.is_empty() {
        public.merge(api_routes())
    } else {
        public.nest(api_prefix, api_routes())
    };

    app.with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx responses
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
