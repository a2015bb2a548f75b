use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct StudentInputDoc { pub name: String, pub email: String, pub year: Option<i32> }

#[derive(ToSchema)]
pub struct InstructorInputDoc { pub name: String, pub specialty: Option<String> }

#[derive(ToSchema)]
pub struct CourseInputDoc {
    pub title: String,
    /// Hours, positive.
    pub duration: i32,
    /// Defaults to `beginner`.
    pub level: Option<String>,
    pub instructor_id: i32,
}

#[derive(ToSchema)]
pub struct EnrollmentInputDoc {
    pub student_id: i32,
    pub course_id: i32,
    /// 0 to 100 inclusive.
    pub grade: Option<f64>,
}

#[derive(ToSchema)]
pub struct ErrorBodyDoc { pub error: String, pub message: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::students::list,
        crate::routes::students::create,
        crate::routes::students::get,
        crate::routes::students::update,
        crate::routes::students::delete,
        crate::routes::instructors::list,
        crate::routes::instructors::create,
        crate::routes::instructors::get,
        crate::routes::instructors::update,
        crate::routes::instructors::delete,
        crate::routes::courses::list,
        crate::routes::courses::create,
        crate::routes::courses::get,
        crate::routes::courses::update,
        crate::routes::courses::delete,
        crate::routes::enrollments::list,
        crate::routes::enrollments::create,
        crate::routes::enrollments::get,
        crate::routes::enrollments::update,
        crate::routes::enrollments::delete,
    ),
    components(
        schemas(
            HealthResponse,
            StudentInputDoc,
            InstructorInputDoc,
            CourseInputDoc,
            EnrollmentInputDoc,
            ErrorBodyDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "students"),
        (name = "instructors"),
        (name = "courses"),
        (name = "enrollments")
    )
)]
pub struct ApiDoc;
