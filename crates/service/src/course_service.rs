use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;
use tracing::{info, instrument};

use models::{course, enrollment, instructor, student};
use crate::cascade::CascadeReport;
use crate::errors::ServiceError;
use crate::instructor_service::ensure_instructor_exists;

/// Optional exact-match filters, combined with AND.
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    pub level: Option<String>,
    pub instructor_id: Option<i32>,
}

/// Course row with its instructor embedded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseWithInstructor {
    #[serde(flatten)]
    pub course: course::Model,
    pub instructor: Option<instructor::Model>,
}

/// One enrollment of a course seen from the student side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrolledStudent {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub grade: Option<f64>,
    pub enrolled_at: DateTime<Utc>,
    pub enrollment_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: course::Model,
    pub instructor: Option<instructor::Model>,
    pub students: Vec<EnrolledStudent>,
}

/// Courses ordered by id, each with its instructor.
pub async fn list_courses(db: &DatabaseConnection, filter: CourseFilter) -> Result<Vec<CourseWithInstructor>, ServiceError> {
    let mut query = course::Entity::find();
    if let Some(level) = filter.level.as_deref().filter(|l| !l.is_empty()) {
        query = query.filter(course::Column::Level.eq(level));
    }
    if let Some(instructor_id) = filter.instructor_id {
        query = query.filter(course::Column::InstructorId.eq(instructor_id));
    }
    let rows = query
        .order_by_asc(course::Column::Id)
        .find_also_related(instructor::Entity)
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(course, instructor)| CourseWithInstructor { course, instructor })
        .collect())
}

/// Get course by id.
pub async fn get_course(db: &DatabaseConnection, id: i32) -> Result<course::Model, ServiceError> {
    course::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("course", id))
}

pub async fn with_instructor(db: &DatabaseConnection, course: course::Model) -> Result<CourseWithInstructor, ServiceError> {
    let instructor = instructor::Entity::find_by_id(course.instructor_id).one(db).await?;
    Ok(CourseWithInstructor { course, instructor })
}

/// Course with instructor and the denormalized list of enrolled students,
/// in enrollment order.
pub async fn get_course_detail(db: &DatabaseConnection, id: i32) -> Result<CourseDetail, ServiceError> {
    let CourseWithInstructor { course, instructor } = with_instructor(db, get_course(db, id).await?).await?;
    let rows = enrollment::Entity::find()
        .filter(enrollment::Column::CourseId.eq(course.id))
        .order_by_asc(enrollment::Column::Id)
        .find_also_related(student::Entity)
        .all(db)
        .await?;
    let students = rows
        .into_iter()
        .filter_map(|(e, s)| {
            s.map(|s| EnrolledStudent {
                id: s.id,
                name: s.name,
                email: s.email,
                grade: e.grade,
                enrolled_at: e.enrolled_at,
                enrollment_id: e.id,
            })
        })
        .collect();
    Ok(CourseDetail { course, instructor, students })
}

#[instrument(skip(db, new), fields(instructor_id = new.instructor_id))]
pub async fn create_course(db: &DatabaseConnection, new: course::NewCourse) -> Result<CourseWithInstructor, ServiceError> {
    let new = new.normalize()?;
    ensure_instructor_exists(db, new.instructor_id).await?;
    let created = course::create(db, new).await?;
    info!(id = created.id, level = %created.level, "course created");
    with_instructor(db, created).await
}

/// Partial update; the response embeds the instructor but not the students.
#[instrument(skip(db, existing, patch), fields(id = existing.id))]
pub async fn update_course(
    db: &DatabaseConnection,
    existing: course::Model,
    patch: course::CoursePatch,
) -> Result<CourseWithInstructor, ServiceError> {
    let patch = patch.normalize()?;
    if let Some(instructor_id) = patch.instructor_id {
        ensure_instructor_exists(db, instructor_id).await?;
    }
    let updated = course::update(db, existing, patch).await?;
    with_instructor(db, updated).await
}

/// Delete a course and its enrollments.
#[instrument(skip(db))]
pub async fn delete_course(db: &DatabaseConnection, id: i32) -> Result<CascadeReport, ServiceError> {
    get_course(db, id).await?;

    let txn = db.begin().await?;
    let enrollments = enrollment::Entity::delete_many()
        .filter(enrollment::Column::CourseId.eq(id))
        .exec(&txn)
        .await?
        .rows_affected;
    course::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    info!(id, enrollments, "course deleted");
    Ok(CascadeReport { courses: 1, enrollments })
}

pub(crate) async fn ensure_course_exists(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    match course::Entity::find_by_id(id).one(db).await? {
        Some(_) => Ok(()),
        None => Err(ServiceError::missing_reference("course", id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    async fn instructor_named(db: &DatabaseConnection, name: &str) -> Result<instructor::Model, anyhow::Error> {
        Ok(instructor::create(db, instructor::NewInstructor { name: name.into(), specialty: None }).await?)
    }

    fn new_course(title: &str, level: &str, instructor_id: i32) -> course::NewCourse {
        course::NewCourse { title: title.into(), duration: 20, level: level.into(), instructor_id }
    }

    #[tokio::test]
    async fn create_embeds_instructor() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let grace = instructor_named(&db, "Grace").await?;

        let c = create_course(&db, new_course("Rust", " Intermediate ", grace.id)).await?;
        assert_eq!(c.course.level, "intermediate");
        assert_eq!(c.instructor, Some(grace.clone()));

        let json = serde_json::to_value(&c)?;
        assert_eq!(json["title"], "Rust");
        assert_eq!(json["instructor_id"], grace.id);
        assert_eq!(json["instructor"]["name"], "Grace");
        assert!(json.get("students").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn create_requires_existing_instructor() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let err = create_course(&db, new_course("Rust", "beginner", 7)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Constraint(ref m) if m == "instructor 7 does not exist"));
        Ok(())
    }

    #[tokio::test]
    async fn list_filters_combine() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let grace = instructor_named(&db, "Grace").await?;
        let alan = instructor_named(&db, "Alan").await?;
        create_course(&db, new_course("A", "beginner", grace.id)).await?;
        create_course(&db, new_course("B", "advanced", grace.id)).await?;
        create_course(&db, new_course("C", "advanced", alan.id)).await?;

        let titles = |rows: Vec<CourseWithInstructor>| rows.into_iter().map(|r| r.course.title).collect::<Vec<_>>();

        assert_eq!(titles(list_courses(&db, CourseFilter::default()).await?), ["A", "B", "C"]);
        assert_eq!(
            titles(list_courses(&db, CourseFilter { level: Some("advanced".into()), instructor_id: None }).await?),
            ["B", "C"]
        );
        assert_eq!(
            titles(list_courses(&db, CourseFilter { level: None, instructor_id: Some(grace.id) }).await?),
            ["A", "B"]
        );
        assert_eq!(
            titles(list_courses(&db, CourseFilter { level: Some("advanced".into()), instructor_id: Some(grace.id) }).await?),
            ["B"]
        );
        assert!(list_courses(&db, CourseFilter { level: Some("expert".into()), instructor_id: None }).await?.is_empty());
        // every listed course carries its instructor
        assert!(list_courses(&db, CourseFilter::default()).await?.iter().all(|r| r.instructor.is_some()));
        Ok(())
    }

    #[tokio::test]
    async fn detail_lists_enrolled_students() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let grace = instructor_named(&db, "Grace").await?;
        let c = create_course(&db, new_course("Rust", "beginner", grace.id)).await?.course;
        let ada = student::create(
            &db,
            student::NewStudent { name: "Ada".into(), email: "ada@example.com".into(), year: 2 },
        )
        .await?;
        let e = enrollment::create(&db, enrollment::NewEnrollment { student_id: ada.id, course_id: c.id, grade: Some(88.0) })
            .await?;

        let detail = get_course_detail(&db, c.id).await?;
        assert_eq!(detail.instructor.as_ref().map(|i| i.id), Some(grace.id));
        assert_eq!(
            detail.students,
            vec![EnrolledStudent {
                id: ada.id,
                name: "Ada".into(),
                email: "ada@example.com".into(),
                grade: Some(88.0),
                enrolled_at: e.enrolled_at,
                enrollment_id: e.id,
            }]
        );
        Ok(())
    }

    #[tokio::test]
    async fn update_validates_and_keeps_other_fields() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let grace = instructor_named(&db, "Grace").await?;
        let alan = instructor_named(&db, "Alan").await?;
        let c = create_course(&db, new_course("Rust", "beginner", grace.id)).await?.course;

        let err = update_course(&db, c.clone(), course::CoursePatch { duration: Some(-1), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = update_course(&db, c.clone(), course::CoursePatch { instructor_id: Some(99), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Constraint(_)));
        assert_eq!(get_course(&db, c.id).await?, c);

        let moved = update_course(&db, c.clone(), course::CoursePatch { instructor_id: Some(alan.id), ..Default::default() })
            .await?;
        assert_eq!(moved.course.instructor_id, alan.id);
        assert_eq!(moved.instructor, Some(alan));
        assert_eq!(moved.course.title, c.title);
        assert_eq!(moved.course.duration, c.duration);
        Ok(())
    }

    #[tokio::test]
    async fn delete_cascades_enrollments() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let grace = instructor_named(&db, "Grace").await?;
        let c = create_course(&db, new_course("Rust", "beginner", grace.id)).await?.course;
        let ada = student::create(
            &db,
            student::NewStudent { name: "Ada".into(), email: "ada@example.com".into(), year: 2 },
        )
        .await?;
        enrollment::create(&db, enrollment::NewEnrollment { student_id: ada.id, course_id: c.id, grade: None }).await?;

        assert_eq!(delete_course(&db, c.id).await?, CascadeReport { courses: 1, enrollments: 1 });
        assert!(enrollment::Entity::find().all(&db).await?.is_empty());
        assert!(matches!(get_course_detail(&db, c.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
