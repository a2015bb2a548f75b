use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{info, instrument};

use models::enrollment;
use crate::course_service::ensure_course_exists;
use crate::errors::ServiceError;
use crate::student_service::ensure_student_exists;

/// All enrollments ordered by id.
pub async fn list_enrollments(db: &DatabaseConnection) -> Result<Vec<enrollment::Model>, ServiceError> {
    Ok(enrollment::Entity::find().order_by_asc(enrollment::Column::Id).all(db).await?)
}

/// Get enrollment by id.
pub async fn get_enrollment(db: &DatabaseConnection, id: i32) -> Result<enrollment::Model, ServiceError> {
    enrollment::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("enrollment", id))
}

#[instrument(skip(db, new), fields(student_id = new.student_id, course_id = new.course_id))]
pub async fn create_enrollment(
    db: &DatabaseConnection,
    new: enrollment::NewEnrollment,
) -> Result<enrollment::Model, ServiceError> {
    let new = new.normalize()?;
    ensure_student_exists(db, new.student_id).await?;
    ensure_course_exists(db, new.course_id).await?;
    ensure_pair_available(db, new.student_id, new.course_id, None).await?;
    let created = enrollment::create(db, new).await?;
    info!(id = created.id, "enrollment created");
    Ok(created)
}

/// Partial update. When either side of the pair changes, the resulting
/// pair must reference existing rows and must not collide with another
/// enrollment.
#[instrument(skip(db, existing, patch), fields(id = existing.id))]
pub async fn update_enrollment(
    db: &DatabaseConnection,
    existing: enrollment::Model,
    patch: enrollment::EnrollmentPatch,
) -> Result<enrollment::Model, ServiceError> {
    let patch = patch.normalize()?;
    if let Some(student_id) = patch.student_id {
        ensure_student_exists(db, student_id).await?;
    }
    if let Some(course_id) = patch.course_id {
        ensure_course_exists(db, course_id).await?;
    }
    if patch.student_id.is_some() || patch.course_id.is_some() {
        let student_id = patch.student_id.unwrap_or(existing.student_id);
        let course_id = patch.course_id.unwrap_or(existing.course_id);
        ensure_pair_available(db, student_id, course_id, Some(existing.id)).await?;
    }
    Ok(enrollment::update(db, existing, patch).await?)
}

#[instrument(skip(db))]
pub async fn delete_enrollment(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    get_enrollment(db, id).await?;
    enrollment::Entity::delete_by_id(id).exec(db).await?;
    info!(id, "enrollment deleted");
    Ok(())
}

async fn ensure_pair_available(
    db: &DatabaseConnection,
    student_id: i32,
    course_id: i32,
    except: Option<i32>,
) -> Result<(), ServiceError> {
    let mut query = enrollment::Entity::find()
        .filter(enrollment::Column::StudentId.eq(student_id))
        .filter(enrollment::Column::CourseId.eq(course_id));
    if let Some(id) = except {
        query = query.filter(enrollment::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(ServiceError::Constraint(format!(
            "student {student_id} is already enrolled in course {course_id}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use models::{course, instructor, student};

    struct Seed {
        ada: student::Model,
        bob: student::Model,
        rust: course::Model,
        go: course::Model,
    }

    async fn seed(db: &DatabaseConnection) -> Result<Seed, anyhow::Error> {
        let ada = student::create(
            db,
            student::NewStudent { name: "Ada".into(), email: "ada@example.com".into(), year: 2 },
        )
        .await?;
        let bob = student::create(
            db,
            student::NewStudent { name: "Bob".into(), email: "bob@example.com".into(), year: 1 },
        )
        .await?;
        let i = instructor::create(db, instructor::NewInstructor { name: "Grace".into(), specialty: None }).await?;
        let rust = course::create(
            db,
            course::NewCourse { title: "Rust".into(), duration: 10, level: "beginner".into(), instructor_id: i.id },
        )
        .await?;
        let go = course::create(
            db,
            course::NewCourse { title: "Go".into(), duration: 8, level: "beginner".into(), instructor_id: i.id },
        )
        .await?;
        Ok(Seed { ada, bob, rust, go })
    }

    fn enroll(s: &student::Model, c: &course::Model, grade: Option<f64>) -> enrollment::NewEnrollment {
        enrollment::NewEnrollment { student_id: s.id, course_id: c.id, grade }
    }

    #[tokio::test]
    async fn grade_range_and_duplicate_pair() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let s = seed(&db).await?;

        let err = create_enrollment(&db, enroll(&s.ada, &s.rust, Some(150.0))).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == "grade must be between 0 and 100"));
        assert!(list_enrollments(&db).await?.is_empty());

        let first = create_enrollment(&db, enroll(&s.ada, &s.rust, Some(95.5))).await?;
        assert_eq!(first.grade, Some(95.5));

        let err = create_enrollment(&db, enroll(&s.ada, &s.rust, Some(10.0))).await.unwrap_err();
        assert!(matches!(err, ServiceError::Constraint(_)));
        assert_eq!(list_enrollments(&db).await?, vec![first]);
        Ok(())
    }

    #[tokio::test]
    async fn boundary_grades_accepted() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let s = seed(&db).await?;
        assert_eq!(create_enrollment(&db, enroll(&s.ada, &s.rust, Some(0.0))).await?.grade, Some(0.0));
        assert_eq!(create_enrollment(&db, enroll(&s.bob, &s.rust, Some(100.0))).await?.grade, Some(100.0));
        assert_eq!(create_enrollment(&db, enroll(&s.ada, &s.go, None)).await?.grade, None);
        Ok(())
    }

    #[tokio::test]
    async fn references_must_exist() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let s = seed(&db).await?;

        let err = create_enrollment(&db, enrollment::NewEnrollment { student_id: 99, course_id: s.rust.id, grade: None })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Constraint(ref m) if m == "student 99 does not exist"));

        let err = create_enrollment(&db, enrollment::NewEnrollment { student_id: s.ada.id, course_id: 99, grade: None })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Constraint(ref m) if m == "course 99 does not exist"));
        Ok(())
    }

    #[tokio::test]
    async fn update_moves_pair_and_clears_grade() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let s = seed(&db).await?;
        let e = create_enrollment(&db, enroll(&s.ada, &s.rust, Some(70.0))).await?;
        create_enrollment(&db, enroll(&s.bob, &s.go, None)).await?;

        // Collides with Bob's enrollment in Go
        let err = update_enrollment(
            &db,
            e.clone(),
            enrollment::EnrollmentPatch { student_id: Some(s.bob.id), course_id: Some(s.go.id), ..Default::default() },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Constraint(_)));
        assert_eq!(get_enrollment(&db, e.id).await?, e);

        let moved = update_enrollment(
            &db,
            e.clone(),
            enrollment::EnrollmentPatch { course_id: Some(s.go.id), ..Default::default() },
        )
        .await?;
        assert_eq!((moved.student_id, moved.course_id), (s.ada.id, s.go.id));
        assert_eq!(moved.grade, Some(70.0));
        assert_eq!(moved.enrolled_at, e.enrolled_at);

        let cleared = update_enrollment(
            &db,
            moved,
            enrollment::EnrollmentPatch { grade: Some(None), ..Default::default() },
        )
        .await?;
        assert_eq!(cleared.grade, None);
        Ok(())
    }

    #[tokio::test]
    async fn update_rejects_out_of_range_grade() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let s = seed(&db).await?;
        let e = create_enrollment(&db, enroll(&s.ada, &s.rust, Some(50.0))).await?;

        let err = update_enrollment(
            &db,
            e.clone(),
            enrollment::EnrollmentPatch { grade: Some(Some(-0.5)), ..Default::default() },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "grade must be between 0 and 100");
        assert_eq!(get_enrollment(&db, e.id).await?, e);
        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_only_that_enrollment() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let s = seed(&db).await?;
        let a = create_enrollment(&db, enroll(&s.ada, &s.rust, None)).await?;
        let b = create_enrollment(&db, enroll(&s.bob, &s.rust, None)).await?;

        delete_enrollment(&db, a.id).await?;
        assert_eq!(list_enrollments(&db).await?, vec![b]);
        assert!(matches!(delete_enrollment(&db, a.id).await, Err(ServiceError::NotFound(_))));
        assert!(student::Entity::find_by_id(s.ada.id).one(&db).await?.is_some());
        Ok(())
    }
}
