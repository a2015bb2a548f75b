use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{info, instrument};

use models::{enrollment, student};
use crate::cascade::CascadeReport;
use crate::errors::ServiceError;

/// All students ordered by id.
pub async fn list_students(db: &DatabaseConnection) -> Result<Vec<student::Model>, ServiceError> {
    Ok(student::Entity::find().order_by_asc(student::Column::Id).all(db).await?)
}

/// Get student by id.
pub async fn get_student(db: &DatabaseConnection, id: i32) -> Result<student::Model, ServiceError> {
    student::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("student", id))
}

/// Create a student; the email must not belong to another student.
#[instrument(skip(db, new), fields(email = %new.email))]
pub async fn create_student(db: &DatabaseConnection, new: student::NewStudent) -> Result<student::Model, ServiceError> {
    let new = new.normalize()?;
    ensure_email_available(db, &new.email, None).await?;
    let created = student::create(db, new).await?;
    info!(id = created.id, "student created");
    Ok(created)
}

/// Apply a partial update to an existing student.
#[instrument(skip(db, existing, patch), fields(id = existing.id))]
pub async fn update_student(
    db: &DatabaseConnection,
    existing: student::Model,
    patch: student::StudentPatch,
) -> Result<student::Model, ServiceError> {
    let patch = patch.normalize()?;
    if let Some(email) = patch.email.as_deref() {
        ensure_email_available(db, email, Some(existing.id)).await?;
    }
    Ok(student::update(db, existing, patch).await?)
}

/// Delete a student together with its enrollments.
#[instrument(skip(db))]
pub async fn delete_student(db: &DatabaseConnection, id: i32) -> Result<CascadeReport, ServiceError> {
    get_student(db, id).await?;

    let txn = db.begin().await?;
    let enrollments = enrollment::Entity::delete_many()
        .filter(enrollment::Column::StudentId.eq(id))
        .exec(&txn)
        .await?
        .rows_affected;
    student::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    info!(id, enrollments, "student deleted");
    Ok(CascadeReport { courses: 0, enrollments })
}

pub(crate) async fn ensure_student_exists(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    match student::Entity::find_by_id(id).one(db).await? {
        Some(_) => Ok(()),
        None => Err(ServiceError::missing_reference("student", id)),
    }
}

async fn ensure_email_available(db: &DatabaseConnection, email: &str, except: Option<i32>) -> Result<(), ServiceError> {
    let mut query = student::Entity::find().filter(student::Column::Email.eq(email));
    if let Some(id) = except {
        query = query.filter(student::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(ServiceError::Constraint(format!("email {email} is already registered")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use models::{course, instructor};

    fn new_student(name: &str, email: &str) -> student::NewStudent {
        student::NewStudent { name: name.into(), email: email.into(), year: student::DEFAULT_YEAR }
    }

    #[tokio::test]
    async fn student_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        let s = create_student(&db, new_student("Ada", "ada@example.com")).await?;
        assert_eq!(s.year, 1);
        assert_eq!(get_student(&db, s.id).await?, s);

        let updated = update_student(
            &db,
            s.clone(),
            student::StudentPatch { name: Some("Ada L.".into()), ..Default::default() },
        )
        .await?;
        assert_eq!(updated.name, "Ada L.");
        assert_eq!(updated.email, "ada@example.com");

        delete_student(&db, s.id).await?;
        assert!(matches!(get_student(&db, s.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        for i in 0..3 {
            create_student(&db, new_student(&format!("S{i}"), &format!("s{i}@example.com"))).await?;
        }
        let ids: Vec<i32> = list_students(&db).await?.into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_rejected_on_create_and_update() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create_student(&db, new_student("Ada", "ada@example.com")).await?;
        let bob = create_student(&db, new_student("Bob", "bob@example.com")).await?;

        let err = create_student(&db, new_student("Ada 2", "ada@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Constraint(_)));

        let err = update_student(
            &db,
            bob.clone(),
            student::StudentPatch { email: Some("ada@example.com".into()), ..Default::default() },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Constraint(_)));

        // Re-submitting one's own email is fine
        let same = update_student(
            &db,
            bob.clone(),
            student::StudentPatch { email: Some("bob@example.com".into()), ..Default::default() },
        )
        .await?;
        assert_eq!(same, bob);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_email_persists_nothing() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let err = create_student(&db, new_student("Ada", "bad-email")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == "email format invalid"));
        assert!(list_students(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn delete_cascades_to_enrollments_only() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let ada = create_student(&db, new_student("Ada", "ada@example.com")).await?;
        let bob = create_student(&db, new_student("Bob", "bob@example.com")).await?;
        let i = instructor::create(&db, instructor::NewInstructor { name: "Grace".into(), specialty: None }).await?;
        let c = course::create(
            &db,
            course::NewCourse { title: "Rust".into(), duration: 10, level: "beginner".into(), instructor_id: i.id },
        )
        .await?;
        for s in [&ada, &bob] {
            enrollment::create(&db, enrollment::NewEnrollment { student_id: s.id, course_id: c.id, grade: None }).await?;
        }

        let report = delete_student(&db, ada.id).await?;
        assert_eq!(report, CascadeReport { courses: 0, enrollments: 1 });

        let left = enrollment::Entity::find().all(&db).await?;
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].student_id, bob.id);
        assert!(course::Entity::find_by_id(c.id).one(&db).await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn delete_unknown_is_not_found() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        assert!(matches!(delete_student(&db, 99).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
