use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{info, instrument};

use models::{course, enrollment, instructor};
use crate::cascade::CascadeReport;
use crate::errors::ServiceError;

/// All instructors ordered by id.
pub async fn list_instructors(db: &DatabaseConnection) -> Result<Vec<instructor::Model>, ServiceError> {
    Ok(instructor::Entity::find().order_by_asc(instructor::Column::Id).all(db).await?)
}

/// Get instructor by id.
pub async fn get_instructor(db: &DatabaseConnection, id: i32) -> Result<instructor::Model, ServiceError> {
    instructor::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("instructor", id))
}

#[instrument(skip(db, new))]
pub async fn create_instructor(
    db: &DatabaseConnection,
    new: instructor::NewInstructor,
) -> Result<instructor::Model, ServiceError> {
    let created = instructor::create(db, new).await?;
    info!(id = created.id, "instructor created");
    Ok(created)
}

#[instrument(skip(db, existing, patch), fields(id = existing.id))]
pub async fn update_instructor(
    db: &DatabaseConnection,
    existing: instructor::Model,
    patch: instructor::InstructorPatch,
) -> Result<instructor::Model, ServiceError> {
    Ok(instructor::update(db, existing, patch).await?)
}

/// Delete an instructor, its courses, and every enrollment in those courses,
/// in one transaction.
#[instrument(skip(db))]
pub async fn delete_instructor(db: &DatabaseConnection, id: i32) -> Result<CascadeReport, ServiceError> {
    get_instructor(db, id).await?;

    let txn = db.begin().await?;
    let course_ids: Vec<i32> = course::Entity::find()
        .filter(course::Column::InstructorId.eq(id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|c| c.id)
        .collect();

    let enrollments = if course_ids.is_empty() {
        0
    } else {
        enrollment::Entity::delete_many()
            .filter(enrollment::Column::CourseId.is_in(course_ids))
            .exec(&txn)
            .await?
            .rows_affected
    };
    let courses = course::Entity::delete_many()
        .filter(course::Column::InstructorId.eq(id))
        .exec(&txn)
        .await?
        .rows_affected;
    instructor::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    info!(id, courses, enrollments, "instructor deleted");
    Ok(CascadeReport { courses, enrollments })
}

pub(crate) async fn ensure_instructor_exists(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    match instructor::Entity::find_by_id(id).one(db).await? {
        Some(_) => Ok(()),
        None => Err(ServiceError::missing_reference("instructor", id)),
    }
}
