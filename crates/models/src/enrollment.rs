use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{course, student, validation};

/// Join row between a student and a course. `(student_id, course_id)` is
/// unique (`uq_student_course`).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub student_id: i32,
    pub course_id: i32,
    pub grade: Option<f64>,
    pub enrolled_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Student, Course }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Student => Entity::belongs_to(student::Entity)
                .from(Column::StudentId)
                .to(student::Column::Id)
                .into(),
            Relation::Course => Entity::belongs_to(course::Entity)
                .from(Column::CourseId)
                .to(course::Column::Id)
                .into(),
        }
    }
}

impl Related<student::Entity> for Entity {
    fn to() -> RelationDef { Relation::Student.def() }
}

impl Related<course::Entity> for Entity {
    fn to() -> RelationDef { Relation::Course.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEnrollment {
    pub student_id: i32,
    pub course_id: i32,
    pub grade: Option<f64>,
}

impl NewEnrollment {
    pub fn normalize(self) -> Result<Self, ModelError> {
        Ok(Self { grade: self.grade.map(validation::validate_grade).transpose()?, ..self })
    }
}

/// `grade: Some(None)` clears the grade. `enrolled_at` is not patchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrollmentPatch {
    pub student_id: Option<i32>,
    pub course_id: Option<i32>,
    pub grade: Option<Option<f64>>,
}

impl EnrollmentPatch {
    pub fn normalize(self) -> Result<Self, ModelError> {
        let grade = match self.grade {
            Some(Some(g)) => Some(Some(validation::validate_grade(g)?)),
            other => other,
        };
        Ok(Self { grade, ..self })
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewEnrollment) -> Result<Model, ModelError> {
    let new = new.normalize()?;
    let am = ActiveModel {
        id: NotSet,
        student_id: Set(new.student_id),
        course_id: Set(new.course_id),
        grade: Set(new.grade),
        enrolled_at: Set(Utc::now()),
    };
    Ok(am.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(db: &C, existing: Model, patch: EnrollmentPatch) -> Result<Model, ModelError> {
    let patch = patch.normalize()?;
    let mut am: ActiveModel = existing.clone().into();
    if let Some(student_id) = patch.student_id { am.student_id = Set(student_id); }
    if let Some(course_id) = patch.course_id { am.course_id = Set(course_id); }
    if let Some(grade) = patch.grade { am.grade = Set(grade); }
    if !am.is_changed() { return Ok(existing); }
    Ok(am.update(db).await?)
}
