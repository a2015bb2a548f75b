use sea_orm::{entity::prelude::*, ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{enrollment, instructor, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    /// Hours.
    pub duration: i32,
    pub level: String,
    pub instructor_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Instructor, Enrollment }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Instructor => Entity::belongs_to(instructor::Entity)
                .from(Column::InstructorId)
                .to(instructor::Column::Id)
                .into(),
            Relation::Enrollment => Entity::has_many(enrollment::Entity).into(),
        }
    }
}

impl Related<instructor::Entity> for Entity {
    fn to() -> RelationDef { Relation::Instructor.def() }
}

impl Related<enrollment::Entity> for Entity {
    fn to() -> RelationDef { Relation::Enrollment.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub const DEFAULT_LEVEL: &str = "beginner";

/// Trimmed, lower-cased level; blank falls back to [`DEFAULT_LEVEL`]. Any
/// other value is stored as given.
pub fn normalize_level(raw: &str) -> String {
    let v = raw.trim().to_lowercase();
    if v.is_empty() { DEFAULT_LEVEL.to_string() } else { v }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCourse {
    pub title: String,
    pub duration: i32,
    pub level: String,
    pub instructor_id: i32,
}

impl NewCourse {
    pub fn normalize(self) -> Result<Self, ModelError> {
        Ok(Self {
            title: validation::required_text("title", &self.title)?,
            duration: validation::validate_positive("duration", self.duration)?,
            level: normalize_level(&self.level),
            instructor_id: self.instructor_id,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoursePatch {
    pub title: Option<String>,
    pub duration: Option<i32>,
    pub level: Option<String>,
    pub instructor_id: Option<i32>,
}

impl CoursePatch {
    pub fn normalize(self) -> Result<Self, ModelError> {
        Ok(Self {
            title: self.title.map(|t| validation::required_text("title", &t)).transpose()?,
            duration: self.duration.map(|d| validation::validate_positive("duration", d)).transpose()?,
            level: self.level.as_deref().map(normalize_level),
            instructor_id: self.instructor_id,
        })
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewCourse) -> Result<Model, ModelError> {
    let new = new.normalize()?;
    let am = ActiveModel {
        id: NotSet,
        title: Set(new.title),
        duration: Set(new.duration),
        level: Set(new.level),
        instructor_id: Set(new.instructor_id),
    };
    Ok(am.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(db: &C, existing: Model, patch: CoursePatch) -> Result<Model, ModelError> {
    let patch = patch.normalize()?;
    let mut am: ActiveModel = existing.clone().into();
    if let Some(title) = patch.title { am.title = Set(title); }
    if let Some(duration) = patch.duration { am.duration = Set(duration); }
    if let Some(level) = patch.level { am.level = Set(level); }
    if let Some(instructor_id) = patch.instructor_id { am.instructor_id = Set(instructor_id); }
    if !am.is_changed() { return Ok(existing); }
    Ok(am.update(db).await?)
}
