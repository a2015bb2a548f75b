use sea_orm::{entity::prelude::*, ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{course, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "instructors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub specialty: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Course }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Course => Entity::has_many(course::Entity).into() }
    }
}

impl Related<course::Entity> for Entity {
    fn to() -> RelationDef { Relation::Course.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInstructor {
    pub name: String,
    pub specialty: Option<String>,
}

impl NewInstructor {
    pub fn normalize(self) -> Result<Self, ModelError> {
        Ok(Self {
            name: validation::required_text("name", &self.name)?,
            specialty: normalize_specialty(self.specialty),
        })
    }
}

/// `specialty: Some(None)` clears the column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstructorPatch {
    pub name: Option<String>,
    pub specialty: Option<Option<String>>,
}

impl InstructorPatch {
    pub fn normalize(self) -> Result<Self, ModelError> {
        Ok(Self {
            name: self.name.map(|n| validation::required_text("name", &n)).transpose()?,
            specialty: self.specialty.map(normalize_specialty),
        })
    }
}

/// Blank specialties are stored as null.
fn normalize_specialty(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewInstructor) -> Result<Model, ModelError> {
    let new = new.normalize()?;
    let am = ActiveModel {
        id: NotSet,
        name: Set(new.name),
        specialty: Set(new.specialty),
    };
    Ok(am.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(db: &C, existing: Model, patch: InstructorPatch) -> Result<Model, ModelError> {
    let patch = patch.normalize()?;
    let mut am: ActiveModel = existing.clone().into();
    if let Some(name) = patch.name { am.name = Set(name); }
    if let Some(specialty) = patch.specialty { am.specialty = Set(specialty); }
    if !am.is_changed() { return Ok(existing); }
    Ok(am.update(db).await?)
}
