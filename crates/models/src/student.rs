use sea_orm::{entity::prelude::*, ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{enrollment, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub year: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Enrollment }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Enrollment => Entity::has_many(enrollment::Entity).into() }
    }
}

impl Related<enrollment::Entity> for Entity {
    fn to() -> RelationDef { Relation::Enrollment.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub const DEFAULT_YEAR: i32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub year: i32,
}

impl NewStudent {
    pub fn normalize(self) -> Result<Self, ModelError> {
        Ok(Self {
            name: validation::required_text("name", &self.name)?,
            email: validation::validate_email(&self.email)?,
            year: self.year,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub year: Option<i32>,
}

impl StudentPatch {
    pub fn normalize(self) -> Result<Self, ModelError> {
        Ok(Self {
            name: self.name.map(|n| validation::required_text("name", &n)).transpose()?,
            email: self.email.map(|e| validation::validate_email(&e)).transpose()?,
            year: self.year,
        })
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewStudent) -> Result<Model, ModelError> {
    let new = new.normalize()?;
    let am = ActiveModel {
        id: NotSet,
        name: Set(new.name),
        email: Set(new.email),
        year: Set(new.year),
    };
    Ok(am.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(db: &C, existing: Model, patch: StudentPatch) -> Result<Model, ModelError> {
    let patch = patch.normalize()?;
    let mut am: ActiveModel = existing.clone().into();
    if let Some(name) = patch.name { am.name = Set(name); }
    if let Some(email) = patch.email { am.email = Set(email); }
    if let Some(year) = patch.year { am.year = Set(year); }
    if !am.is_changed() { return Ok(existing); }
    Ok(am.update(db).await?)
}
