//! Department entity - an academic department students are enrolled in.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Department database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cms_departments")]
pub struct Model {
    /// Unique identifier for the department
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Department name (e.g., "Computer Science")
    pub name: String,
}

/// Defines relationships between Department and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One department has many students
    #[sea_orm(has_many = "super::student::Entity")]
    Students,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
