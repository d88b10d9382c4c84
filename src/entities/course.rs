//! Course entity - an entry of the academic course catalogue.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Course database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cms_courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Course title (e.g., "Data Structures")
    pub name: String,
    /// Catalogue code (e.g., "CS-201")
    pub code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::scheduler_line::Entity")]
    SchedulerLines,
}

impl Related<super::scheduler_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SchedulerLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
