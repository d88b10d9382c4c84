//! Block entity - a building that contains rooms.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Block database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cms_blocks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Block name (e.g., "A Block")
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One block has many rooms
    #[sea_orm(has_many = "super::room::Entity")]
    Rooms,
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rooms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
