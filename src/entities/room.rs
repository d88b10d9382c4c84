//! Room entity - an exam hall or classroom inside a block.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Room database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cms_rooms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Room name (e.g., "A-101")
    pub name: String,
    /// Number of seats available
    pub room_capacity: i32,
    /// Block the room is located in
    pub block_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each room belongs to one block
    #[sea_orm(
        belongs_to = "super::block::Entity",
        from = "Column::BlockId",
        to = "super::block::Column::Id"
    )]
    Block,
    /// Exam sittings held in this room
    #[sea_orm(has_many = "super::scheduler_line::Entity")]
    SchedulerLines,
}

impl Related<super::block::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Block.def()
    }
}

impl Related<super::scheduler_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SchedulerLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
