//! Schedule entity - an examination event (e.g., "Fall 2024 Finals").

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Schedule database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cms_schedules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Exam name
    pub name: String,
    /// First examination day
    pub start_date: Date,
    /// Last examination day
    pub end_date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::timeslot::Entity")]
    TimeSlots,
    #[sea_orm(has_many = "super::scheduler_line::Entity")]
    SchedulerLines,
}

impl Related<super::timeslot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimeSlots.def()
    }
}

impl Related<super::scheduler_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SchedulerLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
