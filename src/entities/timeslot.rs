//! Timeslot entity - a time interval of an exam schedule.
//!
//! Times are decimal hours (9.5 is half past nine). `name` and `duration` are
//! derived from the two bounds and rewritten whenever either bound changes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Timeslot database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cms_timeslots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Derived label, `"<start_time> - <end_time>"`
    pub name: String,
    pub start_time: f64,
    pub end_time: f64,
    /// Derived, `end_time - start_time`
    pub duration: f64,
    /// Schedule this slot belongs to
    pub schedule_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schedule::Entity",
        from = "Column::ScheduleId",
        to = "super::schedule::Column::Id"
    )]
    Schedule,
    #[sea_orm(has_many = "super::scheduler_line::Entity")]
    SchedulerLines,
}

impl Related<super::schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedule.def()
    }
}

impl Related<super::scheduler_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SchedulerLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
