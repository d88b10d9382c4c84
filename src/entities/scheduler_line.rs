//! Scheduler line entity - one exam sitting.
//!
//! Binds a schedule, date, course, room, teacher and timeslot together.
//! Invigilators live in the `cms_schedulerline_invigilator_rel` junction table.
//! Nothing prevents two lines from sharing a room or teacher in the same slot.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Scheduler line database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cms_scheduler_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Derived label, `"<course name> - <teacher name>"`
    pub name: String,
    pub schedule_id: Option<i64>,
    /// Day of the sitting
    pub date: Date,
    pub course_id: Option<i64>,
    pub room_id: Option<i64>,
    /// Instructor responsible for the sitting
    pub teacher_id: Option<i64>,
    pub timeslot_id: Option<i64>,
    pub active: bool,
}

/// Defines relationships between SchedulerLine and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schedule::Entity",
        from = "Column::ScheduleId",
        to = "super::schedule::Column::Id"
    )]
    Schedule,
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::room::Entity",
        from = "Column::RoomId",
        to = "super::room::Column::Id"
    )]
    Room,
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::TeacherId",
        to = "super::employee::Column::Id"
    )]
    Teacher,
    #[sea_orm(
        belongs_to = "super::timeslot::Entity",
        from = "Column::TimeslotId",
        to = "super::timeslot::Column::Id"
    )]
    TimeSlot,
    #[sea_orm(has_many = "super::scheduler_line_invigilator::Entity")]
    Invigilators,
}

impl Related<super::schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedule.def()
    }
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::timeslot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimeSlot.def()
    }
}

impl Related<super::scheduler_line_invigilator::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invigilators.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
