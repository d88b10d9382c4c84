//! Employee entity - teachers and staff.
//!
//! An employee instructs scheduler lines (through `teacher_id`), may invigilate
//! others, and can be linked to students.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employee database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cms_employees")]
pub struct Model {
    /// Unique identifier for the employee
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Teacher or staff member name
    pub name: String,
    pub father_name: String,
    /// Staff number issued by the school
    pub employee_no: String,
    pub cnic: Option<String>,
    /// Whether this employee teaches (defaults to true)
    pub is_teacher: bool,
    /// Archive flag - inactive employees are hidden from listings
    pub active: bool,
}

/// Defines relationships between Employee and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Lines this employee instructs
    #[sea_orm(has_many = "super::scheduler_line::Entity")]
    SchedulerLines,
    #[sea_orm(has_many = "super::student_employee::Entity")]
    StudentEmployees,
    #[sea_orm(has_many = "super::scheduler_line_invigilator::Entity")]
    Invigilations,
}

impl Related<super::scheduler_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SchedulerLines.def()
    }
}

impl Related<super::student_employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentEmployees.def()
    }
}

impl Related<super::scheduler_line_invigilator::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invigilations.def()
    }
}

// Many-to-many relationship with students
impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        super::student_employee::Relation::Student.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::student_employee::Relation::Employee.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
