//! Student entity - the workflow-bearing record of the CMS.
//!
//! A student moves through `draft`, `verified`, `approved` and `cancelled`.
//! The admission number is assigned on approval; `grad_date` is stored and
//! kept in sync with `admission_date`, while age is derived on read.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a student record
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum StudentState {
    /// Freshly created, not yet checked
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Documents checked by staff
    #[sea_orm(string_value = "verified")]
    Verified,
    /// Admitted; carries an admission number
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Application withdrawn or rejected
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl StudentState {
    /// Human-readable label, as shown in listings
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Verified => "Verified",
            Self::Approved => "Approved",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Student gender
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male
    #[sea_orm(string_value = "male")]
    Male,
    /// Female
    #[sea_orm(string_value = "female")]
    Female,
}

/// Student database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cms_students")]
pub struct Model {
    /// Unique identifier for the student
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Student's full name
    pub name: String,
    pub father_name: String,
    /// Registration number issued at application time
    pub registration_no: String,
    /// Department the student belongs to, if any
    pub department_id: Option<i64>,
    /// National identity card number
    pub cnic: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_mobile: Option<String>,
    /// Photo, stored as raw bytes
    pub image: Option<Vec<u8>>,
    pub admission_date: Option<Date>,
    pub gender: Gender,
    /// Discord user ID of the staff member responsible for the record
    pub user_id: Option<String>,
    pub date_of_birth: Option<Date>,
    /// Assigned on approval as `"<admission year>-<sequence value>"`
    pub admission_no: Option<String>,
    /// Expected graduation year (admission year + 4)
    pub grad_date: Option<i32>,
    pub remark: Option<String>,
    pub state: StudentState,
    /// Archive flag - inactive students are hidden from listings
    pub active: bool,
}

/// Defines relationships between Student and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each student optionally belongs to one department
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id"
    )]
    Department,
    /// Junction rows linking the student to employees
    #[sea_orm(has_many = "super::student_employee::Entity")]
    StudentEmployees,
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl Related<super::student_employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentEmployees.def()
    }
}

// Many-to-many relationship with employees
impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        super::student_employee::Relation::Employee.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::student_employee::Relation::Student.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
