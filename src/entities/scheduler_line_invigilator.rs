use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Junction table linking scheduler lines to the employees invigilating them
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cms_schedulerline_invigilator_rel")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub scheduler_line_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub employee_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::scheduler_line::Entity",
        from = "Column::SchedulerLineId",
        to = "super::scheduler_line::Column::Id",
        on_delete = "Cascade"
    )]
    SchedulerLine,
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id",
        on_delete = "Cascade"
    )]
    Employee,
}

impl Related<super::scheduler_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SchedulerLine.def()
    }
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
