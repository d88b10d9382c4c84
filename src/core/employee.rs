//! Employee business logic - teachers and staff.

use crate::{
    core::scheduler_line::{refresh_line_names_for_lines, refresh_line_names_for_teacher},
    entities::{
        Employee, SchedulerLine, SchedulerLineInvigilator, StudentEmployee, employee,
        scheduler_line, scheduler_line_invigilator, student_employee,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::info;

/// Input for [`create_employee`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    /// Full name
    pub name: String,
    /// Father's name
    pub father_name: String,
    /// Staff number
    pub employee_no: String,
    /// National identity card number
    pub cnic: Option<String>,
    /// Whether the employee can be assigned as an instructor
    pub is_teacher: bool,
}

impl NewEmployee {
    /// A teaching employee with the required fields set.
    pub fn teacher(
        name: impl Into<String>,
        father_name: impl Into<String>,
        employee_no: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            father_name: father_name.into(),
            employee_no: employee_no.into(),
            cnic: None,
            is_teacher: true,
        }
    }
}

/// Creates an active employee. Name, father name and employee number must
/// not be blank.
pub async fn create_employee(db: &DatabaseConnection, new: NewEmployee) -> Result<employee::Model> {
    for (value, field) in [
        (&new.name, "name"),
        (&new.father_name, "father name"),
        (&new.employee_no, "employee number"),
    ] {
        if value.trim().is_empty() {
            return Err(Error::validation(format!("Employee {field} cannot be empty")));
        }
    }

    let employee = employee::ActiveModel {
        name: Set(new.name.trim().to_string()),
        father_name: Set(new.father_name.trim().to_string()),
        employee_no: Set(new.employee_no.trim().to_string()),
        cnic: Set(new.cnic),
        is_teacher: Set(new.is_teacher),
        active: Set(true),
        ..Default::default()
    };
    employee.insert(db).await.map_err(Into::into)
}

/// Finds an employee by id, archived or not.
pub async fn get_employee_by_id<C>(db: &C, employee_id: i64) -> Result<Option<employee::Model>>
where
    C: ConnectionTrait,
{
    Employee::find_by_id(employee_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an active employee by staff number.
pub async fn get_employee_by_number(
    db: &DatabaseConnection,
    employee_no: &str,
) -> Result<Option<employee::Model>> {
    Employee::find()
        .filter(employee::Column::EmployeeNo.eq(employee_no))
        .filter(employee::Column::Active.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all active employees ordered by name.
pub async fn get_all_active_employees(db: &DatabaseConnection) -> Result<Vec<employee::Model>> {
    Employee::find()
        .filter(employee::Column::Active.eq(true))
        .order_by_asc(employee::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves active employees flagged as teachers, ordered by name.
pub async fn get_active_teachers(db: &DatabaseConnection) -> Result<Vec<employee::Model>> {
    Employee::find()
        .filter(employee::Column::Active.eq(true))
        .filter(employee::Column::IsTeacher.eq(true))
        .order_by_asc(employee::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Renames an employee and relabels the lines they teach.
pub async fn rename_employee(
    db: &DatabaseConnection,
    employee_id: i64,
    name: &str,
) -> Result<employee::Model> {
    if name.trim().is_empty() {
        return Err(Error::validation("Employee name cannot be empty"));
    }

    let txn = db.begin().await?;

    let mut employee: employee::ActiveModel = get_employee_by_id(&txn, employee_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Employee",
            id: employee_id,
        })?
        .into();
    employee.name = Set(name.trim().to_string());
    let updated = employee.update(&txn).await?;

    let relabelled = refresh_line_names_for_teacher(&txn, employee_id).await?;
    txn.commit().await?;

    info!(
        "Renamed employee {} to '{}', relabelled {} lines",
        employee_id, updated.name, relabelled
    );
    Ok(updated)
}

/// Archives or restores an employee.
pub async fn set_employee_active(
    db: &DatabaseConnection,
    employee_id: i64,
    active: bool,
) -> Result<employee::Model> {
    let mut employee: employee::ActiveModel = get_employee_by_id(db, employee_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Employee",
            id: employee_id,
        })?
        .into();
    employee.active = Set(active);
    employee.update(db).await.map_err(Into::into)
}

/// Deletes an employee. Lines they taught lose their teacher and are
/// relabelled; invigilator assignments and student links are removed.
pub async fn delete_employee(db: &DatabaseConnection, employee_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    get_employee_by_id(&txn, employee_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Employee",
            id: employee_id,
        })?;

    let taught: Vec<i64> = SchedulerLine::find()
        .filter(scheduler_line::Column::TeacherId.eq(employee_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|line| line.id)
        .collect();

    SchedulerLine::update_many()
        .col_expr(scheduler_line::Column::TeacherId, Expr::value(Option::<i64>::None))
        .filter(scheduler_line::Column::TeacherId.eq(employee_id))
        .exec(&txn)
        .await?;
    SchedulerLineInvigilator::delete_many()
        .filter(scheduler_line_invigilator::Column::EmployeeId.eq(employee_id))
        .exec(&txn)
        .await?;
    StudentEmployee::delete_many()
        .filter(student_employee::Column::EmployeeId.eq(employee_id))
        .exec(&txn)
        .await?;
    Employee::delete_by_id(employee_id).exec(&txn).await?;

    refresh_line_names_for_lines(&txn, taught).await?;

    txn.commit().await?;
    info!("Deleted employee {}", employee_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::scheduler_line::{add_invigilator, get_invigilators, require_scheduler_line},
        test_utils::*,
    };

    #[tokio::test]
    async fn test_create_employee_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_employee(&db, NewEmployee::teacher("", "Father", "E-1")).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        let result = create_employee(&db, NewEmployee::teacher("Name", " ", "E-1")).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        let result = create_employee(&db, NewEmployee::teacher("Name", "Father", "")).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let employee = create_employee(&db, NewEmployee::teacher("Name", "Father", "E-1")).await?;
        assert!(employee.is_teacher);
        assert!(employee.active);

        Ok(())
    }

    #[tokio::test]
    async fn test_teacher_listing_and_archiving() -> Result<()> {
        let db = setup_test_db().await?;
        let teacher = create_test_employee(&db, "Teacher").await?;
        let mut clerk = NewEmployee::teacher("Clerk", "Father", "E-CLERK");
        clerk.is_teacher = false;
        let clerk = create_employee(&db, clerk).await?;

        assert_eq!(get_all_active_employees(&db).await?.len(), 2);
        let teachers = get_active_teachers(&db).await?;
        assert_eq!(teachers.len(), 1);
        assert_eq!(teachers[0].id, teacher.id);

        set_employee_active(&db, clerk.id, false).await?;
        assert_eq!(get_all_active_employees(&db).await?.len(), 1);
        assert!(get_employee_by_number(&db, "E-CLERK").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_employee_detaches_lines() -> Result<()> {
        let fixture = setup_with_line().await?;
        let db = &fixture.db;
        let invigilator = create_test_employee(db, "Invigilator").await?;
        add_invigilator(db, fixture.line.id, invigilator.id).await?;

        delete_employee(db, fixture.teacher.id).await?;
        delete_employee(db, invigilator.id).await?;

        let line = require_scheduler_line(db, fixture.line.id).await?;
        assert!(line.teacher_id.is_none());
        assert_eq!(line.name, "Data Structures - ");
        assert!(get_invigilators(db, fixture.line.id).await?.is_empty());

        Ok(())
    }
}
