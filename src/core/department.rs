//! Department business logic.

use crate::{
    entities::{Department, Student, department, student},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::info;

/// Retrieves all departments ordered by name.
pub async fn get_all_departments(db: &DatabaseConnection) -> Result<Vec<department::Model>> {
    Department::find()
        .order_by_asc(department::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a department by its exact name.
pub async fn get_department_by_name<C>(db: &C, name: &str) -> Result<Option<department::Model>>
where
    C: ConnectionTrait,
{
    Department::find()
        .filter(department::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a department by id.
pub async fn get_department_by_id(
    db: &DatabaseConnection,
    department_id: i64,
) -> Result<Option<department::Model>> {
    Department::find_by_id(department_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a department. The name must not be blank.
pub async fn create_department<C>(db: &C, name: &str) -> Result<department::Model>
where
    C: ConnectionTrait,
{
    if name.trim().is_empty() {
        return Err(Error::validation("Department name cannot be empty"));
    }

    let department = department::ActiveModel {
        name: Set(name.trim().to_string()),
        ..Default::default()
    };
    department.insert(db).await.map_err(Into::into)
}

/// Renames a department.
pub async fn rename_department(
    db: &DatabaseConnection,
    department_id: i64,
    name: &str,
) -> Result<department::Model> {
    if name.trim().is_empty() {
        return Err(Error::validation("Department name cannot be empty"));
    }

    let mut department: department::ActiveModel = get_department_by_id(db, department_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Department",
            id: department_id,
        })?
        .into();
    department.name = Set(name.trim().to_string());
    department.update(db).await.map_err(Into::into)
}

/// Deletes a department. Its students stay, without a department.
pub async fn delete_department(db: &DatabaseConnection, department_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    Department::find_by_id(department_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "Department",
            id: department_id,
        })?;

    Student::update_many()
        .col_expr(student::Column::DepartmentId, Expr::value(Option::<i64>::None))
        .filter(student::Column::DepartmentId.eq(department_id))
        .exec(&txn)
        .await?;
    Department::delete_by_id(department_id).exec(&txn).await?;

    txn.commit().await?;
    info!("Deleted department {}", department_id);
    Ok(())
}

/// Lists the active students of a department, ordered by name.
pub async fn get_department_students(
    db: &DatabaseConnection,
    department_id: i64,
) -> Result<Vec<student::Model>> {
    Student::find()
        .filter(student::Column::DepartmentId.eq(department_id))
        .filter(student::Column::Active.eq(true))
        .order_by_asc(student::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::student::{StudentChanges, get_student_by_id, update_student},
        test_utils::*,
    };

    #[tokio::test]
    async fn test_create_department_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_department(&db, "   ").await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let department = create_department(&db, "  Mathematics ").await?;
        assert_eq!(department.name, "Mathematics");

        Ok(())
    }

    #[tokio::test]
    async fn test_department_students() -> Result<()> {
        let db = setup_test_db().await?;
        let department = create_test_department(&db, "Chemistry").await?;
        let inside = create_test_student(&db, "Nida").await?;
        create_test_student(&db, "Outsider").await?;

        update_student(
            &db,
            inside.id,
            StudentChanges {
                department_id: Some(Some(department.id)),
                ..Default::default()
            },
        )
        .await?;

        let students = get_department_students(&db, department.id).await?;
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].id, inside.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_rename_and_lookup() -> Result<()> {
        let db = setup_test_db().await?;
        let department = create_test_department(&db, "Bio").await?;

        rename_department(&db, department.id, "Biology").await?;

        assert!(get_department_by_name(&db, "Bio").await?.is_none());
        let found = get_department_by_name(&db, "Biology").await?.unwrap();
        assert_eq!(found.id, department.id);

        let result = rename_department(&db, 999, "Nope").await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_department_detaches_students() -> Result<()> {
        let db = setup_test_db().await?;
        let department = create_test_department(&db, "History").await?;
        let student = create_test_student(&db, "Rabia").await?;
        update_student(
            &db,
            student.id,
            StudentChanges {
                department_id: Some(Some(department.id)),
                ..Default::default()
            },
        )
        .await?;

        delete_department(&db, department.id).await?;

        assert!(get_all_departments(&db).await?.is_empty());
        let student = get_student_by_id(&db, student.id).await?.unwrap();
        assert!(student.department_id.is_none());

        Ok(())
    }
}
