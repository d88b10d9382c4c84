//! Course catalogue business logic.

use crate::{
    core::scheduler_line::{refresh_line_names_for_course, refresh_line_names_for_lines},
    entities::{Course, SchedulerLine, course, scheduler_line},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::info;

fn validate(name: &str, code: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("Course name cannot be empty"));
    }
    if code.trim().is_empty() {
        return Err(Error::validation("Course code cannot be empty"));
    }
    Ok(())
}

/// Retrieves all courses ordered by name.
pub async fn get_all_courses(db: &DatabaseConnection) -> Result<Vec<course::Model>> {
    Course::find()
        .order_by_asc(course::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a course by id.
pub async fn get_course_by_id<C>(db: &C, course_id: i64) -> Result<Option<course::Model>>
where
    C: ConnectionTrait,
{
    Course::find_by_id(course_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a course by its catalogue code.
pub async fn get_course_by_code(
    db: &DatabaseConnection,
    code: &str,
) -> Result<Option<course::Model>> {
    Course::find()
        .filter(course::Column::Code.eq(code))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a course. Name and code must not be blank.
pub async fn create_course(db: &DatabaseConnection, name: &str, code: &str) -> Result<course::Model> {
    validate(name, code)?;

    let course = course::ActiveModel {
        name: Set(name.trim().to_string()),
        code: Set(code.trim().to_string()),
        ..Default::default()
    };
    course.insert(db).await.map_err(Into::into)
}

/// Renames a course and relabels its scheduler lines in the same transaction.
pub async fn rename_course(
    db: &DatabaseConnection,
    course_id: i64,
    name: &str,
) -> Result<course::Model> {
    if name.trim().is_empty() {
        return Err(Error::validation("Course name cannot be empty"));
    }

    let txn = db.begin().await?;

    let mut course: course::ActiveModel = get_course_by_id(&txn, course_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Course",
            id: course_id,
        })?
        .into();
    course.name = Set(name.trim().to_string());
    let updated = course.update(&txn).await?;

    let relabelled = refresh_line_names_for_course(&txn, course_id).await?;
    txn.commit().await?;

    info!(
        "Renamed course {} to '{}', relabelled {} lines",
        course_id, updated.name, relabelled
    );
    Ok(updated)
}

/// Changes a course's catalogue code.
pub async fn update_course_code(
    db: &DatabaseConnection,
    course_id: i64,
    code: &str,
) -> Result<course::Model> {
    if code.trim().is_empty() {
        return Err(Error::validation("Course code cannot be empty"));
    }

    let mut course: course::ActiveModel = get_course_by_id(db, course_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Course",
            id: course_id,
        })?
        .into();
    course.code = Set(code.trim().to_string());
    course.update(db).await.map_err(Into::into)
}

/// Deletes a course. Its lines lose the course reference and are relabelled.
pub async fn delete_course(db: &DatabaseConnection, course_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    get_course_by_id(&txn, course_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Course",
            id: course_id,
        })?;

    let orphaned: Vec<i64> = SchedulerLine::find()
        .filter(scheduler_line::Column::CourseId.eq(course_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|line| line.id)
        .collect();

    SchedulerLine::update_many()
        .col_expr(scheduler_line::Column::CourseId, Expr::value(Option::<i64>::None))
        .filter(scheduler_line::Column::CourseId.eq(course_id))
        .exec(&txn)
        .await?;
    Course::delete_by_id(course_id).exec(&txn).await?;

    refresh_line_names_for_lines(&txn, orphaned).await?;

    txn.commit().await?;
    info!("Deleted course {}", course_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{core::scheduler_line::require_scheduler_line, test_utils::*};

    #[tokio::test]
    async fn test_create_course_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_course(&db, "", "CS-101").await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        let result = create_course(&db, "Intro", " ").await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let course = create_course(&db, "Intro to Programming", "CS-101").await?;
        let found = get_course_by_code(&db, "CS-101").await?.unwrap();
        assert_eq!(found, course);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_course_code() -> Result<()> {
        let db = setup_test_db().await?;
        let course = create_test_course(&db, "Networks", "CS-350").await?;

        let updated = update_course_code(&db, course.id, "CS-355").await?;
        assert_eq!(updated.code, "CS-355");
        assert_eq!(get_all_courses(&db).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_course_relabels_lines() -> Result<()> {
        let fixture = setup_with_line().await?;
        let db = &fixture.db;

        delete_course(db, fixture.course.id).await?;

        let line = require_scheduler_line(db, fixture.line.id).await?;
        assert!(line.course_id.is_none());
        assert_eq!(line.name, " - Dr. Saleem");

        Ok(())
    }
}
