//! Scheduler line business logic - exam sittings and their invigilators.
//!
//! A line's `name` is derived from its course and teacher and rewritten by
//! every operation that changes either of them. Lines are stored as given;
//! room, teacher and timeslot clashes are not checked.

use crate::{
    entities::{
        Course, Employee, Room, Schedule, SchedulerLine, SchedulerLineInvigilator, TimeSlot,
        employee, scheduler_line, scheduler_line_invigilator,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{Condition, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info};

/// Builds a line label from its course and teacher names. A missing side
/// renders as an empty string.
#[must_use]
pub fn compose_line_name(course_name: Option<&str>, teacher_name: Option<&str>) -> String {
    format!(
        "{} - {}",
        course_name.unwrap_or_default(),
        teacher_name.unwrap_or_default()
    )
}

/// Looks up the course and teacher and builds the label for a line.
pub async fn derive_line_name<C>(
    db: &C,
    course_id: Option<i64>,
    teacher_id: Option<i64>,
) -> Result<String>
where
    C: ConnectionTrait,
{
    let course = match course_id {
        Some(id) => Some(Course::find_by_id(id).one(db).await?.ok_or(Error::NotFound {
            entity: "Course",
            id,
        })?),
        None => None,
    };
    let teacher = match teacher_id {
        Some(id) => Some(Employee::find_by_id(id).one(db).await?.ok_or(Error::NotFound {
            entity: "Employee",
            id,
        })?),
        None => None,
    };

    Ok(compose_line_name(
        course.as_ref().map(|c| c.name.as_str()),
        teacher.as_ref().map(|t| t.name.as_str()),
    ))
}

/// Rewrites the label of every line matching `condition`.
async fn refresh_line_names<C>(db: &C, condition: Condition) -> Result<usize>
where
    C: ConnectionTrait,
{
    let lines = SchedulerLine::find().filter(condition).all(db).await?;
    let count = lines.len();

    for line in lines {
        let name = derive_line_name(db, line.course_id, line.teacher_id).await?;
        if name == line.name {
            continue;
        }
        let mut line: scheduler_line::ActiveModel = line.into();
        line.name = Set(name);
        line.update(db).await?;
    }

    Ok(count)
}

/// Rewrites the labels of all lines of a course, e.g. after a rename.
pub async fn refresh_line_names_for_course<C>(db: &C, course_id: i64) -> Result<usize>
where
    C: ConnectionTrait,
{
    refresh_line_names(
        db,
        Condition::all().add(scheduler_line::Column::CourseId.eq(course_id)),
    )
    .await
}

/// Rewrites the labels of all lines taught by an employee.
pub async fn refresh_line_names_for_teacher<C>(db: &C, employee_id: i64) -> Result<usize>
where
    C: ConnectionTrait,
{
    refresh_line_names(
        db,
        Condition::all().add(scheduler_line::Column::TeacherId.eq(employee_id)),
    )
    .await
}

/// Rewrites the labels of the given lines, e.g. after a referenced record was deleted.
pub async fn refresh_line_names_for_lines<C>(db: &C, line_ids: Vec<i64>) -> Result<usize>
where
    C: ConnectionTrait,
{
    if line_ids.is_empty() {
        return Ok(0);
    }
    refresh_line_names(
        db,
        Condition::all().add(scheduler_line::Column::Id.is_in(line_ids)),
    )
    .await
}

/// Input for [`create_scheduler_line`]. Every reference is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSchedulerLine {
    /// Day of the sitting
    pub date: NaiveDate,
    /// Exam schedule the sitting belongs to
    pub schedule_id: Option<i64>,
    /// Course examined
    pub course_id: Option<i64>,
    /// Room the sitting is held in
    pub room_id: Option<i64>,
    /// Instructor in charge
    pub teacher_id: Option<i64>,
    /// Time of day
    pub timeslot_id: Option<i64>,
}

impl NewSchedulerLine {
    /// A sitting on `date` with no references set yet.
    #[must_use]
    pub const fn on(date: NaiveDate) -> Self {
        Self {
            date,
            schedule_id: None,
            course_id: None,
            room_id: None,
            teacher_id: None,
            timeslot_id: None,
        }
    }
}

/// Partial update for [`update_scheduler_line`]. `Some(None)` clears a reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerLineChanges {
    /// New day
    pub date: Option<NaiveDate>,
    /// New schedule, or `Some(None)` to detach
    pub schedule_id: Option<Option<i64>>,
    /// New course; relabels the line
    pub course_id: Option<Option<i64>>,
    /// New room
    pub room_id: Option<Option<i64>>,
    /// New instructor; relabels the line
    pub teacher_id: Option<Option<i64>>,
    /// New timeslot
    pub timeslot_id: Option<Option<i64>>,
}

async fn ensure_schedule<C: ConnectionTrait>(db: &C, schedule_id: Option<i64>) -> Result<()> {
    if let Some(id) = schedule_id {
        Schedule::find_by_id(id).one(db).await?.ok_or(Error::NotFound {
            entity: "Schedule",
            id,
        })?;
    }
    Ok(())
}

async fn ensure_room<C: ConnectionTrait>(db: &C, room_id: Option<i64>) -> Result<()> {
    if let Some(id) = room_id {
        Room::find_by_id(id)
            .one(db)
            .await?
            .ok_or(Error::NotFound { entity: "Room", id })?;
    }
    Ok(())
}

async fn ensure_timeslot<C: ConnectionTrait>(db: &C, timeslot_id: Option<i64>) -> Result<()> {
    if let Some(id) = timeslot_id {
        TimeSlot::find_by_id(id).one(db).await?.ok_or(Error::NotFound {
            entity: "TimeSlot",
            id,
        })?;
    }
    Ok(())
}

/// Creates an exam sitting. Referenced records must exist.
pub async fn create_scheduler_line(
    db: &DatabaseConnection,
    new: NewSchedulerLine,
) -> Result<scheduler_line::Model> {
    ensure_schedule(db, new.schedule_id).await?;
    ensure_room(db, new.room_id).await?;
    ensure_timeslot(db, new.timeslot_id).await?;
    // Also validates the course and teacher references
    let name = derive_line_name(db, new.course_id, new.teacher_id).await?;

    let line = scheduler_line::ActiveModel {
        name: Set(name),
        schedule_id: Set(new.schedule_id),
        date: Set(new.date),
        course_id: Set(new.course_id),
        room_id: Set(new.room_id),
        teacher_id: Set(new.teacher_id),
        timeslot_id: Set(new.timeslot_id),
        active: Set(true),
        ..Default::default()
    };

    let created = line.insert(db).await?;
    info!("Created scheduler line '{}' ({})", created.name, created.id);
    Ok(created)
}

/// Finds a line by id.
pub async fn get_scheduler_line_by_id<C>(db: &C, line_id: i64) -> Result<Option<scheduler_line::Model>>
where
    C: ConnectionTrait,
{
    SchedulerLine::find_by_id(line_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`get_scheduler_line_by_id`], but a missing line is an error.
pub async fn require_scheduler_line<C>(db: &C, line_id: i64) -> Result<scheduler_line::Model>
where
    C: ConnectionTrait,
{
    get_scheduler_line_by_id(db, line_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "SchedulerLine",
            id: line_id,
        })
}

/// Applies a partial update; the label is re-derived when the course or
/// teacher changes.
pub async fn update_scheduler_line(
    db: &DatabaseConnection,
    line_id: i64,
    changes: SchedulerLineChanges,
) -> Result<scheduler_line::Model> {
    let current = require_scheduler_line(db, line_id).await?;
    let relabel = changes.course_id.is_some() || changes.teacher_id.is_some();
    let course_id = changes.course_id.unwrap_or(current.course_id);
    let teacher_id = changes.teacher_id.unwrap_or(current.teacher_id);

    let mut line: scheduler_line::ActiveModel = current.into();

    if let Some(date) = changes.date {
        line.date = Set(date);
    }
    if let Some(schedule_id) = changes.schedule_id {
        ensure_schedule(db, schedule_id).await?;
        line.schedule_id = Set(schedule_id);
    }
    if let Some(room_id) = changes.room_id {
        ensure_room(db, room_id).await?;
        line.room_id = Set(room_id);
    }
    if let Some(timeslot_id) = changes.timeslot_id {
        ensure_timeslot(db, timeslot_id).await?;
        line.timeslot_id = Set(timeslot_id);
    }
    if relabel {
        line.name = Set(derive_line_name(db, course_id, teacher_id).await?);
        line.course_id = Set(course_id);
        line.teacher_id = Set(teacher_id);
    }

    if !line.is_changed() {
        return require_scheduler_line(db, line_id).await;
    }

    line.update(db).await.map_err(Into::into)
}

/// Points a line at another course (or none) and relabels it.
pub async fn set_line_course(
    db: &DatabaseConnection,
    line_id: i64,
    course_id: Option<i64>,
) -> Result<scheduler_line::Model> {
    update_scheduler_line(
        db,
        line_id,
        SchedulerLineChanges {
            course_id: Some(course_id),
            ..Default::default()
        },
    )
    .await
}

/// Assigns another teacher (or none) to a line and relabels it.
pub async fn set_line_teacher(
    db: &DatabaseConnection,
    line_id: i64,
    teacher_id: Option<i64>,
) -> Result<scheduler_line::Model> {
    update_scheduler_line(
        db,
        line_id,
        SchedulerLineChanges {
            teacher_id: Some(teacher_id),
            ..Default::default()
        },
    )
    .await
}

/// Archives or restores a line.
pub async fn set_scheduler_line_active(
    db: &DatabaseConnection,
    line_id: i64,
    active: bool,
) -> Result<scheduler_line::Model> {
    let mut line: scheduler_line::ActiveModel = require_scheduler_line(db, line_id).await?.into();
    line.active = Set(active);
    line.update(db).await.map_err(Into::into)
}

/// Deletes a line and its invigilator assignments.
pub async fn delete_scheduler_line(db: &DatabaseConnection, line_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    require_scheduler_line(&txn, line_id).await?;
    SchedulerLineInvigilator::delete_many()
        .filter(scheduler_line_invigilator::Column::SchedulerLineId.eq(line_id))
        .exec(&txn)
        .await?;
    SchedulerLine::delete_by_id(line_id).exec(&txn).await?;

    txn.commit().await?;
    info!("Deleted scheduler line {}", line_id);
    Ok(())
}

/// Adds an invigilator to a line. Adding the same employee twice is a no-op.
pub async fn add_invigilator(db: &DatabaseConnection, line_id: i64, employee_id: i64) -> Result<()> {
    require_scheduler_line(db, line_id).await?;
    Employee::find_by_id(employee_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Employee",
            id: employee_id,
        })?;

    if SchedulerLineInvigilator::find_by_id((line_id, employee_id))
        .one(db)
        .await?
        .is_some()
    {
        debug!("Employee {} already invigilates line {}", employee_id, line_id);
        return Ok(());
    }

    scheduler_line_invigilator::ActiveModel {
        scheduler_line_id: Set(line_id),
        employee_id: Set(employee_id),
    }
    .insert(db)
    .await?;
    Ok(())
}

/// Removes an invigilator from a line, if assigned.
pub async fn remove_invigilator(
    db: &DatabaseConnection,
    line_id: i64,
    employee_id: i64,
) -> Result<()> {
    SchedulerLineInvigilator::delete_by_id((line_id, employee_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Lists the invigilators of a line, ordered by name.
pub async fn get_invigilators<C>(db: &C, line_id: i64) -> Result<Vec<employee::Model>>
where
    C: ConnectionTrait,
{
    let employee_ids: Vec<i64> = SchedulerLineInvigilator::find()
        .filter(scheduler_line_invigilator::Column::SchedulerLineId.eq(line_id))
        .all(db)
        .await?
        .into_iter()
        .map(|rel| rel.employee_id)
        .collect();

    if employee_ids.is_empty() {
        return Ok(Vec::new());
    }

    Employee::find()
        .filter(employee::Column::Id.is_in(employee_ids))
        .order_by_asc(employee::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn find_active_lines(
    db: &DatabaseConnection,
    column: scheduler_line::Column,
    id: i64,
) -> Result<Vec<scheduler_line::Model>> {
    SchedulerLine::find()
        .filter(column.eq(id))
        .filter(scheduler_line::Column::Active.eq(true))
        .order_by_asc(scheduler_line::Column::Date)
        .order_by_asc(scheduler_line::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Active lines of a schedule, by date.
pub async fn get_lines_for_schedule(
    db: &DatabaseConnection,
    schedule_id: i64,
) -> Result<Vec<scheduler_line::Model>> {
    find_active_lines(db, scheduler_line::Column::ScheduleId, schedule_id).await
}

/// Active lines taught by an employee, by date.
pub async fn get_lines_for_teacher(
    db: &DatabaseConnection,
    employee_id: i64,
) -> Result<Vec<scheduler_line::Model>> {
    find_active_lines(db, scheduler_line::Column::TeacherId, employee_id).await
}

/// Active lines held in a room, by date.
pub async fn get_lines_for_room(
    db: &DatabaseConnection,
    room_id: i64,
) -> Result<Vec<scheduler_line::Model>> {
    find_active_lines(db, scheduler_line::Column::RoomId, room_id).await
}

/// Active lines of a course, by date.
pub async fn get_lines_for_course(
    db: &DatabaseConnection,
    course_id: i64,
) -> Result<Vec<scheduler_line::Model>> {
    find_active_lines(db, scheduler_line::Column::CourseId, course_id).await
}

/// Active lines in a timeslot, by date.
pub async fn get_lines_for_timeslot(
    db: &DatabaseConnection,
    timeslot_id: i64,
) -> Result<Vec<scheduler_line::Model>> {
    find_active_lines(db, scheduler_line::Column::TimeslotId, timeslot_id).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::{course::rename_course, employee::rename_employee},
        test_utils::*,
    };

    #[test]
    fn test_compose_line_name() {
        assert_eq!(
            compose_line_name(Some("Calculus I"), Some("Dr. Saleem")),
            "Calculus I - Dr. Saleem"
        );
        assert_eq!(compose_line_name(Some("Calculus I"), None), "Calculus I - ");
        assert_eq!(compose_line_name(None, None), " - ");
    }

    #[tokio::test]
    async fn test_create_line_derives_name() -> Result<()> {
        let fixture = setup_with_line().await?;

        assert_eq!(fixture.line.name, "Data Structures - Dr. Saleem");
        assert!(fixture.line.active);
        assert_eq!(fixture.line.room_id, Some(fixture.room.id));
        assert_eq!(fixture.line.timeslot_id, Some(fixture.timeslot.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_line_rejects_missing_references() -> Result<()> {
        let db = setup_test_db().await?;
        let date = NaiveDate::from_ymd_opt(2024, 12, 2).unwrap();

        let mut new = NewSchedulerLine::on(date);
        new.course_id = Some(77);
        let result = create_scheduler_line(&db, new).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "Course", id: 77 }
        ));

        let mut new = NewSchedulerLine::on(date);
        new.room_id = Some(5);
        let result = create_scheduler_line(&db, new).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "Room", id: 5 }
        ));

        let line = create_scheduler_line(&db, NewSchedulerLine::on(date)).await?;
        assert_eq!(line.name, " - ");

        Ok(())
    }

    #[tokio::test]
    async fn test_name_follows_reference_changes() -> Result<()> {
        let fixture = setup_with_line().await?;
        let db = &fixture.db;
        let other_course = create_test_course(db, "Algorithms", "CS-301").await?;
        let other_teacher = create_test_employee(db, "Ms. Hira").await?;

        let line = set_line_course(db, fixture.line.id, Some(other_course.id)).await?;
        assert_eq!(line.name, "Algorithms - Dr. Saleem");

        let line = set_line_teacher(db, fixture.line.id, Some(other_teacher.id)).await?;
        assert_eq!(line.name, "Algorithms - Ms. Hira");

        let line = set_line_teacher(db, fixture.line.id, None).await?;
        assert_eq!(line.name, "Algorithms - ");
        assert!(line.teacher_id.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_name_follows_renames() -> Result<()> {
        let fixture = setup_with_line().await?;
        let db = &fixture.db;

        rename_course(db, fixture.course.id, "Advanced Data Structures").await?;
        let line = require_scheduler_line(db, fixture.line.id).await?;
        assert_eq!(line.name, "Advanced Data Structures - Dr. Saleem");

        rename_employee(db, fixture.teacher.id, "Prof. Saleem").await?;
        let line = require_scheduler_line(db, fixture.line.id).await?;
        assert_eq!(line.name, "Advanced Data Structures - Prof. Saleem");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_line_without_relabel() -> Result<()> {
        let fixture = setup_with_line().await?;
        let db = &fixture.db;
        let new_date = NaiveDate::from_ymd_opt(2024, 12, 9).unwrap();

        let line = update_scheduler_line(
            db,
            fixture.line.id,
            SchedulerLineChanges {
                date: Some(new_date),
                room_id: Some(None),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(line.date, new_date);
        assert!(line.room_id.is_none());
        assert_eq!(line.name, fixture.line.name);

        Ok(())
    }

    #[tokio::test]
    async fn test_double_booking_is_stored() -> Result<()> {
        let fixture = setup_with_line().await?;
        let db = &fixture.db;

        let mut clash = NewSchedulerLine::on(fixture.line.date);
        clash.room_id = fixture.line.room_id;
        clash.teacher_id = fixture.line.teacher_id;
        clash.timeslot_id = fixture.line.timeslot_id;
        create_scheduler_line(db, clash).await?;

        let lines = get_lines_for_room(db, fixture.room.id).await?;
        assert_eq!(lines.len(), 2);
        let lines = get_lines_for_teacher(db, fixture.teacher.id).await?;
        assert_eq!(lines.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_invigilators() -> Result<()> {
        let fixture = setup_with_line().await?;
        let db = &fixture.db;
        let first = create_test_employee(db, "Zafar").await?;
        let second = create_test_employee(db, "Anum").await?;

        add_invigilator(db, fixture.line.id, first.id).await?;
        add_invigilator(db, fixture.line.id, second.id).await?;
        add_invigilator(db, fixture.line.id, second.id).await?;

        let invigilators = get_invigilators(db, fixture.line.id).await?;
        assert_eq!(invigilators.len(), 2);
        assert_eq!(invigilators[0].name, "Anum");

        remove_invigilator(db, fixture.line.id, second.id).await?;
        let invigilators = get_invigilators(db, fixture.line.id).await?;
        assert_eq!(invigilators.len(), 1);
        assert_eq!(invigilators[0].id, first.id);

        let result = add_invigilator(db, fixture.line.id, 999).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_relationship_listings() -> Result<()> {
        let fixture = setup_with_line().await?;
        let db = &fixture.db;

        assert_eq!(get_lines_for_schedule(db, fixture.schedule.id).await?.len(), 1);
        assert_eq!(get_lines_for_course(db, fixture.course.id).await?.len(), 1);
        assert_eq!(get_lines_for_timeslot(db, fixture.timeslot.id).await?.len(), 1);

        set_scheduler_line_active(db, fixture.line.id, false).await?;
        assert!(get_lines_for_schedule(db, fixture.schedule.id).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_line_removes_invigilators() -> Result<()> {
        let fixture = setup_with_line().await?;
        let db = &fixture.db;
        let invigilator = create_test_employee(db, "Zafar").await?;
        add_invigilator(db, fixture.line.id, invigilator.id).await?;

        delete_scheduler_line(db, fixture.line.id).await?;

        assert!(get_scheduler_line_by_id(db, fixture.line.id).await?.is_none());
        assert!(SchedulerLineInvigilator::find().all(db).await?.is_empty());

        Ok(())
    }
}
