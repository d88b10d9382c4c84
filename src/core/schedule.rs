//! Exam schedule and timeslot business logic.
//!
//! Timeslot bounds are decimal hours. The slot's `name` and `duration` are
//! derived from them on every write; a slot ending before it starts is
//! accepted and gets a negative duration.

use crate::{
    entities::{Schedule, SchedulerLine, TimeSlot, schedule, scheduler_line, timeslot},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{debug, info};

/// Renders a decimal hour with at least one fractional digit (9 → "9.0").
#[must_use]
pub fn format_hour(value: f64) -> String {
    format!("{value:?}")
}

/// Builds a timeslot label, `"<start> - <end>"`.
#[must_use]
pub fn timeslot_name(start_time: f64, end_time: f64) -> String {
    format!("{} - {}", format_hour(start_time), format_hour(end_time))
}

/// Length of a timeslot in hours. Not checked for sign.
#[must_use]
pub fn timeslot_duration(start_time: f64, end_time: f64) -> f64 {
    end_time - start_time
}

/// Creates a schedule. Missing dates default to today.
pub async fn create_schedule(
    db: &DatabaseConnection,
    name: &str,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<schedule::Model> {
    if name.trim().is_empty() {
        return Err(Error::validation("Schedule name cannot be empty"));
    }

    let today = Utc::now().date_naive();
    let schedule = schedule::ActiveModel {
        name: Set(name.trim().to_string()),
        start_date: Set(start_date.unwrap_or(today)),
        end_date: Set(end_date.unwrap_or(today)),
        ..Default::default()
    };

    let created = schedule.insert(db).await?;
    info!("Created schedule '{}' ({})", created.name, created.id);
    Ok(created)
}

/// Retrieves all schedules, latest first.
pub async fn get_all_schedules(db: &DatabaseConnection) -> Result<Vec<schedule::Model>> {
    Schedule::find()
        .order_by_desc(schedule::Column::StartDate)
        .order_by_asc(schedule::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a schedule by id.
pub async fn get_schedule_by_id<C>(db: &C, schedule_id: i64) -> Result<Option<schedule::Model>>
where
    C: ConnectionTrait,
{
    Schedule::find_by_id(schedule_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a schedule by its exact name.
pub async fn get_schedule_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<schedule::Model>> {
    Schedule::find()
        .filter(schedule::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Changes the examination period of a schedule.
pub async fn update_schedule_dates(
    db: &DatabaseConnection,
    schedule_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<schedule::Model> {
    let mut schedule: schedule::ActiveModel = get_schedule_by_id(db, schedule_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Schedule",
            id: schedule_id,
        })?
        .into();
    schedule.start_date = Set(start_date);
    schedule.end_date = Set(end_date);
    schedule.update(db).await.map_err(Into::into)
}

/// Deletes a schedule. Its timeslots and lines are kept, detached from it.
pub async fn delete_schedule(db: &DatabaseConnection, schedule_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    get_schedule_by_id(&txn, schedule_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Schedule",
            id: schedule_id,
        })?;

    TimeSlot::update_many()
        .col_expr(timeslot::Column::ScheduleId, Expr::value(Option::<i64>::None))
        .filter(timeslot::Column::ScheduleId.eq(schedule_id))
        .exec(&txn)
        .await?;
    SchedulerLine::update_many()
        .col_expr(scheduler_line::Column::ScheduleId, Expr::value(Option::<i64>::None))
        .filter(scheduler_line::Column::ScheduleId.eq(schedule_id))
        .exec(&txn)
        .await?;
    Schedule::delete_by_id(schedule_id).exec(&txn).await?;

    txn.commit().await?;
    info!("Deleted schedule {}", schedule_id);
    Ok(())
}

/// Creates a timeslot, optionally inside a schedule.
pub async fn create_timeslot(
    db: &DatabaseConnection,
    schedule_id: Option<i64>,
    start_time: f64,
    end_time: f64,
) -> Result<timeslot::Model> {
    if !start_time.is_finite() || !end_time.is_finite() {
        return Err(Error::validation(format!(
            "Timeslot bounds must be numbers (got {start_time} and {end_time})"
        )));
    }
    if let Some(id) = schedule_id {
        get_schedule_by_id(db, id).await?.ok_or(Error::NotFound {
            entity: "Schedule",
            id,
        })?;
    }

    let slot = timeslot::ActiveModel {
        name: Set(timeslot_name(start_time, end_time)),
        start_time: Set(start_time),
        end_time: Set(end_time),
        duration: Set(timeslot_duration(start_time, end_time)),
        schedule_id: Set(schedule_id),
        ..Default::default()
    };

    let created = slot.insert(db).await?;
    debug!("Created timeslot '{}' ({})", created.name, created.id);
    Ok(created)
}

/// Finds a timeslot by id.
pub async fn get_timeslot_by_id<C>(db: &C, timeslot_id: i64) -> Result<Option<timeslot::Model>>
where
    C: ConnectionTrait,
{
    TimeSlot::find_by_id(timeslot_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Moves a timeslot and re-derives its label and duration.
pub async fn update_timeslot_times(
    db: &DatabaseConnection,
    timeslot_id: i64,
    start_time: f64,
    end_time: f64,
) -> Result<timeslot::Model> {
    if !start_time.is_finite() || !end_time.is_finite() {
        return Err(Error::validation(format!(
            "Timeslot bounds must be numbers (got {start_time} and {end_time})"
        )));
    }

    let mut slot: timeslot::ActiveModel = get_timeslot_by_id(db, timeslot_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "TimeSlot",
            id: timeslot_id,
        })?
        .into();
    slot.start_time = Set(start_time);
    slot.end_time = Set(end_time);
    slot.name = Set(timeslot_name(start_time, end_time));
    slot.duration = Set(timeslot_duration(start_time, end_time));
    slot.update(db).await.map_err(Into::into)
}

/// Lists the timeslots of a schedule, earliest first.
pub async fn get_schedule_timeslots(
    db: &DatabaseConnection,
    schedule_id: i64,
) -> Result<Vec<timeslot::Model>> {
    TimeSlot::find()
        .filter(timeslot::Column::ScheduleId.eq(schedule_id))
        .order_by_asc(timeslot::Column::StartTime)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a timeslot; lines in it lose their slot.
pub async fn delete_timeslot(db: &DatabaseConnection, timeslot_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    get_timeslot_by_id(&txn, timeslot_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "TimeSlot",
            id: timeslot_id,
        })?;

    SchedulerLine::update_many()
        .col_expr(scheduler_line::Column::TimeslotId, Expr::value(Option::<i64>::None))
        .filter(scheduler_line::Column::TimeslotId.eq(timeslot_id))
        .exec(&txn)
        .await?;
    TimeSlot::delete_by_id(timeslot_id).exec(&txn).await?;

    txn.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{core::scheduler_line::require_scheduler_line, test_utils::*};

    #[test]
    fn test_timeslot_derivations() {
        assert_eq!(timeslot_name(9.0, 11.0), "9.0 - 11.0");
        assert_eq!(timeslot_name(13.5, 15.25), "13.5 - 15.25");
        assert_eq!(timeslot_duration(9.0, 11.0), 2.0);
        assert_eq!(timeslot_duration(14.0, 12.5), -1.5);
    }

    #[tokio::test]
    async fn test_create_timeslot() -> Result<()> {
        let db = setup_test_db().await?;
        let schedule = create_test_schedule(&db, "Midterms").await?;

        let slot = create_timeslot(&db, Some(schedule.id), 9.0, 11.0).await?;
        assert_eq!(slot.name, "9.0 - 11.0");
        assert_eq!(slot.duration, 2.0);
        assert_eq!(slot.schedule_id, Some(schedule.id));

        let backwards = create_timeslot(&db, None, 16.0, 15.0).await?;
        assert_eq!(backwards.duration, -1.0);

        let result = create_timeslot(&db, Some(999), 9.0, 10.0).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));
        let result = create_timeslot(&db, None, f64::NAN, 10.0).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_timeslot_rederives_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let slot = create_timeslot(&db, None, 9.0, 11.0).await?;

        let moved = update_timeslot_times(&db, slot.id, 14.0, 17.5).await?;
        assert_eq!(moved.name, "14.0 - 17.5");
        assert_eq!(moved.duration, 3.5);

        Ok(())
    }

    #[tokio::test]
    async fn test_schedule_defaults_and_timeslots() -> Result<()> {
        let db = setup_test_db().await?;
        let schedule = create_schedule(&db, "Finals", None, None).await?;
        let today = Utc::now().date_naive();
        assert_eq!(schedule.start_date, today);
        assert_eq!(schedule.end_date, today);

        create_timeslot(&db, Some(schedule.id), 14.0, 16.0).await?;
        create_timeslot(&db, Some(schedule.id), 9.0, 11.0).await?;

        let slots = get_schedule_timeslots(&db, schedule.id).await?;
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].name, "9.0 - 11.0");

        let found = get_schedule_by_name(&db, "Finals").await?.unwrap();
        assert_eq!(found.id, schedule.id);

        let result = create_schedule(&db, "", None, None).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_schedule_keeps_children() -> Result<()> {
        let fixture = setup_with_line().await?;
        let db = &fixture.db;

        delete_schedule(db, fixture.schedule.id).await?;

        let slot = get_timeslot_by_id(db, fixture.timeslot.id).await?.unwrap();
        assert!(slot.schedule_id.is_none());
        let line = require_scheduler_line(db, fixture.line.id).await?;
        assert!(line.schedule_id.is_none());

        delete_timeslot(db, fixture.timeslot.id).await?;
        let line = require_scheduler_line(db, fixture.line.id).await?;
        assert!(line.timeslot_id.is_none());

        Ok(())
    }
}
