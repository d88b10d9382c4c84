//! Shared test utilities for the CMS.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.

use crate::{
    core::{
        course, department,
        employee::{self, NewEmployee},
        facility, schedule,
        scheduler_line::{self, NewSchedulerLine},
        student::{self, NewStudent},
    },
    entities::{self, Gender},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Admission date given to every test student.
pub fn test_admission_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 9, 1).unwrap_or_default()
}

/// Creates a test department.
pub async fn create_test_department(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::department::Model> {
    department::create_department(db, name).await
}

/// Creates a draft test student.
///
/// # Defaults
/// * `father_name`: `"Test Father"`
/// * `registration_no`: `"REG-<name>"`
/// * `gender`: male
/// * `admission_date`: 2023-09-01
pub async fn create_test_student(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::student::Model> {
    let mut new = NewStudent::new(name, "Test Father", format!("REG-{name}"), Gender::Male);
    new.admission_date = Some(test_admission_date());
    student::create_student(db, new).await
}

/// Creates an active teaching employee with employee number `"EMP-<name>"`.
pub async fn create_test_employee(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::employee::Model> {
    employee::create_employee(
        db,
        NewEmployee::teacher(name, "Test Father", format!("EMP-{name}")),
    )
    .await
}

/// Creates a test course.
pub async fn create_test_course(
    db: &DatabaseConnection,
    name: &str,
    code: &str,
) -> Result<entities::course::Model> {
    course::create_course(db, name, code).await
}

/// Creates a test schedule running 2024-12-02 to 2024-12-13.
pub async fn create_test_schedule(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::schedule::Model> {
    schedule::create_schedule(
        db,
        name,
        NaiveDate::from_ymd_opt(2024, 12, 2),
        NaiveDate::from_ymd_opt(2024, 12, 13),
    )
    .await
}

/// Everything a scheduler line points at, plus the line itself.
pub struct LineFixture {
    pub db: DatabaseConnection,
    pub schedule: entities::schedule::Model,
    pub timeslot: entities::timeslot::Model,
    pub course: entities::course::Model,
    pub teacher: entities::employee::Model,
    pub block: entities::block::Model,
    pub room: entities::room::Model,
    pub line: entities::scheduler_line::Model,
}

/// Sets up a complete exam sitting:
/// "Data Structures" taught by "Dr. Saleem" in room A-101 of "A Block",
/// during the 9.0 - 11.0 slot of "Fall Finals" on 2024-12-02.
pub async fn setup_with_line() -> Result<LineFixture> {
    let db = setup_test_db().await?;
    let schedule = create_test_schedule(&db, "Fall Finals").await?;
    let timeslot = schedule::create_timeslot(&db, Some(schedule.id), 9.0, 11.0).await?;
    let course = create_test_course(&db, "Data Structures", "CS-201").await?;
    let teacher = create_test_employee(&db, "Dr. Saleem").await?;
    let block = facility::create_block(&db, "A Block").await?;
    let room = facility::create_room(&db, block.id, "A-101", 40).await?;

    let line = scheduler_line::create_scheduler_line(
        &db,
        NewSchedulerLine {
            date: schedule.start_date,
            schedule_id: Some(schedule.id),
            course_id: Some(course.id),
            room_id: Some(room.id),
            teacher_id: Some(teacher.id),
            timeslot_id: Some(timeslot.id),
        },
    )
    .await?;

    Ok(LineFixture {
        db,
        schedule,
        timeslot,
        course,
        teacher,
        block,
        room,
        line,
    })
}
