//! Student approval workflow.
//!
//! Four states, `draft`, `verified`, `approved` and `cancelled`, each reachable
//! from any other through its own `set_to_*` operation. The only guard is on
//! approval, which needs an admission date and issues the admission number.
//!
//! Approving an already approved student draws a fresh sequence value and
//! overwrites the previous admission number.

use crate::{
    core::{
        sequence::{STUDENT_SEQUENCE_CODE, SequenceGenerator},
        student::require_student,
    },
    entities::{StudentState, student},
    errors::{Error, Result},
};
use chrono::Datelike;
use sea_orm::{Set, prelude::*};
use tracing::{info, warn};

async fn transition(
    db: &DatabaseConnection,
    student_id: i64,
    state: StudentState,
) -> Result<student::Model> {
    let current = require_student(db, student_id).await?;
    let previous = current.state;

    let mut student: student::ActiveModel = current.into();
    student.state = Set(state);
    let updated = student.update(db).await?;

    info!(
        "Student {} moved from {} to {}",
        student_id,
        previous.label(),
        state.label()
    );
    Ok(updated)
}

/// Resets a student to `draft`.
pub async fn set_to_draft(db: &DatabaseConnection, student_id: i64) -> Result<student::Model> {
    transition(db, student_id, StudentState::Draft).await
}

/// Marks a student as `verified`.
pub async fn set_to_verified(db: &DatabaseConnection, student_id: i64) -> Result<student::Model> {
    transition(db, student_id, StudentState::Verified).await
}

/// Approves a student and issues an admission number.
///
/// The admission number is `"<admission year>-<next value of cms.student.code>"`.
///
/// # Errors
/// Returns [`Error::Validation`] naming the student when no admission date is
/// set; the record is left untouched in that case.
pub async fn set_to_approved<S>(
    db: &DatabaseConnection,
    sequence: &S,
    student_id: i64,
) -> Result<student::Model>
where
    S: SequenceGenerator + Sync,
{
    let current = require_student(db, student_id).await?;

    let Some(admission_date) = current.admission_date else {
        warn!(
            "Refusing to approve student {} without an admission date",
            student_id
        );
        return Err(Error::validation(format!(
            "Please enter admission date for student {}",
            current.name
        )));
    };

    let number = sequence.next_by_code(STUDENT_SEQUENCE_CODE).await?;
    let admission_no = format!("{}-{}", admission_date.year(), number);

    if let Some(previous) = &current.admission_no {
        warn!(
            "Student {} already had admission number {}, replacing it with {}",
            student_id, previous, admission_no
        );
    }

    let mut student: student::ActiveModel = current.into();
    student.admission_no = Set(Some(admission_no.clone()));
    student.state = Set(StudentState::Approved);
    let updated = student.update(db).await?;

    info!(
        "Approved student {} with admission number {}",
        student_id, admission_no
    );
    Ok(updated)
}

/// Marks a student as `cancelled`.
pub async fn set_to_cancelled(db: &DatabaseConnection, student_id: i64) -> Result<student::Model> {
    transition(db, student_id, StudentState::Cancelled).await
}
