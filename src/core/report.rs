//! Exam-slip report for a single scheduler line.
//!
//! The report layer only gathers data: [`render_scheduler_line_report`] loads
//! the line with everything it references, wraps it in a [`ReportDocArgs`] bag
//! and hands it to a [`TemplateRenderer`] under a template name. How the
//! output looks is up to the renderer.

use crate::{
    core::{
        employee::get_employee_by_id,
        facility::get_room_by_id,
        schedule::{get_schedule_by_id, get_timeslot_by_id},
        scheduler_line::{get_invigilators, require_scheduler_line},
    },
    entities::{Block, course, employee, room, schedule, scheduler_line, timeslot},
    errors::{Error, Result},
};
use sea_orm::prelude::*;
use serde::Serialize;
use std::fmt::Write;

/// Template name of the exam-slip report.
pub const SCHEDULER_LINE_REPORT: &str = "cms_student.scheduler_line_report";

/// A scheduler line with its referenced records resolved.
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerLineDetail {
    /// The sitting itself
    pub line: scheduler_line::Model,
    /// Exam schedule
    pub schedule: Option<schedule::Model>,
    /// Course examined
    pub course: Option<course::Model>,
    /// Room
    pub room: Option<room::Model>,
    /// Name of the block the room is in
    pub block_name: Option<String>,
    /// Instructor
    pub teacher: Option<employee::Model>,
    /// Time of day
    pub timeslot: Option<timeslot::Model>,
    /// Invigilating employees, by name
    pub invigilators: Vec<employee::Model>,
}

/// Data bag handed to a template.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocArgs {
    /// The record being reported on
    pub data: SchedulerLineDetail,
}

/// Renders named templates from a data bag.
pub trait TemplateRenderer {
    /// Renders `template` with `docargs`.
    ///
    /// # Errors
    /// Returns [`Error::Render`] for unknown templates or rendering failures.
    fn render(&self, template: &str, docargs: &ReportDocArgs) -> Result<String>;
}

/// Loads a line together with everything it references.
pub async fn load_scheduler_line_detail<C>(db: &C, line_id: i64) -> Result<SchedulerLineDetail>
where
    C: ConnectionTrait,
{
    let line = require_scheduler_line(db, line_id).await?;

    let schedule = match line.schedule_id {
        Some(id) => get_schedule_by_id(db, id).await?,
        None => None,
    };
    let course = match line.course_id {
        Some(id) => crate::core::course::get_course_by_id(db, id).await?,
        None => None,
    };
    let room = match line.room_id {
        Some(id) => get_room_by_id(db, id).await?,
        None => None,
    };
    let block_name = match &room {
        Some(room) => Block::find_by_id(room.block_id)
            .one(db)
            .await?
            .map(|block| block.name),
        None => None,
    };
    let teacher = match line.teacher_id {
        Some(id) => get_employee_by_id(db, id).await?,
        None => None,
    };
    let timeslot = match line.timeslot_id {
        Some(id) => get_timeslot_by_id(db, id).await?,
        None => None,
    };
    let invigilators = get_invigilators(db, line.id).await?;

    Ok(SchedulerLineDetail {
        line,
        schedule,
        course,
        room,
        block_name,
        teacher,
        timeslot,
        invigilators,
    })
}

/// Renders the exam-slip report for the line with the given id.
///
/// # Errors
/// Returns [`Error::NotFound`] when the line does not exist, or whatever the
/// renderer reports.
pub async fn render_scheduler_line_report<R>(
    db: &DatabaseConnection,
    renderer: &R,
    line_id: i64,
) -> Result<String>
where
    R: TemplateRenderer + Sync + ?Sized,
{
    let data = load_scheduler_line_detail(db, line_id).await?;
    let docargs = ReportDocArgs { data };
    renderer.render(SCHEDULER_LINE_REPORT, &docargs)
}

/// Built-in renderer producing a plain-text exam slip.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRenderer;

impl PlainTextRenderer {
    fn exam_slip(detail: &SchedulerLineDetail) -> Result<String> {
        const UNSET: &str = "-";
        let mut slip = String::new();

        writeln!(slip, "**Exam Slip: {}**", detail.line.name)?;
        writeln!(
            slip,
            "Exam: {}",
            detail.schedule.as_ref().map_or(UNSET, |s| s.name.as_str())
        )?;
        writeln!(slip, "Date: {}", detail.line.date.format("%Y-%m-%d"))?;
        writeln!(
            slip,
            "Time: {}",
            detail.timeslot.as_ref().map_or(UNSET, |t| t.name.as_str())
        )?;
        let course = detail
            .course
            .as_ref()
            .map_or_else(|| UNSET.to_string(), |c| format!("{} ({})", c.name, c.code));
        writeln!(slip, "Course: {course}")?;
        let room = match (&detail.room, &detail.block_name) {
            (Some(room), Some(block)) => {
                format!("{}, {block} (capacity {})", room.name, room.room_capacity)
            }
            (Some(room), None) => format!("{} (capacity {})", room.name, room.room_capacity),
            (None, _) => UNSET.to_string(),
        };
        writeln!(slip, "Room: {room}")?;
        writeln!(
            slip,
            "Instructor: {}",
            detail.teacher.as_ref().map_or(UNSET, |t| t.name.as_str())
        )?;

        let invigilators = if detail.invigilators.is_empty() {
            UNSET.to_string()
        } else {
            detail
                .invigilators
                .iter()
                .map(|e| e.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(slip, "Invigilators: {invigilators}")?;

        Ok(slip)
    }
}

impl TemplateRenderer for PlainTextRenderer {
    fn render(&self, template: &str, docargs: &ReportDocArgs) -> Result<String> {
        match template {
            SCHEDULER_LINE_REPORT => Self::exam_slip(&docargs.data),
            other => Err(Error::Render {
                template: other.to_string(),
                message: "unknown template".to_string(),
            }),
        }
    }
}
