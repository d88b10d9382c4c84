//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions are drawn from the database and capped at Discord's limit of
//! 25 choices.

use crate::{
    bot::BotData,
    core::{department, schedule, student},
    errors::Error,
};

/// Discord autocomplete limit.
const MAX_SUGGESTIONS: usize = 25;

/// Case-insensitive substring filter shared by the handlers below.
fn matching(candidates: impl IntoIterator<Item = String>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    let mut matched: Vec<String> = candidates
        .into_iter()
        .filter(|candidate| candidate.to_lowercase().contains(&partial_lower))
        .take(MAX_SUGGESTIONS)
        .collect();
    matched.sort();
    matched
}

/// Suggests registration numbers of active students.
///
/// Matches either the registration number or the student's name, but always
/// returns the registration number so it fits the command parameter.
pub async fn autocomplete_registration_no(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;
    let Ok(students) = student::get_all_active_students(db).await else {
        return Vec::new();
    };

    let partial_lower = partial.to_lowercase();
    let mut matched: Vec<String> = students
        .into_iter()
        .filter(|s| {
            s.registration_no.to_lowercase().contains(&partial_lower)
                || s.name.to_lowercase().contains(&partial_lower)
        })
        .map(|s| s.registration_no)
        .take(MAX_SUGGESTIONS)
        .collect();
    matched.sort();
    matched
}

/// Suggests department names.
pub async fn autocomplete_department_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;
    let Ok(departments) = department::get_all_departments(db).await else {
        return Vec::new();
    };
    matching(departments.into_iter().map(|d| d.name), partial)
}

/// Suggests exam schedule names.
pub async fn autocomplete_schedule_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;
    let Ok(schedules) = schedule::get_all_schedules(db).await else {
        return Vec::new();
    };
    matching(schedules.into_iter().map(|s| s.name), partial)
}
