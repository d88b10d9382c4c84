//! Student Discord commands - registration, lookup and the approval workflow.
//!
//! Every subcommand addresses a student by registration number; the workflow
//! subcommands mirror the draft / verify / approve / cancel buttons of the
//! student form.

use crate::errors::{Error, Result};
use chrono::NaiveDate;

/// Parses a `YYYY-MM-DD` date typed into a command option.
fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| Error::validation(format!("'{value}' is not a date in YYYY-MM-DD form")))
}

fn parse_optional_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
    value.map(parse_date).transpose()
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::parse_optional_date;
    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{department, sequence::DbSequence, student, workflow},
        entities::{Gender, StudentState, student as student_entity},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum GenderChoice {
        Male,
        Female,
    }

    impl From<GenderChoice> for Gender {
        fn from(choice: GenderChoice) -> Self {
            match choice {
                GenderChoice::Male => Self::Male,
                GenderChoice::Female => Self::Female,
            }
        }
    }

    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum StateChoice {
        Draft,
        Verified,
        Approved,
        Cancelled,
    }

    impl From<StateChoice> for StudentState {
        fn from(choice: StateChoice) -> Self {
            match choice {
                StateChoice::Draft => Self::Draft,
                StateChoice::Verified => Self::Verified,
                StateChoice::Approved => Self::Approved,
                StateChoice::Cancelled => Self::Cancelled,
            }
        }
    }

    const fn state_emoji(state: StudentState) -> &'static str {
        match state {
            StudentState::Draft => "📝",
            StudentState::Verified => "🔎",
            StudentState::Approved => "✅",
            StudentState::Cancelled => "🚫",
        }
    }

    /// Looks the student up and tells the user when there is none.
    async fn find_student(
        ctx: poise::Context<'_, BotData, Error>,
        registration_no: &str,
    ) -> Result<Option<student_entity::Model>> {
        let db = &ctx.data().database;
        let found = student::get_student_by_registration_no(db, registration_no).await?;
        if found.is_none() {
            ctx.say(format!(
                "❌ No active student with registration number '{registration_no}'."
            ))
            .await?;
        }
        Ok(found)
    }

    /// Reports the outcome of a workflow step. Validation failures go back to
    /// the user; anything else is a command error.
    async fn reply_transition(
        ctx: poise::Context<'_, BotData, Error>,
        outcome: Result<student_entity::Model>,
    ) -> Result<()> {
        match outcome {
            Ok(updated) => {
                let mut message = format!(
                    "{} **{}** ({}) is now **{}**.",
                    state_emoji(updated.state),
                    updated.name,
                    updated.registration_no,
                    updated.state.label()
                );
                if let (StudentState::Approved, Some(admission_no)) =
                    (updated.state, &updated.admission_no)
                {
                    write!(message, " Admission number: `{admission_no}`")?;
                }
                ctx.say(message).await?;
                Ok(())
            }
            Err(Error::Validation { message }) => {
                ctx.say(format!("❌ {message}")).await?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Student records and the approval workflow.
    #[poise::command(
        slash_command,
        prefix_command,
        subcommands("add", "info", "list", "verify", "approve", "cancel", "draft"),
        subcommand_required
    )]
    pub async fn student(_ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        Ok(())
    }

    /// Registers a new student in the draft state.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, prefix_command)]
    pub async fn add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student name"] name: String,
        #[description = "Father's name"] father_name: String,
        #[description = "Registration number"] registration_no: String,
        #[description = "Gender"] gender: GenderChoice,
        #[description = "Admission date (YYYY-MM-DD, defaults to today)"]
        admission_date: Option<String>,
        #[description = "Date of birth (YYYY-MM-DD)"] date_of_birth: Option<String>,
        #[description = "Department"]
        #[autocomplete = "autocomplete::autocomplete_department_name"]
        department: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let dates = parse_optional_date(admission_date.as_deref()).and_then(|admission| {
            parse_optional_date(date_of_birth.as_deref()).map(|birth| (admission, birth))
        });
        let (admission_date, date_of_birth) = match dates {
            Ok(dates) => dates,
            Err(Error::Validation { message }) => {
                ctx.say(format!("❌ {message}")).await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let department_id = if let Some(department_name) = department {
            let Some(found) = department::get_department_by_name(db, &department_name).await?
            else {
                ctx.say(format!("❌ Department '{department_name}' not found."))
                    .await?;
                return Ok(());
            };
            Some(found.id)
        } else {
            None
        };

        let mut new = student::NewStudent::new(name, father_name, registration_no, gender.into());
        if admission_date.is_some() {
            new.admission_date = admission_date;
        }
        new.date_of_birth = date_of_birth;
        new.department_id = department_id;
        new.user_id = Some(ctx.author().id.to_string());

        match student::create_student(db, new).await {
            Ok(created) => {
                ctx.say(format!(
                    "📝 Registered **{}** ({}) as draft.",
                    created.name, created.registration_no
                ))
                .await?;
                Ok(())
            }
            Err(Error::Validation { message }) => {
                ctx.say(format!("❌ {message}")).await?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Shows a student's record.
    #[poise::command(slash_command, prefix_command)]
    pub async fn info(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Registration number"]
        #[autocomplete = "autocomplete::autocomplete_registration_no"]
        registration_no: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(record) = find_student(ctx, &registration_no).await? else {
            return Ok(());
        };

        let department_name = match record.department_id {
            Some(id) => department::get_department_by_id(db, id)
                .await?
                .map(|d| d.name),
            None => None,
        };
        let teachers = student::get_student_employees(db, record.id).await?;

        let mut details = String::new();
        writeln!(details, "**Father:** {}", record.father_name)?;
        writeln!(details, "**Gender:** {:?}", record.gender)?;
        writeln!(
            details,
            "**Department:** {}",
            department_name.as_deref().unwrap_or("-")
        )?;
        writeln!(details, "**Age:** {}", record.age())?;
        if let Some(admission_date) = record.admission_date {
            writeln!(details, "**Admitted:** {}", admission_date.format("%Y-%m-%d"))?;
        }
        if let Some(grad_date) = record.grad_date {
            writeln!(details, "**Graduates:** {grad_date}")?;
        }
        writeln!(
            details,
            "**Admission No:** {}",
            record.admission_no.as_deref().unwrap_or("-")
        )?;
        if !teachers.is_empty() {
            let names: Vec<_> = teachers.iter().map(|t| t.name.as_str()).collect();
            writeln!(details, "**Teachers:** {}", names.join(", "))?;
        }
        if let Some(remark) = record.remark.as_deref().filter(|r| !r.is_empty()) {
            writeln!(details, "**Remark:** {remark}")?;
        }

        let embed = serenity::CreateEmbed::default()
            .title(format!(
                "{} {} ({})",
                state_emoji(record.state),
                record.name,
                record.registration_no
            ))
            .description(details)
            .color(0x0034_98DB)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "State: {}",
                record.state.label()
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Lists active students, optionally only those in one state.
    #[poise::command(slash_command, prefix_command)]
    pub async fn list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only students in this state"] state: Option<StateChoice>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let students = match state {
            Some(choice) => student::get_students_by_state(db, choice.into()).await?,
            None => student::get_all_active_students(db).await?,
        };

        if students.is_empty() {
            ctx.say("📋 No students found.").await?;
            return Ok(());
        }

        let mut body = String::new();
        for record in &students {
            writeln!(
                body,
                "{} **{}** ({}) - {}",
                state_emoji(record.state),
                record.name,
                record.registration_no,
                record.admission_no.as_deref().unwrap_or(record.state.label())
            )?;
        }

        ctx.say(format!("📋 **Students ({})**\n{body}", students.len()))
            .await?;
        Ok(())
    }

    /// Marks a student as verified.
    #[poise::command(slash_command, prefix_command)]
    pub async fn verify(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Registration number"]
        #[autocomplete = "autocomplete::autocomplete_registration_no"]
        registration_no: String,
    ) -> Result<()> {
        let Some(record) = find_student(ctx, &registration_no).await? else {
            return Ok(());
        };
        let outcome = workflow::set_to_verified(&ctx.data().database, record.id).await;
        reply_transition(ctx, outcome).await
    }

    /// Approves a student and issues an admission number.
    #[poise::command(slash_command, prefix_command)]
    pub async fn approve(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Registration number"]
        #[autocomplete = "autocomplete::autocomplete_registration_no"]
        registration_no: String,
    ) -> Result<()> {
        let Some(record) = find_student(ctx, &registration_no).await? else {
            return Ok(());
        };
        let db = &ctx.data().database;
        let sequence = DbSequence::new(db);
        let outcome = workflow::set_to_approved(db, &sequence, record.id).await;
        reply_transition(ctx, outcome).await
    }

    /// Cancels a student.
    #[poise::command(slash_command, prefix_command)]
    pub async fn cancel(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Registration number"]
        #[autocomplete = "autocomplete::autocomplete_registration_no"]
        registration_no: String,
    ) -> Result<()> {
        let Some(record) = find_student(ctx, &registration_no).await? else {
            return Ok(());
        };
        let outcome = workflow::set_to_cancelled(&ctx.data().database, record.id).await;
        reply_transition(ctx, outcome).await
    }

    /// Resets a student to draft.
    #[poise::command(slash_command, prefix_command)]
    pub async fn draft(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Registration number"]
        #[autocomplete = "autocomplete::autocomplete_registration_no"]
        registration_no: String,
    ) -> Result<()> {
        let Some(record) = find_student(ctx, &registration_no).await? else {
            return Ok(());
        };
        let outcome = workflow::set_to_draft(&ctx.data().database, record.id).await;
        reply_transition(ctx, outcome).await
    }
}

// Re-export all commands
pub use inner::*;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_date_accepts_iso_dates() {
        assert_eq!(
            parse_date(" 2023-09-01 ").unwrap(),
            NaiveDate::from_ymd_opt(2023, 9, 1).unwrap()
        );
        assert_eq!(parse_optional_date(None).unwrap(), None);
    }

    #[test]
    fn test_parse_date_rejects_other_forms() {
        let err = parse_date("01/09/2023").unwrap_err();
        assert!(matches!(err, Error::Validation { message } if message.contains("01/09/2023")));
    }
}
