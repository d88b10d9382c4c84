//! Exam Discord commands - schedule listings and exam slips.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            report::{self, PlainTextRenderer},
            schedule, scheduler_line,
        },
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Exam schedules and slips.
    #[poise::command(
        slash_command,
        prefix_command,
        subcommands("lines", "slip"),
        subcommand_required
    )]
    pub async fn exam(_ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        Ok(())
    }

    /// Lists the sittings of an exam schedule.
    #[poise::command(slash_command, prefix_command)]
    pub async fn lines(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Exam schedule"]
        #[autocomplete = "autocomplete::autocomplete_schedule_name"]
        schedule_name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let Some(found) = schedule::get_schedule_by_name(db, &schedule_name).await? else {
            ctx.say(format!("❌ Schedule '{schedule_name}' not found."))
                .await?;
            return Ok(());
        };

        let sittings = scheduler_line::get_lines_for_schedule(db, found.id).await?;
        if sittings.is_empty() {
            ctx.say(format!("📅 No sittings scheduled for **{}**.", found.name))
                .await?;
            return Ok(());
        }

        let mut body = format!(
            "📅 **{}** ({} to {})\n",
            found.name,
            found.start_date.format("%Y-%m-%d"),
            found.end_date.format("%Y-%m-%d")
        );
        for line in &sittings {
            let slot = match line.timeslot_id {
                Some(id) => schedule::get_timeslot_by_id(db, id).await?.map(|t| t.name),
                None => None,
            };
            writeln!(
                body,
                "`#{}` {} | {} | {}",
                line.id,
                line.date.format("%Y-%m-%d"),
                slot.as_deref().unwrap_or("-"),
                line.name
            )?;
        }
        write!(body, "\nUse `/exam slip <id>` for the full slip.")?;

        ctx.say(body).await?;
        Ok(())
    }

    /// Prints the exam slip of a sitting.
    #[poise::command(slash_command, prefix_command)]
    pub async fn slip(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Sitting id, as shown by /exam lines"] line_id: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;

        match report::render_scheduler_line_report(db, &PlainTextRenderer, line_id).await {
            Ok(rendered) => {
                ctx.say(rendered).await?;
                Ok(())
            }
            Err(Error::NotFound { .. }) => {
                ctx.say(format!("❌ No sitting with id {line_id}.")).await?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

// Re-export all commands
pub use inner::*;
