//! General Discord commands - ping and help.
//! These commands don't touch the database.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**CMS Help**\n\
        Here is a summary of all available commands.\n\n\
        **Student Records**\n\
        • `/student add <name> <father_name> <registration_no> <gender> [admission_date] [date_of_birth] [department]` - Registers a student as draft.\n\
        • `/student info <registration_no>` - Shows a student's record.\n\
        • `/student list [state]` - Lists students, optionally by state.\n\n\
        **Approval Workflow**\n\
        • `/student verify <registration_no>` - Marks a student as verified.\n\
        • `/student approve <registration_no>` - Approves a student and issues an admission number.\n\
        • `/student cancel <registration_no>` - Cancels a student.\n\
        • `/student draft <registration_no>` - Resets a student to draft.\n\n\
        **Exams**\n\
        • `/exam lines <schedule>` - Lists the sittings of an exam schedule.\n\
        • `/exam slip <line_id>` - Prints the exam slip of a sitting.\n\n\
        **Utility Commands**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
