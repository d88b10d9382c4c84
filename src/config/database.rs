//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated with `Schema::create_table_from_entity`, so the database
//! schema always matches the entity definitions without hand-written SQL.

use crate::entities::{
    Block, Course, Department, Employee, Room, Schedule, SchedulerLine, SchedulerLineInvigilator,
    Sequence, Student, StudentEmployee, TimeSlot,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::debug;

/// Default database location when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/cms.sqlite?mode=rwc";

/// Gets the database URL from the environment or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Connects to the database named by `DATABASE_URL`, falling back to a local
/// `SQLite` file.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    ensure_sqlite_directory(&database_url)?;
    debug!("Connecting to {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates the directory holding a file-backed `SQLite` database.
fn ensure_sqlite_directory(database_url: &str) -> Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let file = rest.split('?').next().unwrap_or(rest);
    if file.is_empty() || file == ":memory:" {
        return Ok(());
    }
    if let Some(parent) = Path::new(file).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Creates every CMS table that does not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // Referenced tables first
    let statements = [
        schema.create_table_from_entity(Department),
        schema.create_table_from_entity(Employee),
        schema.create_table_from_entity(Block),
        schema.create_table_from_entity(Room),
        schema.create_table_from_entity(Course),
        schema.create_table_from_entity(Schedule),
        schema.create_table_from_entity(TimeSlot),
        schema.create_table_from_entity(Student),
        schema.create_table_from_entity(StudentEmployee),
        schema.create_table_from_entity(SchedulerLine),
        schema.create_table_from_entity(SchedulerLineInvigilator),
        schema.create_table_from_entity(Sequence),
    ];

    for mut statement in statements {
        statement.if_not_exists();
        db.execute(builder.build(&statement)).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{StudentModel, scheduler_line};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<StudentModel> = Student::find().limit(1).all(&db).await?;
        let _: Vec<scheduler_line::Model> = SchedulerLine::find().limit(1).all(&db).await?;
        let _ = SchedulerLineInvigilator::find().limit(1).all(&db).await?;
        let _ = Sequence::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_repeatable() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[test]
    fn test_ensure_sqlite_directory_skips_memory_and_other_backends() -> Result<()> {
        ensure_sqlite_directory("sqlite::memory:")?;
        ensure_sqlite_directory("sqlite://:memory:")?;
        ensure_sqlite_directory("postgres://localhost/cms")?;
        ensure_sqlite_directory("sqlite://cms.sqlite?mode=rwc")?;
        Ok(())
    }

    #[test]
    fn test_ensure_sqlite_directory_creates_parent() -> Result<()> {
        let dir = std::env::temp_dir().join(format!("cms-db-test-{}", std::process::id()));
        let url = format!("sqlite://{}/cms.sqlite?mode=rwc", dir.display());
        ensure_sqlite_directory(&url)?;
        assert!(dir.is_dir());
        std::fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn test_default_database_url() {
        assert!(DEFAULT_DATABASE_URL.starts_with("sqlite://"));
    }
}
