//! Named sequences - monotonically increasing counters for issued identifiers.
//!
//! The approval workflow never looks a counter up on its own; it is handed a
//! [`SequenceGenerator`]. [`DbSequence`] keeps the counters in the
//! `cms_sequences` table, [`MemorySequence`] keeps them in process memory.

use crate::{
    entities::{Sequence, sequence},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*, sea_query::Expr};
use std::{collections::HashMap, future::Future, sync::Mutex};
use tracing::{debug, info};

/// Code of the sequence that numbers admitted students.
pub const STUDENT_SEQUENCE_CODE: &str = "cms.student.code";

/// Source of sequence values, looked up by code.
pub trait SequenceGenerator {
    /// Draws the next value of the sequence registered under `code`.
    ///
    /// Every call returns a value no earlier call has returned.
    fn next_by_code(&self, code: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Formats a drawn number with the sequence's prefix and zero padding.
#[must_use]
pub fn format_sequence_value(prefix: &str, padding: i32, value: i64) -> String {
    let width = usize::try_from(padding).unwrap_or(0);
    format!("{prefix}{value:0width$}")
}

/// Sequence generator backed by the `cms_sequences` table.
pub struct DbSequence<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DbSequence<'a> {
    /// Wraps a database connection.
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }
}

impl SequenceGenerator for DbSequence<'_> {
    /// Atomically advances the counter and returns the value it held before.
    ///
    /// The increment is a single `UPDATE ... SET number_next = number_next + number_increment`
    /// so concurrent callers never observe the same value.
    async fn next_by_code(&self, code: &str) -> Result<String> {
        let txn = self.db.begin().await?;

        let current = find_sequence_by_code(&txn, code)
            .await?
            .ok_or_else(|| Error::SequenceNotFound {
                code: code.to_string(),
            })?;

        Sequence::update_many()
            .col_expr(
                sequence::Column::NumberNext,
                Expr::col(sequence::Column::NumberNext)
                    .add(Expr::col(sequence::Column::NumberIncrement)),
            )
            .filter(sequence::Column::Id.eq(current.id))
            .exec(&txn)
            .await?;

        let advanced = Sequence::find_by_id(current.id)
            .one(&txn)
            .await?
            .ok_or_else(|| Error::SequenceNotFound {
                code: code.to_string(),
            })?;

        txn.commit().await?;

        let value = advanced.number_next - advanced.number_increment;
        debug!("Drew value {} from sequence '{}'", value, code);
        Ok(format_sequence_value(&advanced.prefix, advanced.padding, value))
    }
}

/// Process-local sequence generator. Unknown codes start counting at 1.
#[derive(Debug, Default)]
pub struct MemorySequence {
    counters: Mutex<HashMap<String, i64>>,
}

impl MemorySequence {
    /// Creates a generator with no counters; each code starts at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SequenceGenerator for MemorySequence {
    async fn next_by_code(&self, code: &str) -> Result<String> {
        let mut counters = self.counters.lock().map_err(|_| Error::LockPoisoned {
            resource: "sequence counters",
        })?;
        let next = counters.entry(code.to_string()).or_insert(1);
        let value = *next;
        *next += 1;
        Ok(value.to_string())
    }
}

/// Finds the sequence registered under `code`.
pub async fn find_sequence_by_code<C>(db: &C, code: &str) -> Result<Option<sequence::Model>>
where
    C: ConnectionTrait,
{
    Sequence::find()
        .filter(sequence::Column::Code.eq(code))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Registers a sequence under `code` unless one already exists.
///
/// New sequences start at 1 and advance by 1. An existing sequence is returned
/// untouched, so a counter is never reset by re-seeding.
pub async fn ensure_sequence<C>(
    db: &C,
    code: &str,
    prefix: &str,
    padding: i32,
) -> Result<sequence::Model>
where
    C: ConnectionTrait,
{
    if code.trim().is_empty() {
        return Err(Error::validation("Sequence code cannot be empty"));
    }

    if let Some(existing) = find_sequence_by_code(db, code).await? {
        debug!("Sequence '{}' already registered, leaving it as is", code);
        return Ok(existing);
    }

    info!("Registering sequence '{}'", code);
    let sequence = sequence::ActiveModel {
        code: Set(code.to_string()),
        prefix: Set(prefix.to_string()),
        padding: Set(padding.max(0)),
        number_next: Set(1),
        number_increment: Set(1),
        ..Default::default()
    };
    sequence.insert(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_format_sequence_value() {
        assert_eq!(format_sequence_value("", 0, 7), "7");
        assert_eq!(format_sequence_value("", 4, 7), "0007");
        assert_eq!(format_sequence_value("ADM/", 3, 42), "ADM/042");
        assert_eq!(format_sequence_value("", -2, 12), "12");
    }

    #[tokio::test]
    async fn test_memory_sequence_counts_per_code() -> Result<()> {
        let sequence = MemorySequence::new();

        assert_eq!(sequence.next_by_code("a").await?, "1");
        assert_eq!(sequence.next_by_code("a").await?, "2");
        assert_eq!(sequence.next_by_code("b").await?, "1");
        assert_eq!(sequence.next_by_code("a").await?, "3");

        Ok(())
    }

    #[tokio::test]
    async fn test_memory_sequence_reports_poisoned_lock() {
        let sequence = MemorySequence::new();
        std::thread::scope(|scope| {
            let result = scope
                .spawn(|| {
                    let _guard = sequence.counters.lock().unwrap();
                    panic!("counter holder died");
                })
                .join();
            assert!(result.is_err());
        });

        let result = sequence.next_by_code("a").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::LockPoisoned { resource: "sequence counters" }
        ));
    }

    #[tokio::test]
    async fn test_db_sequence_is_strictly_increasing() -> Result<()> {
        let db = setup_test_db().await?;
        ensure_sequence(&db, STUDENT_SEQUENCE_CODE, "", 0).await?;

        let sequence = DbSequence::new(&db);
        let first = sequence.next_by_code(STUDENT_SEQUENCE_CODE).await?;
        let second = sequence.next_by_code(STUDENT_SEQUENCE_CODE).await?;
        let third = sequence.next_by_code(STUDENT_SEQUENCE_CODE).await?;

        assert_eq!(first, "1");
        assert_eq!(second, "2");
        assert_eq!(third, "3");

        let stored = find_sequence_by_code(&db, STUDENT_SEQUENCE_CODE)
            .await?
            .unwrap();
        assert_eq!(stored.number_next, 4);

        Ok(())
    }

    #[tokio::test]
    async fn test_db_sequence_applies_prefix_and_padding() -> Result<()> {
        let db = setup_test_db().await?;
        ensure_sequence(&db, "cms.exam.code", "EX-", 5).await?;

        let value = DbSequence::new(&db).next_by_code("cms.exam.code").await?;
        assert_eq!(value, "EX-00001");

        Ok(())
    }

    #[tokio::test]
    async fn test_db_sequence_unknown_code() -> Result<()> {
        let db = setup_test_db().await?;

        let result = DbSequence::new(&db).next_by_code("missing.code").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::SequenceNotFound { code } if code == "missing.code"
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_sequence_does_not_reset_counter() -> Result<()> {
        let db = setup_test_db().await?;
        ensure_sequence(&db, STUDENT_SEQUENCE_CODE, "", 0).await?;

        let sequence = DbSequence::new(&db);
        sequence.next_by_code(STUDENT_SEQUENCE_CODE).await?;
        sequence.next_by_code(STUDENT_SEQUENCE_CODE).await?;

        let again = ensure_sequence(&db, STUDENT_SEQUENCE_CODE, "X", 9).await?;
        assert_eq!(again.number_next, 3);
        assert_eq!(again.prefix, "");

        assert_eq!(sequence.next_by_code(STUDENT_SEQUENCE_CODE).await?, "3");

        Ok(())
    }
}
