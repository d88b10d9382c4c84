//! Sequence entity - named counters used to issue identifiers.
//!
//! `number_next` is the value the next draw returns; each draw advances it by
//! `number_increment`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sequence database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cms_sequences")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Lookup code (e.g., `"cms.student.code"`)
    #[sea_orm(unique)]
    pub code: String,
    /// Text prepended to every issued value
    pub prefix: String,
    /// Minimum digit count; shorter numbers are zero-padded
    pub padding: i32,
    pub number_next: i64,
    pub number_increment: i64,
}

/// `Sequence` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
