//! Seed data loading from config.toml
//!
//! The configuration file declares sequences, departments and blocks (with
//! their rooms) that should exist at startup. Seeding is idempotent: records
//! that already exist, matched by code or name, are left alone.

use crate::{
    core::{
        department::{create_department, get_department_by_name},
        facility::{create_block, create_room, get_block_by_name, get_room_by_name},
        sequence::{STUDENT_SEQUENCE_CODE, ensure_sequence},
    },
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Named counters to register
    #[serde(default)]
    pub sequences: Vec<SequenceConfig>,
    /// Departments to create
    #[serde(default)]
    pub departments: Vec<DepartmentConfig>,
    /// Blocks to create, each with its rooms
    #[serde(default)]
    pub blocks: Vec<BlockConfig>,
}

/// A sequence entry
#[derive(Debug, Deserialize, Clone)]
pub struct SequenceConfig {
    /// Lookup code, e.g. `cms.student.code`
    pub code: String,
    /// Text put in front of every value
    #[serde(default)]
    pub prefix: String,
    /// Minimum number of digits
    #[serde(default)]
    pub padding: i32,
}

/// A department entry
#[derive(Debug, Deserialize, Clone)]
pub struct DepartmentConfig {
    /// Department name
    pub name: String,
}

/// A block entry
#[derive(Debug, Deserialize, Clone)]
pub struct BlockConfig {
    /// Block name
    pub name: String,
    /// Rooms inside the block
    #[serde(default)]
    pub rooms: Vec<RoomConfig>,
}

/// A room entry, nested under its block
#[derive(Debug, Deserialize, Clone)]
pub struct RoomConfig {
    /// Room name, unique within its block
    pub name: String,
    /// Seats available
    pub capacity: i32,
}

/// Loads the seed configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses seed configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Creates the configured records that are missing, in one transaction.
///
/// The student admission sequence is always registered, with default
/// settings unless the file configures it.
pub async fn seed_from_config(db: &DatabaseConnection, config: &Config) -> Result<()> {
    let txn = db.begin().await?;

    for sequence in &config.sequences {
        ensure_sequence(&txn, &sequence.code, &sequence.prefix, sequence.padding).await?;
    }
    ensure_sequence(&txn, STUDENT_SEQUENCE_CODE, "", 0).await?;

    for department in &config.departments {
        if get_department_by_name(&txn, &department.name).await?.is_some() {
            warn!("Department '{}' already exists, skipping", department.name);
            continue;
        }
        info!("Seeding department '{}'", department.name);
        create_department(&txn, &department.name).await?;
    }

    for block_config in &config.blocks {
        let block = match get_block_by_name(&txn, &block_config.name).await? {
            Some(block) => block,
            None => {
                info!("Seeding block '{}'", block_config.name);
                create_block(&txn, &block_config.name).await?
            }
        };

        for room in &block_config.rooms {
            if get_room_by_name(&txn, block.id, &room.name).await?.is_some() {
                warn!(
                    "Room '{}' already exists in block '{}', skipping",
                    room.name, block.name
                );
                continue;
            }
            info!("Seeding room '{}' in block '{}'", room.name, block.name);
            create_room(&txn, block.id, &room.name, room.capacity).await?;
        }
    }

    txn.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::{
            department::get_all_departments,
            facility::{get_all_blocks, get_block_rooms},
            sequence::find_sequence_by_code,
        },
        test_utils::setup_test_db,
    };

    const SAMPLE: &str = r#"
        [[sequences]]
        code = "cms.student.code"
        padding = 4

        [[departments]]
        name = "Computer Science"

        [[departments]]
        name = "Mathematics"

        [[blocks]]
        name = "A Block"

        [[blocks.rooms]]
        name = "A-101"
        capacity = 40

        [[blocks.rooms]]
        name = "A-102"
        capacity = 35

        [[blocks]]
        name = "Library"
    "#;

    #[test]
    fn test_parse_config() {
        let config = parse_config(SAMPLE).unwrap();

        assert_eq!(config.sequences.len(), 1);
        assert_eq!(config.sequences[0].padding, 4);
        assert_eq!(config.sequences[0].prefix, "");
        assert_eq!(config.departments.len(), 2);
        assert_eq!(config.blocks.len(), 2);
        assert_eq!(config.blocks[0].rooms.len(), 2);
        assert_eq!(config.blocks[0].rooms[1].capacity, 35);
        assert!(config.blocks[1].rooms.is_empty());
    }

    #[test]
    fn test_parse_empty_and_invalid_config() {
        let config = parse_config("").unwrap();
        assert!(config.sequences.is_empty());

        let result = parse_config("[[blocks]]\nrooms = 3");
        assert!(matches!(result.unwrap_err(), Error::Config { .. }));
    }

    #[tokio::test]
    async fn test_seeding_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let config = parse_config(SAMPLE)?;

        seed_from_config(&db, &config).await?;
        seed_from_config(&db, &config).await?;

        assert_eq!(get_all_departments(&db).await?.len(), 2);
        let blocks = get_all_blocks(&db).await?;
        assert_eq!(blocks.len(), 2);
        assert_eq!(get_block_rooms(&db, blocks[0].id).await?.len(), 2);

        let sequence = find_sequence_by_code(&db, STUDENT_SEQUENCE_CODE).await?.unwrap();
        assert_eq!(sequence.padding, 4);

        Ok(())
    }

    #[tokio::test]
    async fn test_seeding_registers_student_sequence() -> Result<()> {
        let db = setup_test_db().await?;

        seed_from_config(&db, &Config::default()).await?;

        let sequence = find_sequence_by_code(&db, STUDENT_SEQUENCE_CODE).await?.unwrap();
        assert_eq!(sequence.number_next, 1);
        assert_eq!(sequence.padding, 0);

        Ok(())
    }
}
