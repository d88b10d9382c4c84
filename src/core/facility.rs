//! Block and room business logic.
//!
//! A room always belongs to a block, so a block with rooms cannot be deleted.

use crate::{
    entities::{Block, Room, SchedulerLine, block, room, scheduler_line},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::info;

/// Retrieves all blocks ordered by name.
pub async fn get_all_blocks(db: &DatabaseConnection) -> Result<Vec<block::Model>> {
    Block::find()
        .order_by_asc(block::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a block by its exact name.
pub async fn get_block_by_name<C>(db: &C, name: &str) -> Result<Option<block::Model>>
where
    C: ConnectionTrait,
{
    Block::find()
        .filter(block::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a block. The name must not be blank.
pub async fn create_block<C>(db: &C, name: &str) -> Result<block::Model>
where
    C: ConnectionTrait,
{
    if name.trim().is_empty() {
        return Err(Error::validation("Block name cannot be empty"));
    }

    block::ActiveModel {
        name: Set(name.trim().to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Deletes a block that no longer has rooms.
pub async fn delete_block(db: &DatabaseConnection, block_id: i64) -> Result<()> {
    let block = Block::find_by_id(block_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Block",
            id: block_id,
        })?;

    let rooms = block.find_related(Room).count(db).await?;
    if rooms > 0 {
        return Err(Error::validation(format!(
            "Block {} still has {rooms} rooms",
            block.name
        )));
    }

    Block::delete_by_id(block_id).exec(db).await?;
    Ok(())
}

/// Creates a room in an existing block.
///
/// The name must not be blank and the capacity must not be negative.
pub async fn create_room<C>(db: &C, block_id: i64, name: &str, capacity: i32) -> Result<room::Model>
where
    C: ConnectionTrait,
{
    if name.trim().is_empty() {
        return Err(Error::validation("Room name cannot be empty"));
    }
    if capacity < 0 {
        return Err(Error::validation(format!(
            "Room capacity cannot be negative (got {capacity})"
        )));
    }
    Block::find_by_id(block_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Block",
            id: block_id,
        })?;

    room::ActiveModel {
        name: Set(name.trim().to_string()),
        room_capacity: Set(capacity),
        block_id: Set(block_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Finds a room by id.
pub async fn get_room_by_id<C>(db: &C, room_id: i64) -> Result<Option<room::Model>>
where
    C: ConnectionTrait,
{
    Room::find_by_id(room_id).one(db).await.map_err(Into::into)
}

/// Finds a room by name within a block.
pub async fn get_room_by_name<C>(db: &C, block_id: i64, name: &str) -> Result<Option<room::Model>>
where
    C: ConnectionTrait,
{
    Room::find()
        .filter(room::Column::BlockId.eq(block_id))
        .filter(room::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists the rooms of a block, ordered by name.
pub async fn get_block_rooms(db: &DatabaseConnection, block_id: i64) -> Result<Vec<room::Model>> {
    Room::find()
        .filter(room::Column::BlockId.eq(block_id))
        .order_by_asc(room::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Changes a room's seat count.
pub async fn update_room_capacity(
    db: &DatabaseConnection,
    room_id: i64,
    capacity: i32,
) -> Result<room::Model> {
    if capacity < 0 {
        return Err(Error::validation(format!(
            "Room capacity cannot be negative (got {capacity})"
        )));
    }

    let mut room: room::ActiveModel = get_room_by_id(db, room_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Room",
            id: room_id,
        })?
        .into();
    room.room_capacity = Set(capacity);
    room.update(db).await.map_err(Into::into)
}

/// Deletes a room; lines held there lose their room.
pub async fn delete_room(db: &DatabaseConnection, room_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    get_room_by_id(&txn, room_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Room",
            id: room_id,
        })?;

    SchedulerLine::update_many()
        .col_expr(scheduler_line::Column::RoomId, Expr::value(Option::<i64>::None))
        .filter(scheduler_line::Column::RoomId.eq(room_id))
        .exec(&txn)
        .await?;
    Room::delete_by_id(room_id).exec(&txn).await?;

    txn.commit().await?;
    info!("Deleted room {}", room_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{core::scheduler_line::require_scheduler_line, test_utils::*};

    #[tokio::test]
    async fn test_create_room_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let block = create_block(&db, "A Block").await?;

        let result = create_room(&db, block.id, " ", 30).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        let result = create_room(&db, block.id, "A-1", -1).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        let result = create_room(&db, 999, "A-1", 30).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "Block", id: 999 }
        ));

        let room = create_room(&db, block.id, "A-1", 30).await?;
        assert_eq!(room.room_capacity, 30);
        assert_eq!(room.block_id, block.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_block_rooms() -> Result<()> {
        let db = setup_test_db().await?;
        let block = create_block(&db, "B Block").await?;
        create_room(&db, block.id, "B-2", 20).await?;
        create_room(&db, block.id, "B-1", 25).await?;

        let rooms = get_block_rooms(&db, block.id).await?;
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].name, "B-1");

        let found = get_room_by_name(&db, block.id, "B-2").await?.unwrap();
        let updated = update_room_capacity(&db, found.id, 45).await?;
        assert_eq!(updated.room_capacity, 45);

        Ok(())
    }

    #[tokio::test]
    async fn test_block_with_rooms_cannot_be_deleted() -> Result<()> {
        let db = setup_test_db().await?;
        let block = create_block(&db, "C Block").await?;
        let room = create_room(&db, block.id, "C-1", 10).await?;

        let result = delete_block(&db, block.id).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        delete_room(&db, room.id).await?;
        delete_block(&db, block.id).await?;
        assert!(get_all_blocks(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_room_detaches_lines() -> Result<()> {
        let fixture = setup_with_line().await?;
        let db = &fixture.db;

        delete_room(db, fixture.room.id).await?;

        let line = require_scheduler_line(db, fixture.line.id).await?;
        assert!(line.room_id.is_none());
        assert_eq!(line.name, fixture.line.name);

        Ok(())
    }
}
