use rusqlite::OptionalExtension;

use crate::db::{with_conn, DbPool};
use crate::error::{AppError, Result};
use crate::models::{CreateRoom, FromSqliteRow, Room};

use super::required;

#[derive(Clone)]
pub struct RoomRepository {
    pool: DbPool,
}

impl RoomRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Room>> {
        with_conn(&self.pool, move |conn| {
            let room = conn
                .query_row("SELECT * FROM room WHERE room_id = ?", [id], Room::from_row)
                .optional()?;
            Ok(room)
        })
        .await
    }

    pub async fn create(&self, input: CreateRoom) -> Result<Room> {
        let name = required("Room name", &input.name)?;
        if input.capacity < 1 {
            return Err(AppError::Validation(
                "Room capacity must be at least 1".to_string(),
            ));
        }
        let capacity = input.capacity;

        with_conn(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO room (name, capacity) VALUES (?, ?)",
                rusqlite::params![name, capacity],
            )?;
            let room = Room {
                id: conn.last_insert_rowid(),
                name,
                capacity,
            };
            tracing::info!("Created room #{} '{}' (capacity {})", room.id, room.name, capacity);
            Ok(room)
        })
        .await
    }
}
