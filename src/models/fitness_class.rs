use chrono::NaiveDateTime;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessClass {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub max_capacity: i64,
    pub trainer_id: i64,
    pub room_id: i64,
}

impl FromSqliteRow for FitnessClass {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("class_id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            start_time: row.get("start_time")?,
            end_time: row.get("end_time")?,
            max_capacity: row.get("max_capacity")?,
            trainer_id: row.get("trainer_id")?,
            room_id: row.get("room_id")?,
        })
    }
}

/// Full set of class values; used for both create and update, since an
/// update is validated against every proposed value.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassRequest {
    pub title: String,
    pub description: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub max_capacity: i64,
    pub trainer_id: i64,
    pub room_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRegistration {
    pub id: i64,
    pub member_id: i64,
    pub class_id: i64,
    pub registered_at: NaiveDateTime,
}

impl FromSqliteRow for ClassRegistration {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("registration_id")?,
            member_id: row.get("member_id")?,
            class_id: row.get("class_id")?,
            registered_at: row.get("registered_at")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRegistration {
    pub class_id: i64,
}
