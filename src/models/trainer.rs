use chrono::NaiveDateTime;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trainer {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub specialty: Option<String>,
}

impl FromSqliteRow for Trainer {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("trainer_id")?,
            full_name: row.get("full_name")?,
            email: row.get("email")?,
            specialty: row.get("specialty")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTrainer {
    pub full_name: String,
    pub email: String,
    pub specialty: Option<String>,
}

/// A declared availability slot. Not checked against bookings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerAvailability {
    pub id: i64,
    pub trainer_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

impl FromSqliteRow for TrainerAvailability {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("availability_id")?,
            trainer_id: row.get("trainer_id")?,
            start_time: row.get("start_time")?,
            end_time: row.get("end_time")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAvailability {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}
