use chrono::NaiveDate;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessGoal {
    pub id: i64,
    pub member_id: i64,
    pub goal_type: String,
    pub target_value: f64,
    pub start_date: NaiveDate,
    pub target_date: NaiveDate,
    pub is_active: bool,
}

impl FromSqliteRow for FitnessGoal {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("goal_id")?,
            member_id: row.get("member_id")?,
            goal_type: row.get("goal_type")?,
            target_value: row.get("target_value")?,
            start_date: row.get("start_date")?,
            target_date: row.get("target_date")?,
            is_active: row.get("is_active")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGoal {
    pub goal_type: String,
    pub target_value: f64,
    pub start_date: NaiveDate,
    pub target_date: NaiveDate,
}
