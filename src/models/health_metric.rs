use chrono::NaiveDateTime;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthMetric {
    pub id: i64,
    pub member_id: i64,
    pub recorded_at: NaiveDateTime,
    pub weight_kg: Option<f64>,
    pub heart_rate_bpm: Option<i64>,
    pub body_fat_percent: Option<f64>,
}

impl FromSqliteRow for HealthMetric {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("metric_id")?,
            member_id: row.get("member_id")?,
            recorded_at: row.get("recorded_at")?,
            weight_kg: row.get("weight_kg")?,
            heart_rate_bpm: row.get("heart_rate_bpm")?,
            body_fat_percent: row.get("body_fat_percent")?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateHealthMetric {
    pub recorded_at: Option<NaiveDateTime>,
    pub weight_kg: Option<f64>,
    pub heart_rate_bpm: Option<i64>,
    pub body_fat_percent: Option<f64>,
}
