use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Row;
use serde::Serialize;

use super::{FitnessClass, FromSqliteRow, PtSession, Trainer};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalSummary {
    pub goal_id: i64,
    pub goal_type: String,
    pub target_value: f64,
    pub start_date: NaiveDate,
    pub target_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub metric_id: i64,
    pub recorded_at: NaiveDateTime,
    pub weight_kg: Option<f64>,
    pub heart_rate_bpm: Option<i64>,
    pub body_fat_percent: Option<f64>,
}

/// A member with their latest active goal and latest health metric.
/// Either may be absent; that is a normal state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberDashboard {
    pub member_id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub active_goal: Option<GoalSummary>,
    pub latest_metric: Option<MetricSummary>,
}

impl FromSqliteRow for MemberDashboard {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let goal_id: Option<i64> = row.get("goal_id")?;
        let active_goal = match goal_id {
            Some(goal_id) => Some(GoalSummary {
                goal_id,
                goal_type: row.get("goal_type")?,
                target_value: row.get("target_value")?,
                start_date: row.get("start_date")?,
                target_date: row.get("target_date")?,
            }),
            None => None,
        };

        let metric_id: Option<i64> = row.get("metric_id")?;
        let latest_metric = match metric_id {
            Some(metric_id) => Some(MetricSummary {
                metric_id,
                recorded_at: row.get("latest_metric_at")?,
                weight_kg: row.get("weight_kg")?,
                heart_rate_bpm: row.get("heart_rate_bpm")?,
                body_fat_percent: row.get("body_fat_percent")?,
            }),
            None => None,
        };

        Ok(Self {
            member_id: row.get("member_id")?,
            full_name: row.get("full_name")?,
            email: row.get("email")?,
            phone: row.get("phone")?,
            active_goal,
            latest_metric,
        })
    }
}

impl MemberDashboard {
    pub fn goal_description(&self) -> String {
        match &self.active_goal {
            Some(goal) => format!(
                "{} target {} by {}",
                goal.goal_type,
                goal.target_value,
                goal.target_date.format("%Y-%m-%d")
            ),
            None => "No active goal".to_string(),
        }
    }

    pub fn metric_description(&self) -> String {
        match &self.latest_metric {
            Some(metric) => format!(
                "Latest metric ({}): weight {}kg, HR {}, body fat {}%",
                metric.recorded_at.format("%Y-%m-%d %H:%M"),
                or_na(metric.weight_kg),
                or_na(metric.heart_rate_bpm),
                or_na(metric.body_fat_percent)
            ),
            None => "No recorded health metrics yet.".to_string(),
        }
    }
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string())
}

/// Upcoming bookings for a trainer relative to a reference instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainerSchedule {
    pub trainer: Trainer,
    pub sessions: Vec<PtSession>,
    pub classes: Vec<FitnessClass>,
}
