use chrono::NaiveDateTime;
use rusqlite::TransactionBehavior;

use crate::db::{with_conn, DbPool};
use crate::error::{AppError, Rejection, Result};
use crate::models::{CreateGoal, CreateHealthMetric, FitnessGoal, FromSqliteRow, HealthMetric};

use super::{required, row_exists};

/// Fitness goals and health metrics of members.
#[derive(Clone)]
pub struct ProgressRepository {
    pool: DbPool,
}

impl ProgressRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Make `goal` the member's only active goal. Deactivating the old goals
    /// and inserting the new one commit together or not at all.
    pub async fn set_active_goal(&self, member_id: i64, goal: CreateGoal) -> Result<FitnessGoal> {
        if goal.target_date < goal.start_date {
            return Err(Rejection::InvalidDateRange.into());
        }
        let goal_type = required("Goal type", &goal.goal_type)?;

        with_conn(&self.pool, move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            if !row_exists(&tx, "member", "member_id", member_id)? {
                return Err(AppError::not_found("Member"));
            }

            let deactivated = tx.execute(
                "UPDATE fitness_goal SET is_active = 0 WHERE member_id = ? AND is_active = 1",
                [member_id],
            )?;

            tx.execute(
                "INSERT INTO fitness_goal
                     (member_id, goal_type, target_value, start_date, target_date, is_active)
                 VALUES (?, ?, ?, ?, ?, 1)",
                rusqlite::params![
                    member_id,
                    goal_type,
                    goal.target_value,
                    goal.start_date,
                    goal.target_date
                ],
            )?;

            let created = FitnessGoal {
                id: tx.last_insert_rowid(),
                member_id,
                goal_type,
                target_value: goal.target_value,
                start_date: goal.start_date,
                target_date: goal.target_date,
                is_active: true,
            };
            tx.commit()?;

            tracing::info!(
                "Member #{} has new active goal #{} ({} deactivated)",
                member_id,
                created.id,
                deactivated
            );
            Ok(created)
        })
        .await
    }

    pub async fn find_goals(&self, member_id: i64) -> Result<Vec<FitnessGoal>> {
        with_conn(&self.pool, move |conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM fitness_goal WHERE member_id = ? ORDER BY goal_id")?;
            let goals = stmt
                .query_map([member_id], FitnessGoal::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(goals)
        })
        .await
    }

    /// Append a metric. `recorded_at` from the input wins over `now`.
    pub async fn record_metric(
        &self,
        member_id: i64,
        input: CreateHealthMetric,
        now: NaiveDateTime,
    ) -> Result<HealthMetric> {
        let recorded_at = input.recorded_at.unwrap_or(now);

        with_conn(&self.pool, move |conn| {
            if !row_exists(conn, "member", "member_id", member_id)? {
                return Err(AppError::not_found("Member"));
            }

            conn.execute(
                "INSERT INTO health_metric
                     (member_id, recorded_at, weight_kg, heart_rate_bpm, body_fat_percent)
                 VALUES (?, ?, ?, ?, ?)",
                rusqlite::params![
                    member_id,
                    recorded_at,
                    input.weight_kg,
                    input.heart_rate_bpm,
                    input.body_fat_percent
                ],
            )?;

            let metric = HealthMetric {
                id: conn.last_insert_rowid(),
                member_id,
                recorded_at,
                weight_kg: input.weight_kg,
                heart_rate_bpm: input.heart_rate_bpm,
                body_fat_percent: input.body_fat_percent,
            };
            tracing::debug!("Recorded metric #{} for member #{}", metric.id, member_id);
            Ok(metric)
        })
        .await
    }

    pub async fn find_metrics(&self, member_id: i64) -> Result<Vec<HealthMetric>> {
        with_conn(&self.pool, move |conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM health_metric WHERE member_id = ?
                 ORDER BY recorded_at DESC, metric_id DESC",
            )?;
            let metrics = stmt
                .query_map([member_id], HealthMetric::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(metrics)
        })
        .await
    }
}
