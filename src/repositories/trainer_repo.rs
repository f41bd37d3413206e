use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior};

use crate::db::{with_conn, DbPool};
use crate::error::{classify_write_error, AppError, Rejection, Result};
use crate::models::{
    CreateAvailability, CreateTrainer, FitnessClass, FromSqliteRow, PtSession, Trainer,
    TrainerAvailability, TrainerSchedule,
};
use crate::scheduling::Interval;

use super::{optional, required};

#[derive(Clone)]
pub struct TrainerRepository {
    pool: DbPool,
}

impl TrainerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Trainer>> {
        with_conn(&self.pool, move |conn| Ok(load_trainer(conn, id)?)).await
    }

    pub async fn create(&self, input: CreateTrainer) -> Result<Trainer> {
        let full_name = required("Full name", &input.full_name)?;
        let email = required("Email", &input.email)?;
        let specialty = optional(input.specialty.as_deref());

        with_conn(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO trainer (full_name, email, specialty) VALUES (?, ?, ?)",
                rusqlite::params![full_name, email, specialty],
            )
            .map_err(classify_write_error)?;

            let trainer = Trainer {
                id: conn.last_insert_rowid(),
                full_name,
                email,
                specialty,
            };
            tracing::info!("Created trainer #{} ({})", trainer.id, trainer.email);
            Ok(trainer)
        })
        .await
    }

    /// Declare an availability slot. Slots of one trainer may not overlap each
    /// other; they are not compared against bookings.
    pub async fn add_availability(
        &self,
        trainer_id: i64,
        input: CreateAvailability,
    ) -> Result<TrainerAvailability> {
        let window = Interval::new(input.start_time, input.end_time)?;

        with_conn(&self.pool, move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            if load_trainer(&tx, trainer_id)?.is_none() {
                return Err(AppError::not_found("Trainer"));
            }

            let overlap: bool = tx.query_row(
                "SELECT EXISTS (
                     SELECT 1 FROM trainer_availability
                     WHERE trainer_id = ? AND start_time < ? AND end_time > ?
                 )",
                rusqlite::params![trainer_id, window.end(), window.start()],
                |row| row.get(0),
            )?;
            if overlap {
                return Err(Rejection::AvailabilityOverlap.into());
            }

            tx.execute(
                "INSERT INTO trainer_availability (trainer_id, start_time, end_time) VALUES (?, ?, ?)",
                rusqlite::params![trainer_id, window.start(), window.end()],
            )?;
            let slot = TrainerAvailability {
                id: tx.last_insert_rowid(),
                trainer_id,
                start_time: window.start(),
                end_time: window.end(),
            };
            tx.commit()?;

            tracing::info!("Trainer #{} available {} - {}", trainer_id, slot.start_time, slot.end_time);
            Ok(slot)
        })
        .await
    }

    pub async fn find_availability(&self, trainer_id: i64) -> Result<Vec<TrainerAvailability>> {
        with_conn(&self.pool, move |conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM trainer_availability WHERE trainer_id = ? ORDER BY start_time",
            )?;
            let slots = stmt
                .query_map([trainer_id], TrainerAvailability::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(slots)
        })
        .await
    }

    /// Sessions and classes of the trainer starting at or after `now`, each in
    /// ascending start order.
    pub async fn schedule(&self, trainer_id: i64, now: NaiveDateTime) -> Result<TrainerSchedule> {
        with_conn(&self.pool, move |conn| {
            let trainer = load_trainer(conn, trainer_id)?
                .ok_or_else(|| AppError::not_found("Trainer"))?;

            let mut stmt = conn.prepare(
                "SELECT * FROM pt_session
                 WHERE trainer_id = ? AND start_time >= ?
                 ORDER BY start_time, session_id",
            )?;
            let sessions = stmt
                .query_map(rusqlite::params![trainer_id, now], PtSession::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            let mut stmt = conn.prepare(
                "SELECT * FROM fitness_class
                 WHERE trainer_id = ? AND start_time >= ?
                 ORDER BY start_time, class_id",
            )?;
            let classes = stmt
                .query_map(rusqlite::params![trainer_id, now], FitnessClass::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(TrainerSchedule {
                trainer,
                sessions,
                classes,
            })
        })
        .await
    }
}

fn load_trainer(conn: &Connection, id: i64) -> rusqlite::Result<Option<Trainer>> {
    conn.query_row(
        "SELECT * FROM trainer WHERE trainer_id = ?",
        [id],
        Trainer::from_row,
    )
    .optional()
}
