use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior};

use crate::db::{with_conn, DbPool};
use crate::error::{classify_write_error, AppError, Rejection, Result};
use crate::models::{ClassRegistration, ClassRequest, FitnessClass, FromSqliteRow};
use crate::scheduling::{validate_booking, Booking, BookingPlan};

use super::{optional, required, row_exists};

#[derive(Clone)]
pub struct ClassRepository {
    pool: DbPool,
}

impl ClassRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<FitnessClass>> {
        with_conn(&self.pool, move |conn| Ok(load_class(conn, id)?)).await
    }

    pub async fn create(&self, input: ClassRequest) -> Result<FitnessClass> {
        let plan = BookingPlan::new(input.trainer_id, input.room_id, input.start_time, input.end_time)?
            .with_capacity(input.max_capacity);
        let title = required("Title", &input.title)?;
        let description = optional(input.description.as_deref());

        with_conn(&self.pool, move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            validate_booking(&tx, &plan, None)?;

            tx.execute(
                "INSERT INTO fitness_class
                     (title, description, start_time, end_time, max_capacity, trainer_id, room_id)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    title,
                    description,
                    plan.window.start(),
                    plan.window.end(),
                    input.max_capacity,
                    plan.trainer_id,
                    plan.room_id
                ],
            )
            .map_err(classify_write_error)?;

            let class = FitnessClass {
                id: tx.last_insert_rowid(),
                title,
                description,
                start_time: plan.window.start(),
                end_time: plan.window.end(),
                max_capacity: input.max_capacity,
                trainer_id: plan.trainer_id,
                room_id: plan.room_id,
            };
            tx.commit()?;

            tracing::info!(
                "Created class #{} '{}' with trainer #{} in room #{}",
                class.id,
                class.title,
                class.trainer_id,
                class.room_id
            );
            Ok(class)
        })
        .await
    }

    /// Replace every value of an existing class. The whole booking pipeline
    /// runs again against the proposed values, skipping the class itself.
    pub async fn update(&self, id: i64, input: ClassRequest) -> Result<FitnessClass> {
        with_conn(&self.pool, move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let mut class = load_class(&tx, id)?.ok_or_else(|| AppError::not_found("Class"))?;

            let plan = BookingPlan::new(input.trainer_id, input.room_id, input.start_time, input.end_time)?
                .with_capacity(input.max_capacity);
            let title = required("Title", &input.title)?;

            validate_booking(&tx, &plan, Some(Booking::Class(id)))?;

            let registered = count_registrations(&tx, id)?;
            if input.max_capacity < registered {
                return Err(Rejection::CapacityBelowRegistrations { registered }.into());
            }

            class.title = title;
            class.description = optional(input.description.as_deref());
            class.start_time = plan.window.start();
            class.end_time = plan.window.end();
            class.max_capacity = input.max_capacity;
            class.trainer_id = plan.trainer_id;
            class.room_id = plan.room_id;

            tx.execute(
                "UPDATE fitness_class
                 SET title = ?, description = ?, start_time = ?, end_time = ?,
                     max_capacity = ?, trainer_id = ?, room_id = ?
                 WHERE class_id = ?",
                rusqlite::params![
                    class.title,
                    class.description,
                    class.start_time,
                    class.end_time,
                    class.max_capacity,
                    class.trainer_id,
                    class.room_id,
                    id
                ],
            )
            .map_err(classify_write_error)?;
            tx.commit()?;

            tracing::info!("Updated class #{}", id);
            Ok(class)
        })
        .await
    }

    /// Register a member for a class.
    ///
    /// Duplicates are caught here; a missing or full class is refused by the
    /// `trg_check_class_capacity` trigger at insert time, so capacity holds
    /// even when two registrations race.
    pub async fn register(
        &self,
        member_id: i64,
        class_id: i64,
        registered_at: NaiveDateTime,
    ) -> Result<ClassRegistration> {
        with_conn(&self.pool, move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            if !row_exists(&tx, "member", "member_id", member_id)? {
                return Err(AppError::not_found("Member"));
            }

            let already: bool = tx.query_row(
                "SELECT EXISTS (
                     SELECT 1 FROM class_registration WHERE member_id = ? AND class_id = ?
                 )",
                [member_id, class_id],
                |row| row.get(0),
            )?;
            if already {
                return Err(Rejection::AlreadyRegistered.into());
            }

            if let Err(e) = tx.execute(
                "INSERT INTO class_registration (member_id, class_id, registered_at) VALUES (?, ?, ?)",
                rusqlite::params![member_id, class_id, registered_at],
            ) {
                let err = classify_write_error(e);
                tracing::warn!("Registration of member #{} for class #{} refused: {}", member_id, class_id, err);
                return Err(err);
            }

            let registration = ClassRegistration {
                id: tx.last_insert_rowid(),
                member_id,
                class_id,
                registered_at,
            };
            tx.commit()?;

            tracing::info!("Member #{} registered for class #{}", member_id, class_id);
            Ok(registration)
        })
        .await
    }

    pub async fn count_registrations(&self, class_id: i64) -> Result<i64> {
        with_conn(&self.pool, move |conn| count_registrations(conn, class_id)).await
    }

    pub async fn find_registrations(&self, class_id: i64) -> Result<Vec<ClassRegistration>> {
        with_conn(&self.pool, move |conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM class_registration WHERE class_id = ? ORDER BY registered_at, registration_id",
            )?;
            let registrations = stmt
                .query_map([class_id], ClassRegistration::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(registrations)
        })
        .await
    }
}

fn load_class(conn: &Connection, id: i64) -> rusqlite::Result<Option<FitnessClass>> {
    conn.query_row(
        "SELECT * FROM fitness_class WHERE class_id = ?",
        [id],
        FitnessClass::from_row,
    )
    .optional()
}

fn count_registrations(conn: &Connection, class_id: i64) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM class_registration WHERE class_id = ?",
        [class_id],
        |row| row.get(0),
    )?;
    Ok(count)
}
