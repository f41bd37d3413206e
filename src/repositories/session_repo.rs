use rusqlite::{Connection, OptionalExtension, TransactionBehavior};

use crate::db::{with_conn, DbPool};
use crate::error::{classify_write_error, AppError, Result};
use crate::models::{
    CreatePtSession, FromSqliteRow, PtSession, ReschedulePtSession, SessionStatus,
};
use crate::scheduling::{validate_booking, Booking, BookingPlan};

use super::row_exists;

/// Personal-training sessions.
#[derive(Clone)]
pub struct SessionRepository {
    pool: DbPool,
}

impl SessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<PtSession>> {
        with_conn(&self.pool, move |conn| Ok(load_session(conn, id)?)).await
    }

    pub async fn find_by_member(&self, member_id: i64) -> Result<Vec<PtSession>> {
        with_conn(&self.pool, move |conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM pt_session WHERE member_id = ? ORDER BY start_time, session_id",
            )?;
            let sessions = stmt
                .query_map([member_id], PtSession::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(sessions)
        })
        .await
    }

    /// Book a new session. It starts out as `BOOKED`.
    pub async fn schedule(&self, input: CreatePtSession) -> Result<PtSession> {
        let plan = BookingPlan::new(input.trainer_id, input.room_id, input.start_time, input.end_time)?;
        let member_id = input.member_id;

        with_conn(&self.pool, move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            if !row_exists(&tx, "member", "member_id", member_id)? {
                return Err(AppError::not_found("Member"));
            }
            validate_booking(&tx, &plan, None)?;

            let status = SessionStatus::Booked;
            tx.execute(
                "INSERT INTO pt_session (member_id, trainer_id, room_id, start_time, end_time, status)
                 VALUES (?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    member_id,
                    plan.trainer_id,
                    plan.room_id,
                    plan.window.start(),
                    plan.window.end(),
                    status.as_str()
                ],
            )
            .map_err(classify_write_error)?;

            let session = PtSession {
                id: tx.last_insert_rowid(),
                member_id,
                trainer_id: plan.trainer_id,
                room_id: plan.room_id,
                start_time: plan.window.start(),
                end_time: plan.window.end(),
                status,
            };
            tx.commit()?;

            tracing::info!(
                "Scheduled PT session #{} for member #{} with trainer #{}",
                session.id,
                member_id,
                session.trainer_id
            );
            Ok(session)
        })
        .await
    }

    /// Move a session to a new trainer, room or window. The session itself is
    /// left out of the conflict checks.
    pub async fn reschedule(&self, id: i64, input: ReschedulePtSession) -> Result<PtSession> {
        with_conn(&self.pool, move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let mut session =
                load_session(&tx, id)?.ok_or_else(|| AppError::not_found("Session"))?;
            let plan = BookingPlan::new(input.trainer_id, input.room_id, input.start_time, input.end_time)?;
            validate_booking(&tx, &plan, Some(Booking::Session(id)))?;

            session.trainer_id = plan.trainer_id;
            session.room_id = plan.room_id;
            session.start_time = plan.window.start();
            session.end_time = plan.window.end();

            tx.execute(
                "UPDATE pt_session SET trainer_id = ?, room_id = ?, start_time = ?, end_time = ?
                 WHERE session_id = ?",
                rusqlite::params![
                    session.trainer_id,
                    session.room_id,
                    session.start_time,
                    session.end_time,
                    id
                ],
            )
            .map_err(classify_write_error)?;
            tx.commit()?;

            tracing::info!("Rescheduled PT session #{}", id);
            Ok(session)
        })
        .await
    }

    /// Set the status directly; there are no transition rules. A cancelled
    /// session gave up its slot, so moving it out of `CANCELLED` books the
    /// slot again and must pass the conflict checks first.
    pub async fn set_status(&self, id: i64, status: SessionStatus) -> Result<PtSession> {
        with_conn(&self.pool, move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let mut session =
                load_session(&tx, id)?.ok_or_else(|| AppError::not_found("Session"))?;

            if session.status == SessionStatus::Cancelled && status != SessionStatus::Cancelled {
                let plan = BookingPlan::new(
                    session.trainer_id,
                    session.room_id,
                    session.start_time,
                    session.end_time,
                )?;
                validate_booking(&tx, &plan, Some(Booking::Session(id)))?;
            }

            tx.execute(
                "UPDATE pt_session SET status = ? WHERE session_id = ?",
                rusqlite::params![status.as_str(), id],
            )?;
            tx.commit()?;

            session.status = status;
            tracing::info!("PT session #{} is now {}", id, status.as_str());
            Ok(session)
        })
        .await
    }
}

fn load_session(conn: &Connection, id: i64) -> rusqlite::Result<Option<PtSession>> {
    conn.query_row(
        "SELECT * FROM pt_session WHERE session_id = ?",
        [id],
        PtSession::from_row,
    )
    .optional()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Rejection;
    use crate::repositories::testing::{
        at, count_rows, insert_member, insert_room, insert_trainer, setup_test_db,
    };
    use chrono::NaiveDateTime;

    struct Fixture {
        member: i64,
        trainer: i64,
        room_a: i64,
        room_b: i64,
    }

    fn fixture(pool: &DbPool) -> Fixture {
        Fixture {
            member: insert_member(pool, "Mia", "mia@example.com"),
            trainer: insert_trainer(pool, "Tara", "tara@club.test"),
            room_a: insert_room(pool, "Room A", 10),
            room_b: insert_room(pool, "Room B", 10),
        }
    }

    fn booking(f: &Fixture, room: i64, start: NaiveDateTime, end: NaiveDateTime) -> CreatePtSession {
        CreatePtSession {
            member_id: f.member,
            trainer_id: f.trainer,
            room_id: room,
            start_time: start,
            end_time: end,
        }
    }

    #[tokio::test]
    async fn test_trainer_class_blocks_overlapping_session_only() {
        let pool = setup_test_db();
        let f = fixture(&pool);
        {
            let conn = pool.get().unwrap();
            conn.execute(
                "INSERT INTO fitness_class (title, start_time, end_time, max_capacity, trainer_id, room_id)
                 VALUES ('HIIT', ?, ?, 5, ?, ?)",
                rusqlite::params![at(10, 9, 0), at(10, 10, 0), f.trainer, f.room_a],
            )
            .unwrap();
        }
        let repo = SessionRepository::new(pool.clone());

        let err = repo
            .schedule(booking(&f, f.room_b, at(10, 9, 30), at(10, 10, 30)))
            .await
            .unwrap_err();
        assert_eq!(err.rejection(), Some(&Rejection::TrainerConflict));
        assert_eq!(count_rows(&pool, "pt_session"), 0);

        let session = repo
            .schedule(booking(&f, f.room_b, at(10, 10, 0), at(10, 11, 0)))
            .await
            .unwrap();
        assert_eq!(session.status, SessionStatus::Booked);
        assert_eq!(repo.find_by_id(session.id).await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn test_schedule_requires_existing_member() {
        let pool = setup_test_db();
        let f = fixture(&pool);
        let repo = SessionRepository::new(pool);

        let mut input = booking(&f, f.room_a, at(10, 9, 0), at(10, 10, 0));
        input.member_id = 999;
        let err = repo.schedule(input).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_reschedule_excludes_itself() {
        let pool = setup_test_db();
        let f = fixture(&pool);
        let repo = SessionRepository::new(pool);

        let session = repo
            .schedule(booking(&f, f.room_a, at(10, 9, 0), at(10, 10, 0)))
            .await
            .unwrap();
        repo.schedule(booking(&f, f.room_a, at(10, 12, 0), at(10, 13, 0)))
            .await
            .unwrap();

        let moved = repo
            .reschedule(
                session.id,
                ReschedulePtSession {
                    trainer_id: f.trainer,
                    room_id: f.room_b,
                    start_time: at(10, 9, 30),
                    end_time: at(10, 10, 30),
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.room_id, f.room_b);
        assert_eq!(moved.start_time, at(10, 9, 30));

        let err = repo
            .reschedule(
                session.id,
                ReschedulePtSession {
                    trainer_id: f.trainer,
                    room_id: f.room_b,
                    start_time: at(10, 12, 30),
                    end_time: at(10, 13, 30),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.rejection(), Some(&Rejection::TrainerConflict));
    }

    #[tokio::test]
    async fn test_status_is_unconstrained() {
        let pool = setup_test_db();
        let f = fixture(&pool);
        let repo = SessionRepository::new(pool);

        let session = repo
            .schedule(booking(&f, f.room_a, at(10, 9, 0), at(10, 10, 0)))
            .await
            .unwrap();

        let done = repo.set_status(session.id, SessionStatus::Completed).await.unwrap();
        assert_eq!(done.status, SessionStatus::Completed);

        let back = repo.set_status(session.id, SessionStatus::Booked).await.unwrap();
        assert_eq!(back.status, SessionStatus::Booked);

        let err = repo.set_status(77, SessionStatus::Cancelled).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_cancelled_session_frees_slot() {
        let pool = setup_test_db();
        let f = fixture(&pool);
        let repo = SessionRepository::new(pool);

        let session = repo
            .schedule(booking(&f, f.room_a, at(10, 9, 0), at(10, 10, 0)))
            .await
            .unwrap();
        repo.set_status(session.id, SessionStatus::Cancelled).await.unwrap();

        repo.schedule(booking(&f, f.room_a, at(10, 9, 0), at(10, 10, 0)))
            .await
            .unwrap();
        assert_eq!(repo.find_by_member(f.member).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_reviving_cancelled_session_rechecks_slot() {
        let pool = setup_test_db();
        let f = fixture(&pool);
        let repo = SessionRepository::new(pool);

        let first = repo
            .schedule(booking(&f, f.room_a, at(10, 9, 0), at(10, 10, 0)))
            .await
            .unwrap();
        repo.set_status(first.id, SessionStatus::Cancelled).await.unwrap();

        let second = repo
            .schedule(booking(&f, f.room_b, at(10, 9, 0), at(10, 10, 0)))
            .await
            .unwrap();

        let err = repo
            .set_status(first.id, SessionStatus::Booked)
            .await
            .unwrap_err();
        assert_eq!(err.rejection(), Some(&Rejection::TrainerConflict));
        assert_eq!(
            repo.find_by_id(first.id).await.unwrap().unwrap().status,
            SessionStatus::Cancelled
        );

        repo.set_status(second.id, SessionStatus::Cancelled).await.unwrap();
        let revived = repo.set_status(first.id, SessionStatus::Booked).await.unwrap();
        assert_eq!(revived.status, SessionStatus::Booked);
    }

    #[tokio::test]
    async fn test_status_change_between_live_states_skips_checks() {
        let pool = setup_test_db();
        let f = fixture(&pool);
        let repo = SessionRepository::new(pool);

        let session = repo
            .schedule(booking(&f, f.room_a, at(10, 9, 0), at(10, 10, 0)))
            .await
            .unwrap();

        let done = repo.set_status(session.id, SessionStatus::Completed).await.unwrap();
        assert_eq!(done.status, SessionStatus::Completed);
        assert_eq!(done.start_time, session.start_time);
    }
}
