//! Booking conflict detection and the validation pipeline shared by class
//! and PT session writes.
//!
//! Windows are half-open: `[start, end)`. Two bookings that merely touch
//! (one ends exactly when the other starts) do not conflict.

use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;

use crate::error::{AppError, Rejection, Result};

/// A non-empty half-open time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl Interval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> std::result::Result<Self, Rejection> {
        if end <= start {
            return Err(Rejection::InvalidWindow);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Trainer,
    Room,
}

impl ResourceKind {
    fn column(&self) -> &'static str {
        match self {
            ResourceKind::Trainer => "trainer_id",
            ResourceKind::Room => "room_id",
        }
    }
}

/// An existing booking to leave out of a conflict check, i.e. the record
/// being updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Booking {
    Class(i64),
    Session(i64),
}

/// Whether any class or non-cancelled PT session on the resource overlaps
/// `window`.
pub fn has_conflict(
    conn: &Connection,
    kind: ResourceKind,
    resource_id: i64,
    window: &Interval,
    excluding: Option<Booking>,
) -> rusqlite::Result<bool> {
    let (skip_class, skip_session) = match excluding {
        Some(Booking::Class(id)) => (Some(id), None),
        Some(Booking::Session(id)) => (None, Some(id)),
        None => (None, None),
    };

    let column = kind.column();
    let sql = format!(
        "SELECT EXISTS (
             SELECT 1 FROM fitness_class
             WHERE {column} = ?1 AND start_time < ?3 AND end_time > ?2
               AND class_id IS NOT ?4
         ) OR EXISTS (
             SELECT 1 FROM pt_session
             WHERE {column} = ?1 AND start_time < ?3 AND end_time > ?2
               AND status != 'CANCELLED'
               AND session_id IS NOT ?5
         )"
    );

    conn.query_row(
        &sql,
        rusqlite::params![resource_id, window.start, window.end, skip_class, skip_session],
        |row| row.get(0),
    )
}

/// The values a class or PT session write proposes.
#[derive(Debug, Clone, Copy)]
pub struct BookingPlan {
    pub trainer_id: i64,
    pub room_id: i64,
    pub window: Interval,
    /// Only set for classes.
    pub max_capacity: Option<i64>,
}

impl BookingPlan {
    pub fn new(
        trainer_id: i64,
        room_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> std::result::Result<Self, Rejection> {
        Ok(Self {
            trainer_id,
            room_id,
            window: Interval::new(start, end)?,
            max_capacity: None,
        })
    }

    pub fn with_capacity(mut self, max_capacity: i64) -> Self {
        self.max_capacity = Some(max_capacity);
        self
    }
}

/// Run the booking checks in order: referenced trainer and room exist,
/// class capacity fits the room, then trainer and room are free.
/// The window itself is already valid by construction of [`Interval`].
pub fn validate_booking(
    conn: &Connection,
    plan: &BookingPlan,
    excluding: Option<Booking>,
) -> Result<()> {
    let trainer_exists: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM trainer WHERE trainer_id = ?)",
        [plan.trainer_id],
        |row| row.get(0),
    )?;
    if !trainer_exists {
        return Err(AppError::not_found("Trainer"));
    }

    let room_capacity: Option<i64> = conn
        .query_row(
            "SELECT capacity FROM room WHERE room_id = ?",
            [plan.room_id],
            |row| row.get(0),
        )
        .optional()?;
    let room_capacity = room_capacity.ok_or_else(|| AppError::not_found("Room"))?;

    if let Some(max_capacity) = plan.max_capacity {
        if max_capacity < 1 {
            return Err(AppError::Validation(
                "Max capacity must be at least 1".to_string(),
            ));
        }
        if max_capacity > room_capacity {
            return Err(Rejection::CapacityExceedsRoom.into());
        }
    }

    if has_conflict(
        conn,
        ResourceKind::Trainer,
        plan.trainer_id,
        &plan.window,
        excluding,
    )? {
        return Err(Rejection::TrainerConflict.into());
    }

    if has_conflict(conn, ResourceKind::Room, plan.room_id, &plan.window, excluding)? {
        return Err(Rejection::RoomConflict.into());
    }

    Ok(())
}
