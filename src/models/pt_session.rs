use chrono::NaiveDateTime;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

/// Any status may be set at any time; no transitions are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionStatus {
    #[default]
    Booked,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Booked => "BOOKED",
            SessionStatus::Completed => "COMPLETED",
            SessionStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "COMPLETED" => SessionStatus::Completed,
            "CANCELLED" => SessionStatus::Cancelled,
            _ => SessionStatus::Booked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PtSession {
    pub id: i64,
    pub member_id: i64,
    pub trainer_id: i64,
    pub room_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: SessionStatus,
}

impl FromSqliteRow for PtSession {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let status: String = row.get("status")?;
        Ok(Self {
            id: row.get("session_id")?,
            member_id: row.get("member_id")?,
            trainer_id: row.get("trainer_id")?,
            room_id: row.get("room_id")?,
            start_time: row.get("start_time")?,
            end_time: row.get("end_time")?,
            status: SessionStatus::parse(&status),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePtSession {
    pub member_id: i64,
    pub trainer_id: i64,
    pub room_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReschedulePtSession {
    pub trainer_id: i64,
    pub room_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSessionStatus {
    pub status: SessionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_status_round_trip() {
        for status in [
            SessionStatus::Booked,
            SessionStatus::Completed,
            SessionStatus::Cancelled,
        ] {
            assert_eq!(SessionStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn test_session_status_parse_unknown_defaults_to_booked() {
        assert_eq!(SessionStatus::parse("bogus"), SessionStatus::Booked);
    }

    #[test]
    fn test_session_status_deserializes_uppercase() {
        let parsed: UpdateSessionStatus =
            serde_json::from_str(r#"{"status":"COMPLETED"}"#).unwrap();
        assert_eq!(parsed.status, SessionStatus::Completed);
    }
}
