use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::ErrorCode;
use thiserror::Error;

/// Broad category a rejection belongs to, used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    Validation,
    NotFound,
    Conflict,
}

/// Business-level reasons a write is refused before or at commit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("End time must be after start time")]
    InvalidWindow,

    #[error("Target date must be on or after start date")]
    InvalidDateRange,

    #[error("Max capacity cannot exceed the room capacity")]
    CapacityExceedsRoom,

    #[error("Max capacity cannot drop below the {registered} existing registrations")]
    CapacityBelowRegistrations { registered: i64 },

    #[error("Trainer already has a booking in that window")]
    TrainerConflict,

    #[error("Room already booked in that window")]
    RoomConflict,

    #[error("Slot overlaps with an existing availability entry")]
    AvailabilityOverlap,

    #[error("Member already registered for this class")]
    AlreadyRegistered,

    #[error("Class not found")]
    ClassNotFound,

    #[error("Class is full")]
    ClassFull,

    #[error("Email is already in use")]
    DuplicateEmail,
}

impl Rejection {
    pub fn kind(&self) -> RejectionKind {
        match self {
            Rejection::InvalidWindow
            | Rejection::InvalidDateRange
            | Rejection::CapacityExceedsRoom
            | Rejection::CapacityBelowRegistrations { .. } => RejectionKind::Validation,
            Rejection::ClassNotFound => RejectionKind::NotFound,
            Rejection::TrainerConflict
            | Rejection::RoomConflict
            | Rejection::AvailabilityOverlap
            | Rejection::AlreadyRegistered
            | Rejection::ClassFull
            | Rejection::DuplicateEmail => RejectionKind::Conflict,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    Rejected(#[from] Rejection),

    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(entity: &str) -> Self {
        AppError::NotFound(format!("{} not found", entity))
    }

    /// The typed rejection carried by this error, if any.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            AppError::Rejected(r) => Some(r),
            _ => None,
        }
    }
}

/// Classify a failed write. Trigger aborts and unique violations become typed
/// rejections; any other constraint failure is an integrity error.
pub fn classify_write_error(err: rusqlite::Error) -> AppError {
    let (code, message) = match &err {
        rusqlite::Error::SqliteFailure(e, msg) => (e.code, msg.clone().unwrap_or_default()),
        _ => return AppError::Database(err),
    };

    if code != ErrorCode::ConstraintViolation {
        return AppError::Database(err);
    }

    if message.contains("class is full") {
        Rejection::ClassFull.into()
    } else if message.contains("class does not exist") {
        Rejection::ClassNotFound.into()
    } else if message.contains("UNIQUE") && message.contains("class_registration") {
        Rejection::AlreadyRegistered.into()
    } else if message.contains("UNIQUE") && message.contains(".email") {
        Rejection::DuplicateEmail.into()
    } else {
        AppError::Integrity(message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::Pool(e) => {
                tracing::error!("Pool error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Rejected(rejection) => {
                let status = match rejection.kind() {
                    RejectionKind::Validation => StatusCode::BAD_REQUEST,
                    RejectionKind::NotFound => StatusCode::NOT_FOUND,
                    RejectionKind::Conflict => StatusCode::CONFLICT,
                };
                (status, rejection.to_string())
            }
            AppError::Integrity(msg) => {
                tracing::error!("Integrity error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Operation failed".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn constraint_error(message: &str) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT),
            Some(message.to_string()),
        )
    }

    #[test]
    fn test_classify_trigger_messages() {
        let full = classify_write_error(constraint_error("class is full"));
        assert_eq!(full.rejection(), Some(&Rejection::ClassFull));

        let missing = classify_write_error(constraint_error("class does not exist"));
        assert_eq!(missing.rejection(), Some(&Rejection::ClassNotFound));
    }

    #[test]
    fn test_classify_unique_violations() {
        let dup = classify_write_error(constraint_error(
            "UNIQUE constraint failed: class_registration.member_id, class_registration.class_id",
        ));
        assert_eq!(dup.rejection(), Some(&Rejection::AlreadyRegistered));

        let email = classify_write_error(constraint_error("UNIQUE constraint failed: member.email"));
        assert_eq!(email.rejection(), Some(&Rejection::DuplicateEmail));
    }

    #[test]
    fn test_classify_other_constraint_is_integrity() {
        let err = classify_write_error(constraint_error("FOREIGN KEY constraint failed"));
        assert!(matches!(err, AppError::Integrity(_)));
    }

    #[test]
    fn test_rejection_kinds() {
        assert_eq!(Rejection::InvalidWindow.kind(), RejectionKind::Validation);
        assert_eq!(Rejection::ClassNotFound.kind(), RejectionKind::NotFound);
        assert_eq!(Rejection::TrainerConflict.kind(), RejectionKind::Conflict);
        assert_eq!(Rejection::ClassFull.kind(), RejectionKind::Conflict);
    }
}
