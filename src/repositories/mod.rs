pub mod class_repo;
pub mod dashboard_repo;
pub mod invoice_repo;
pub mod member_repo;
pub mod progress_repo;
pub mod room_repo;
pub mod session_repo;
pub mod trainer_repo;

pub use class_repo::ClassRepository;
pub use dashboard_repo::DashboardRepository;
pub use invoice_repo::InvoiceRepository;
pub use member_repo::MemberRepository;
pub use progress_repo::ProgressRepository;
pub use room_repo::RoomRepository;
pub use session_repo::SessionRepository;
pub use trainer_repo::TrainerRepository;

use rusqlite::Connection;

use crate::error::{AppError, Result};

/// Whether a row with the given primary key exists. `table` and `key` are
/// always compile-time identifiers, never user input.
pub(crate) fn row_exists(conn: &Connection, table: &str, key: &str, id: i64) -> Result<bool> {
    let sql = format!("SELECT EXISTS (SELECT 1 FROM {table} WHERE {key} = ?)");
    Ok(conn.query_row(&sql, [id], |row| row.get(0))?)
}

/// Trim a required text field, rejecting it when blank.
pub(crate) fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Blank optional text is stored as NULL.
pub(crate) fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::db::{create_memory_pool, create_pool, DbPool};
    use crate::migrations::{run_migrations, run_migrations_for_tests};
    use chrono::{NaiveDate, NaiveDateTime};
    use std::path::PathBuf;

    pub fn setup_test_db() -> DbPool {
        let pool = create_memory_pool().expect("Failed to create test database");
        run_migrations_for_tests(&pool).expect("Failed to run migrations");
        pool
    }

    /// A database file in the temp dir, served by the multi-connection pool,
    /// so writers from different connections really contend for the lock.
    /// The file is removed on drop.
    pub struct FileDb {
        pub pool: DbPool,
        path: PathBuf,
    }

    impl Drop for FileDb {
        fn drop(&mut self) {
            let journal = self.path.with_extension("db-journal");
            let _ = std::fs::remove_file(&self.path);
            let _ = std::fs::remove_file(journal);
        }
    }

    pub fn setup_file_db(name: &str) -> FileDb {
        let path = std::env::temp_dir().join(format!(
            "fitclub-{}-{}.db",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let pool = create_pool(path.to_str().unwrap()).expect("Failed to open test database file");
        run_migrations(&pool).expect("Failed to run migrations");
        FileDb { pool, path }
    }

    pub fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    pub fn insert_member(pool: &DbPool, name: &str, email: &str) -> i64 {
        let conn = pool.get().unwrap();
        conn.execute(
            "INSERT INTO member (full_name, email) VALUES (?, ?)",
            [name, email],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    pub fn insert_trainer(pool: &DbPool, name: &str, email: &str) -> i64 {
        let conn = pool.get().unwrap();
        conn.execute(
            "INSERT INTO trainer (full_name, email) VALUES (?, ?)",
            [name, email],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    pub fn insert_room(pool: &DbPool, name: &str, capacity: i64) -> i64 {
        let conn = pool.get().unwrap();
        conn.execute(
            "INSERT INTO room (name, capacity) VALUES (?, ?)",
            rusqlite::params![name, capacity],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    pub fn count_rows(pool: &DbPool, table: &str) -> i64 {
        let conn = pool.get().unwrap();
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })
        .unwrap()
    }
}
