use rusqlite::Row;

/// Build a model from a row whose columns are selected by name.
pub trait FromSqliteRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}
