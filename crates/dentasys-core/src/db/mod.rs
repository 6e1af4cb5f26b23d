//! Database layer for DentaSys.

mod schema;
mod doctors;
mod patients;
mod records;
mod treatments;
mod payments;
mod stats;

pub use schema::*;
pub use stats::*;

use rusqlite::{ffi, Connection, ErrorCode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// A foreign key, uniqueness or check constraint rejected the write.
    #[error("{0}")]
    Integrity(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Which children keep a record from being deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependents {
    pub treatments: bool,
    pub payments: bool,
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeleteOutcome {
    /// Row removed from storage.
    Removed,
    /// Row kept and marked deleted because other rows reference it.
    SoftDeleted,
    /// Nothing changed; the row still owns children.
    Refused(Dependents),
    /// No row with that id.
    NotFound,
}

impl DeleteOutcome {
    /// True when the row no longer shows up in active listings.
    pub fn is_success(&self) -> bool {
        matches!(self, DeleteOutcome::Removed | DeleteOutcome::SoftDeleted)
    }
}

/// Messages used when SQLite rejects a write on integrity grounds.
pub(crate) struct IntegrityMessages {
    pub foreign_key: &'static str,
    pub unique: &'static str,
    pub check: &'static str,
}

/// Map SQLite constraint failures to [`DbError::Integrity`].
pub(crate) fn map_integrity(err: rusqlite::Error, messages: &IntegrityMessages) -> DbError {
    if let rusqlite::Error::SqliteFailure(ffi_err, _) = &err {
        if ffi_err.code == ErrorCode::ConstraintViolation {
            let message = match ffi_err.extended_code {
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => messages.foreign_key,
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    messages.unique
                }
                ffi::SQLITE_CONSTRAINT_CHECK => messages.check,
                _ => return DbError::Constraint(err.to_string()),
            };
            return DbError::Integrity(message.to_string());
        }
    }
    DbError::Sqlite(err)
}

/// Escape `%`, `_` and `\` for a `LIKE ... ESCAPE '\'` pattern.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        tracing::debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction.
    pub fn transaction(&mut self) -> DbResult<rusqlite::Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }

    /// Whether any row in `table` has `column = id`.
    fn exists(&self, table: &str, column: &str, id: i64) -> DbResult<bool> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE {column} = ? LIMIT 1)");
        let found: bool = self.conn.query_row(&sql, [id], |row| row.get(0))?;
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();

        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        for table in ["doctors", "patients", "records", "treatments", "payments"] {
            assert!(tables.contains(&table.to_string()), "missing {}", table);
        }
    }

    #[test]
    fn test_open_file_creates_parent_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinic").join("dentasys.db");

        {
            let db = Database::open(&path).unwrap();
            db.conn()
                .execute("INSERT INTO doctors (name) VALUES ('Dr. Huda')", [])
                .unwrap();
        }

        // Schema creation is idempotent and data survives reopen
        let db = Database::open(&path).unwrap();
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM doctors", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_like_pattern_escapes() {
        assert_eq!(like_pattern("ab"), "%ab%");
        assert_eq!(like_pattern("50%_x\\"), "%50\\%\\_x\\\\%");
    }

    #[test]
    fn test_delete_outcome_success() {
        assert!(DeleteOutcome::Removed.is_success());
        assert!(DeleteOutcome::SoftDeleted.is_success());
        assert!(!DeleteOutcome::NotFound.is_success());
        assert!(!DeleteOutcome::Refused(Dependents {
            treatments: true,
            payments: false
        })
        .is_success());
    }
}
