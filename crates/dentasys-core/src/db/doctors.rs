//! Doctor database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{like_pattern, map_integrity, Database, DbResult, DeleteOutcome, IntegrityMessages};
use crate::models::{Doctor, DoctorInput};
use crate::search::rank_by_similarity;

const DOCTOR_COLUMNS: &str = "id, name, phone, created_at, deleted_at";

const DOCTOR_INTEGRITY: IntegrityMessages = IntegrityMessages {
    foreign_key: "Doctor is referenced by existing records",
    unique: "This doctor already exists",
    check: "Invalid doctor data",
};

fn doctor_from_row(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        created_at: row.get(3)?,
        deleted_at: row.get(4)?,
    })
}

impl Database {
    /// Insert a new doctor and return the stored row.
    pub fn insert_doctor(&self, input: &DoctorInput) -> DbResult<Doctor> {
        self.conn
            .execute(
                "INSERT INTO doctors (name, phone) VALUES (?1, ?2)",
                params![input.name, input.phone],
            )
            .map_err(|e| map_integrity(e, &DOCTOR_INTEGRITY))?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(doctor_id = id, "doctor created");
        self.require_doctor(id)
    }

    /// Update an existing doctor.
    pub fn update_doctor(&self, id: i64, input: &DoctorInput) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute(
                "UPDATE doctors SET name = ?2, phone = ?3 WHERE id = ?1",
                params![id, input.name, input.phone],
            )
            .map_err(|e| map_integrity(e, &DOCTOR_INTEGRITY))?;
        if rows_affected > 0 {
            tracing::info!(doctor_id = id, "doctor updated");
        }
        Ok(rows_affected > 0)
    }

    /// Get a doctor by ID, including soft-deleted ones.
    pub fn get_doctor(&self, id: i64) -> DbResult<Option<Doctor>> {
        self.conn
            .query_row(
                &format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE id = ?"),
                [id],
                doctor_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    pub(crate) fn require_doctor(&self, id: i64) -> DbResult<Doctor> {
        self.get_doctor(id)?
            .ok_or_else(|| super::DbError::NotFound(format!("doctor {}", id)))
    }

    /// List active doctors ordered by name.
    pub fn list_doctors(&self) -> DbResult<Vec<Doctor>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {DOCTOR_COLUMNS} FROM doctors WHERE deleted_at IS NULL ORDER BY name, id"
        ))?;
        let rows = stmt.query_map([], doctor_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List every doctor, soft-deleted ones included.
    pub fn list_all_doctors(&self) -> DbResult<Vec<Doctor>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {DOCTOR_COLUMNS} FROM doctors ORDER BY name, id"))?;
        let rows = stmt.query_map([], doctor_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Search active doctors by name or phone, closest names first.
    pub fn search_doctors(&self, term: &str) -> DbResult<Vec<Doctor>> {
        let term = term.trim();
        if term.is_empty() {
            return self.list_doctors();
        }

        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {DOCTOR_COLUMNS}
            FROM doctors
            WHERE deleted_at IS NULL
              AND (name LIKE ?1 ESCAPE '\' OR IFNULL(phone, '') LIKE ?1 ESCAPE '\')
            ORDER BY name, id
            "#
        ))?;
        let rows = stmt.query_map([like_pattern(term)], doctor_from_row)?;
        let doctors = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(rank_by_similarity(doctors, term, |d| d.name.as_str()))
    }

    /// Whether the doctor owns any record.
    pub fn doctor_has_records(&self, id: i64) -> DbResult<bool> {
        self.exists("records", "doctor_id", id)
    }

    /// Delete a doctor.
    ///
    /// Doctors that own records are soft-deleted so the records keep their
    /// history; others are removed.
    pub fn delete_doctor(&self, id: i64) -> DbResult<DeleteOutcome> {
        let tx = self.conn.unchecked_transaction()?;

        let outcome = if !self.exists("doctors", "id", id)? {
            DeleteOutcome::NotFound
        } else if self.doctor_has_records(id)? {
            tx.execute(
                "UPDATE doctors SET deleted_at = COALESCE(deleted_at, datetime('now')) WHERE id = ?",
                [id],
            )?;
            DeleteOutcome::SoftDeleted
        } else {
            tx.execute("DELETE FROM doctors WHERE id = ?", [id])?;
            DeleteOutcome::Removed
        };

        tx.commit()?;
        tracing::info!(doctor_id = id, ?outcome, "doctor delete");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbError;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();

        let doctor = db
            .insert_doctor(&DoctorInput::new("Dr. Huda").with_phone("0501234567"))
            .unwrap();

        let retrieved = db.get_doctor(doctor.id).unwrap().unwrap();
        assert_eq!(retrieved.name, "Dr. Huda");
        assert_eq!(retrieved.phone, Some("0501234567".into()));
        assert!(retrieved.is_active());
        assert!(!retrieved.created_at.is_empty());
    }

    #[test]
    fn test_update_doctor() {
        let db = setup_db();
        let doctor = db.insert_doctor(&DoctorInput::new("Dr. Huda")).unwrap();

        let updated = db
            .update_doctor(doctor.id, &DoctorInput::new("Dr. Huda Saleh").with_phone("0509999999"))
            .unwrap();
        assert!(updated);
        assert!(!db.update_doctor(999, &DoctorInput::new("Nobody")).unwrap());

        let retrieved = db.get_doctor(doctor.id).unwrap().unwrap();
        assert_eq!(retrieved.name, "Dr. Huda Saleh");
        assert_eq!(retrieved.phone, Some("0509999999".into()));
    }

    #[test]
    fn test_search_doctors() {
        let db = setup_db();
        db.insert_doctor(&DoctorInput::new("Dr. Omar")).unwrap();
        db.insert_doctor(&DoctorInput::new("Dr. Omaima").with_phone("0551112222"))
            .unwrap();
        db.insert_doctor(&DoctorInput::new("Dr. Rana")).unwrap();

        let results = db.search_doctors("oma").unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|d| d.name.starts_with("Dr. Oma")));

        let by_phone = db.search_doctors("111").unwrap();
        assert_eq!(by_phone.len(), 1);
        assert_eq!(by_phone[0].name, "Dr. Omaima");

        assert_eq!(db.search_doctors("  ").unwrap().len(), 3);
        assert!(db.search_doctors("%").unwrap().is_empty());
    }

    #[test]
    fn test_delete_without_records_removes() {
        let db = setup_db();
        let doctor = db.insert_doctor(&DoctorInput::new("Dr. Omar")).unwrap();

        assert_eq!(db.delete_doctor(doctor.id).unwrap(), DeleteOutcome::Removed);
        assert!(db.get_doctor(doctor.id).unwrap().is_none());
        assert_eq!(db.delete_doctor(doctor.id).unwrap(), DeleteOutcome::NotFound);
    }

    #[test]
    fn test_missing_doctor_is_not_found_error() {
        let db = setup_db();
        assert!(matches!(db.require_doctor(42), Err(DbError::NotFound(_))));
    }
}
