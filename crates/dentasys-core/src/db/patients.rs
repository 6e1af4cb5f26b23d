//! Patient database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{like_pattern, map_integrity, Database, DbError, DbResult, DeleteOutcome, IntegrityMessages};
use crate::models::{Gender, Patient, PatientInput};
use crate::search::rank_by_similarity;

const PATIENT_COLUMNS: &str = "id, name, phone, gender, birth_date, notes, created_at, deleted_at";

const PATIENT_INTEGRITY: IntegrityMessages = IntegrityMessages {
    foreign_key: "Patient is referenced by existing records",
    unique: "This patient already exists",
    check: "Invalid patient data",
};

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    let gender: Option<String> = row.get(3)?;
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        gender: gender.and_then(|g| g.parse::<Gender>().ok()),
        birth_date: row.get(4)?,
        notes: row.get(5)?,
        created_at: row.get(6)?,
        deleted_at: row.get(7)?,
    })
}

impl Database {
    /// Insert a new patient and return the stored row.
    pub fn insert_patient(&self, input: &PatientInput) -> DbResult<Patient> {
        self.conn
            .execute(
                r#"
                INSERT INTO patients (name, phone, gender, birth_date, notes)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    input.name,
                    input.phone,
                    input.gender.map(Gender::as_str),
                    input.birth_date,
                    input.notes,
                ],
            )
            .map_err(|e| map_integrity(e, &PATIENT_INTEGRITY))?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(patient_id = id, "patient created");
        self.require_patient(id)
    }

    /// Update an existing patient.
    pub fn update_patient(&self, id: i64, input: &PatientInput) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute(
                r#"
                UPDATE patients SET
                    name = ?2,
                    phone = ?3,
                    gender = ?4,
                    birth_date = ?5,
                    notes = ?6
                WHERE id = ?1
                "#,
                params![
                    id,
                    input.name,
                    input.phone,
                    input.gender.map(Gender::as_str),
                    input.birth_date,
                    input.notes,
                ],
            )
            .map_err(|e| map_integrity(e, &PATIENT_INTEGRITY))?;
        if rows_affected > 0 {
            tracing::info!(patient_id = id, "patient updated");
        }
        Ok(rows_affected > 0)
    }

    /// Get a patient by ID, including soft-deleted ones.
    pub fn get_patient(&self, id: i64) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?"),
                [id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    pub(crate) fn require_patient(&self, id: i64) -> DbResult<Patient> {
        self.get_patient(id)?
            .ok_or_else(|| DbError::NotFound(format!("patient {}", id)))
    }

    /// List active patients ordered by name.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients WHERE deleted_at IS NULL ORDER BY name, id"
        ))?;
        let rows = stmt.query_map([], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List every patient, soft-deleted ones included.
    pub fn list_all_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {PATIENT_COLUMNS} FROM patients ORDER BY name, id"))?;
        let rows = stmt.query_map([], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Search active patients by name or phone, closest names first.
    pub fn search_patients(&self, term: &str) -> DbResult<Vec<Patient>> {
        let term = term.trim();
        if term.is_empty() {
            return self.list_patients();
        }

        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {PATIENT_COLUMNS}
            FROM patients
            WHERE deleted_at IS NULL
              AND (name LIKE ?1 ESCAPE '\' OR phone LIKE ?1 ESCAPE '\')
            ORDER BY name, id
            "#
        ))?;
        let rows = stmt.query_map([like_pattern(term)], patient_from_row)?;
        let patients = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(rank_by_similarity(patients, term, |p| p.name.as_str()))
    }

    /// Whether the patient owns any record.
    pub fn patient_has_records(&self, id: i64) -> DbResult<bool> {
        self.exists("records", "patient_id", id)
    }

    /// Delete a patient.
    ///
    /// Patients that own records are soft-deleted; others are removed.
    pub fn delete_patient(&self, id: i64) -> DbResult<DeleteOutcome> {
        let tx = self.conn.unchecked_transaction()?;

        let outcome = if !self.exists("patients", "id", id)? {
            DeleteOutcome::NotFound
        } else if self.patient_has_records(id)? {
            tx.execute(
                "UPDATE patients SET deleted_at = COALESCE(deleted_at, datetime('now')) WHERE id = ?",
                [id],
            )?;
            DeleteOutcome::SoftDeleted
        } else {
            tx.execute("DELETE FROM patients WHERE id = ?", [id])?;
            DeleteOutcome::Removed
        };

        tx.commit()?;
        tracing::info!(patient_id = id, ?outcome, "patient delete");
        Ok(outcome)
    }
}
