//! Treatment database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{map_integrity, Database, DbError, DbResult, IntegrityMessages};
use crate::models::{Treatment, TreatmentInput};

const TREATMENT_COLUMNS: &str = "id, record_id, name, cost, date, notes";

const TREATMENT_INTEGRITY: IntegrityMessages = IntegrityMessages {
    foreign_key: "Invalid record_id",
    unique: "This treatment already exists",
    check: "Cost cannot be negative",
};

fn treatment_from_row(row: &Row<'_>) -> rusqlite::Result<Treatment> {
    Ok(Treatment {
        id: row.get(0)?,
        record_id: row.get(1)?,
        name: row.get(2)?,
        cost: row.get(3)?,
        date: row.get(4)?,
        notes: row.get(5)?,
    })
}

impl Database {
    /// Add a treatment to a record.
    pub fn insert_treatment(&self, record_id: i64, input: &TreatmentInput) -> DbResult<Treatment> {
        self.conn
            .execute(
                r#"
                INSERT INTO treatments (record_id, name, cost, date, notes)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![record_id, input.name, input.cost, input.date, input.notes],
            )
            .map_err(|e| map_integrity(e, &TREATMENT_INTEGRITY))?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(treatment_id = id, record_id, cost = input.cost, "treatment created");

        self.get_treatment(id)?
            .ok_or_else(|| DbError::NotFound(format!("treatment {}", id)))
    }

    /// Update an existing treatment.
    pub fn update_treatment(&self, id: i64, input: &TreatmentInput) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute(
                r#"
                UPDATE treatments SET
                    name = ?2,
                    cost = ?3,
                    date = ?4,
                    notes = ?5
                WHERE id = ?1
                "#,
                params![id, input.name, input.cost, input.date, input.notes],
            )
            .map_err(|e| map_integrity(e, &TREATMENT_INTEGRITY))?;
        if rows_affected > 0 {
            tracing::info!(treatment_id = id, cost = input.cost, "treatment updated");
        }
        Ok(rows_affected > 0)
    }

    /// Get a treatment by ID.
    pub fn get_treatment(&self, id: i64) -> DbResult<Option<Treatment>> {
        self.conn
            .query_row(
                &format!("SELECT {TREATMENT_COLUMNS} FROM treatments WHERE id = ?"),
                [id],
                treatment_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Treatments of a record, most recent date first.
    pub fn list_treatments(&self, record_id: i64) -> DbResult<Vec<Treatment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TREATMENT_COLUMNS} FROM treatments WHERE record_id = ? ORDER BY date DESC, id DESC"
        ))?;
        let rows = stmt.query_map([record_id], treatment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a treatment.
    pub fn delete_treatment(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM treatments WHERE id = ?", [id])?;
        if rows_affected > 0 {
            tracing::info!(treatment_id = id, "treatment deleted");
        }
        Ok(rows_affected > 0)
    }
}
