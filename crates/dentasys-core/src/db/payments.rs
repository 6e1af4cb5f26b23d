//! Payment database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{map_integrity, Database, DbError, DbResult, IntegrityMessages};
use crate::models::{Payment, PaymentInput};

const PAYMENT_COLUMNS: &str = "id, record_id, amount, date, notes";

const PAYMENT_INTEGRITY: IntegrityMessages = IntegrityMessages {
    foreign_key: "Invalid record_id",
    unique: "This payment already exists",
    check: "Payment amount must be greater than zero",
};

fn payment_from_row(row: &Row<'_>) -> rusqlite::Result<Payment> {
    Ok(Payment {
        id: row.get(0)?,
        record_id: row.get(1)?,
        amount: row.get(2)?,
        date: row.get(3)?,
        notes: row.get(4)?,
    })
}

impl Database {
    /// Record a payment against a record.
    pub fn insert_payment(&self, record_id: i64, input: &PaymentInput) -> DbResult<Payment> {
        self.conn
            .execute(
                "INSERT INTO payments (record_id, amount, date, notes) VALUES (?1, ?2, ?3, ?4)",
                params![record_id, input.amount, input.date, input.notes],
            )
            .map_err(|e| map_integrity(e, &PAYMENT_INTEGRITY))?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(payment_id = id, record_id, amount = input.amount, "payment created");

        self.get_payment(id)?
            .ok_or_else(|| DbError::NotFound(format!("payment {}", id)))
    }

    /// Update an existing payment.
    pub fn update_payment(&self, id: i64, input: &PaymentInput) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute(
                "UPDATE payments SET amount = ?2, date = ?3, notes = ?4 WHERE id = ?1",
                params![id, input.amount, input.date, input.notes],
            )
            .map_err(|e| map_integrity(e, &PAYMENT_INTEGRITY))?;
        if rows_affected > 0 {
            tracing::info!(payment_id = id, amount = input.amount, "payment updated");
        }
        Ok(rows_affected > 0)
    }

    /// Get a payment by ID.
    pub fn get_payment(&self, id: i64) -> DbResult<Option<Payment>> {
        self.conn
            .query_row(
                &format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = ?"),
                [id],
                payment_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Payments of a record, most recent date first.
    pub fn list_payments(&self, record_id: i64) -> DbResult<Vec<Payment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE record_id = ? ORDER BY date DESC, id DESC"
        ))?;
        let rows = stmt.query_map([record_id], payment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a payment.
    pub fn delete_payment(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM payments WHERE id = ?", [id])?;
        if rows_affected > 0 {
            tracing::info!(payment_id = id, "payment deleted");
        }
        Ok(rows_affected > 0)
    }
}
