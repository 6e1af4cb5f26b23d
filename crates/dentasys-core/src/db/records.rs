//! Record database operations: the deletion guard and financial totals.

use rusqlite::{params, OptionalExtension, Row};

use super::{
    like_pattern, map_integrity, Database, DbError, DbResult, DeleteOutcome, Dependents,
    IntegrityMessages,
};
use crate::models::{Financials, Record, RecordSummary};

const RECORD_SELECT: &str = r#"
    SELECT r.id, r.doctor_id, r.patient_id, r.created_at, d.name, p.name
    FROM records r
    JOIN doctors d ON r.doctor_id = d.id
    JOIN patients p ON r.patient_id = p.id
"#;

const RECORD_INTEGRITY: IntegrityMessages = IntegrityMessages {
    foreign_key: "Invalid doctor_id or patient_id",
    unique: "This doctor-patient record already exists",
    check: "Invalid record data",
};

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record {
        id: row.get(0)?,
        doctor_id: row.get(1)?,
        patient_id: row.get(2)?,
        created_at: row.get(3)?,
        doctor_name: row.get(4)?,
        patient_name: row.get(5)?,
    })
}

impl Database {
    /// Create a record linking a doctor and a patient.
    ///
    /// Both must exist and be active; the pair must not already have a record.
    pub fn insert_record(&self, doctor_id: i64, patient_id: i64) -> DbResult<Record> {
        self.ensure_assignable(Some(doctor_id), Some(patient_id))?;

        self.conn
            .execute(
                "INSERT INTO records (doctor_id, patient_id) VALUES (?1, ?2)",
                params![doctor_id, patient_id],
            )
            .map_err(|e| map_integrity(e, &RECORD_INTEGRITY))?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(record_id = id, doctor_id, patient_id, "record created");

        self.get_record(id)?
            .ok_or_else(|| DbError::NotFound(format!("record {}", id)))
    }

    /// Reassign a record's doctor or patient.
    ///
    /// Keeping a doctor or patient that has since been soft-deleted is allowed;
    /// switching to one is not.
    pub fn update_record(&self, id: i64, doctor_id: i64, patient_id: i64) -> DbResult<bool> {
        let Some(existing) = self.get_record(id)? else {
            return Ok(false);
        };
        self.ensure_assignable(
            (doctor_id != existing.doctor_id).then_some(doctor_id),
            (patient_id != existing.patient_id).then_some(patient_id),
        )?;

        let rows_affected = self
            .conn
            .execute(
                "UPDATE records SET doctor_id = ?2, patient_id = ?3 WHERE id = ?1",
                params![id, doctor_id, patient_id],
            )
            .map_err(|e| map_integrity(e, &RECORD_INTEGRITY))?;
        if rows_affected > 0 {
            tracing::info!(record_id = id, doctor_id, patient_id, "record updated");
        }
        Ok(rows_affected > 0)
    }

    /// A record may only point at doctors and patients that are still active.
    fn ensure_assignable(&self, doctor_id: Option<i64>, patient_id: Option<i64>) -> DbResult<()> {
        if let Some(id) = doctor_id {
            match self.get_doctor(id)? {
                None => return Err(DbError::Integrity(RECORD_INTEGRITY.foreign_key.into())),
                Some(d) if !d.is_active() => {
                    return Err(DbError::Constraint(format!("Doctor {} is deleted", d.name)))
                }
                Some(_) => {}
            }
        }
        if let Some(id) = patient_id {
            match self.get_patient(id)? {
                None => return Err(DbError::Integrity(RECORD_INTEGRITY.foreign_key.into())),
                Some(p) if !p.is_active() => {
                    return Err(DbError::Constraint(format!("Patient {} is deleted", p.name)))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Get a record by ID with doctor and patient names.
    pub fn get_record(&self, id: i64) -> DbResult<Option<Record>> {
        self.conn
            .query_row(
                &format!("{RECORD_SELECT} WHERE r.id = ?"),
                [id],
                record_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// All records, newest first, each with its current totals.
    pub fn list_records(&self) -> DbResult<Vec<RecordSummary>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT} ORDER BY r.created_at DESC, r.id DESC"))?;
        let records = stmt
            .query_map([], record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        self.summarize(records)
    }

    /// Records whose doctor or patient name contains `term`.
    pub fn search_records(&self, term: &str) -> DbResult<Vec<RecordSummary>> {
        let term = term.trim();
        if term.is_empty() {
            return self.list_records();
        }

        let mut stmt = self.conn.prepare(&format!(
            r#"
            {RECORD_SELECT}
            WHERE d.name LIKE ?1 ESCAPE '\' OR p.name LIKE ?1 ESCAPE '\'
            ORDER BY r.created_at DESC, r.id DESC
            "#
        ))?;
        let records = stmt
            .query_map([like_pattern(term)], record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        self.summarize(records)
    }

    /// Records of one doctor, newest first.
    pub fn list_records_for_doctor(&self, doctor_id: i64) -> DbResult<Vec<Record>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RECORD_SELECT} WHERE r.doctor_id = ? ORDER BY r.created_at DESC, r.id DESC"
        ))?;
        let rows = stmt.query_map([doctor_id], record_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Records of one patient, newest first.
    pub fn list_records_for_patient(&self, patient_id: i64) -> DbResult<Vec<Record>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RECORD_SELECT} WHERE r.patient_id = ? ORDER BY r.created_at DESC, r.id DESC"
        ))?;
        let rows = stmt.query_map([patient_id], record_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn summarize(&self, records: Vec<Record>) -> DbResult<Vec<RecordSummary>> {
        records
            .into_iter()
            .map(|record| {
                let financials = self.record_financials(record.id)?;
                Ok(RecordSummary { record, financials })
            })
            .collect()
    }

    pub fn record_has_treatments(&self, record_id: i64) -> DbResult<bool> {
        self.exists("treatments", "record_id", record_id)
    }

    pub fn record_has_payments(&self, record_id: i64) -> DbResult<bool> {
        self.exists("payments", "record_id", record_id)
    }

    /// Delete a record that owns no treatments and no payments.
    ///
    /// The existence checks and the delete share one transaction. A record
    /// with children is left untouched and reported as refused.
    pub fn delete_record(&self, id: i64) -> DbResult<DeleteOutcome> {
        let tx = self.conn.unchecked_transaction()?;

        if !self.exists("records", "id", id)? {
            return Ok(DeleteOutcome::NotFound);
        }

        let dependents = Dependents {
            treatments: self.record_has_treatments(id)?,
            payments: self.record_has_payments(id)?,
        };
        if dependents.treatments || dependents.payments {
            tracing::warn!(
                record_id = id,
                treatments = dependents.treatments,
                payments = dependents.payments,
                "record delete refused"
            );
            return Ok(DeleteOutcome::Refused(dependents));
        }

        tx.execute("DELETE FROM records WHERE id = ?", [id])?;
        tx.commit()?;
        tracing::info!(record_id = id, "record deleted");
        Ok(DeleteOutcome::Removed)
    }

    /// Sum of treatment costs for a record; 0 when there are none.
    pub fn record_cost(&self, record_id: i64) -> DbResult<f64> {
        let cost = self.conn.query_row(
            "SELECT COALESCE(SUM(cost), 0.0) FROM treatments WHERE record_id = ?",
            [record_id],
            |row| row.get(0),
        )?;
        Ok(cost)
    }

    /// Sum of payment amounts for a record; 0 when there are none.
    pub fn record_amount(&self, record_id: i64) -> DbResult<f64> {
        let amount = self.conn.query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM payments WHERE record_id = ?",
            [record_id],
            |row| row.get(0),
        )?;
        Ok(amount)
    }

    /// `cost - amount` for a record.
    pub fn record_balance(&self, record_id: i64) -> DbResult<f64> {
        Ok(self.record_financials(record_id)?.balance)
    }

    pub fn record_financials(&self, record_id: i64) -> DbResult<Financials> {
        Ok(Financials::new(
            self.record_cost(record_id)?,
            self.record_amount(record_id)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DoctorInput, PatientInput, PaymentInput, TreatmentInput};

    fn setup_db() -> (Database, i64, i64) {
        let db = Database::open_in_memory().unwrap();
        let doctor = db.insert_doctor(&DoctorInput::new("Dr. Huda")).unwrap();
        let patient = db
            .insert_patient(&PatientInput::new("Layla", "0501234567"))
            .unwrap();
        (db, doctor.id, patient.id)
    }

    #[test]
    fn test_insert_and_get() {
        let (db, doctor_id, patient_id) = setup_db();

        let record = db.insert_record(doctor_id, patient_id).unwrap();
        let retrieved = db.get_record(record.id).unwrap().unwrap();

        assert_eq!(retrieved.doctor_name, "Dr. Huda");
        assert_eq!(retrieved.patient_name, "Layla");
        assert_eq!(retrieved.doctor_id, doctor_id);
    }

    #[test]
    fn test_duplicate_pair_rejected() {
        let (db, doctor_id, patient_id) = setup_db();
        db.insert_record(doctor_id, patient_id).unwrap();

        let err = db.insert_record(doctor_id, patient_id).unwrap_err();
        assert!(matches!(err, DbError::Integrity(ref m) if m == "This doctor-patient record already exists"));
    }

    #[test]
    fn test_unknown_doctor_rejected() {
        let (db, _, patient_id) = setup_db();
        let err = db.insert_record(999, patient_id).unwrap_err();
        assert!(matches!(err, DbError::Integrity(ref m) if m == "Invalid doctor_id or patient_id"));
    }

    #[test]
    fn test_financials_example() {
        let (db, doctor_id, patient_id) = setup_db();
        let record = db.insert_record(doctor_id, patient_id).unwrap();

        db.insert_treatment(record.id, &TreatmentInput::new("Filling", 100.0))
            .unwrap();
        db.insert_treatment(record.id, &TreatmentInput::new("Scaling", 50.0))
            .unwrap();
        db.insert_payment(record.id, &PaymentInput::new(120.0)).unwrap();

        assert_eq!(record.cost(&db).unwrap(), 150.0);
        assert_eq!(record.amount(&db).unwrap(), 120.0);
        assert_eq!(record.balance(&db).unwrap(), 30.0);
    }

    #[test]
    fn test_empty_record_totals_zero() {
        let (db, doctor_id, patient_id) = setup_db();
        let record = db.insert_record(doctor_id, patient_id).unwrap();

        let financials = db.record_financials(record.id).unwrap();
        assert_eq!(financials, Financials::new(0.0, 0.0));
    }

    #[test]
    fn test_delete_refused_with_treatment() {
        let (db, doctor_id, patient_id) = setup_db();
        let record = db.insert_record(doctor_id, patient_id).unwrap();
        db.insert_treatment(record.id, &TreatmentInput::new("Filling", 100.0))
            .unwrap();

        let outcome = db.delete_record(record.id).unwrap();
        assert_eq!(
            outcome,
            DeleteOutcome::Refused(Dependents {
                treatments: true,
                payments: false
            })
        );
        assert!(db.get_record(record.id).unwrap().is_some());
        assert_eq!(db.list_treatments(record.id).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_refused_with_payment_only() {
        let (db, doctor_id, patient_id) = setup_db();
        let record = db.insert_record(doctor_id, patient_id).unwrap();
        db.insert_payment(record.id, &PaymentInput::new(20.0)).unwrap();

        let outcome = db.delete_record(record.id).unwrap();
        assert!(matches!(
            outcome,
            DeleteOutcome::Refused(Dependents {
                treatments: false,
                payments: true
            })
        ));
        assert!(db.get_record(record.id).unwrap().is_some());
    }

    #[test]
    fn test_delete_childless_record() {
        let (db, doctor_id, patient_id) = setup_db();
        let record = db.insert_record(doctor_id, patient_id).unwrap();

        assert_eq!(db.delete_record(record.id).unwrap(), DeleteOutcome::Removed);
        assert!(db.get_record(record.id).unwrap().is_none());
        assert_eq!(db.delete_record(record.id).unwrap(), DeleteOutcome::NotFound);
    }

    #[test]
    fn test_update_record() {
        let (db, doctor_id, patient_id) = setup_db();
        let other = db.insert_doctor(&DoctorInput::new("Dr. Omar")).unwrap();
        let record = db.insert_record(doctor_id, patient_id).unwrap();

        assert!(db.update_record(record.id, other.id, patient_id).unwrap());
        let retrieved = db.get_record(record.id).unwrap().unwrap();
        assert_eq!(retrieved.doctor_name, "Dr. Omar");

        assert!(!db.update_record(999, other.id, patient_id).unwrap());
    }

    #[test]
    fn test_search_records_by_either_name() {
        let (db, doctor_id, patient_id) = setup_db();
        let omar = db.insert_doctor(&DoctorInput::new("Dr. Omar")).unwrap();
        let sami = db
            .insert_patient(&PatientInput::new("Sami", "0509876543"))
            .unwrap();
        db.insert_record(doctor_id, patient_id).unwrap();
        db.insert_record(omar.id, sami.id).unwrap();

        assert_eq!(db.search_records("huda").unwrap().len(), 1);
        assert_eq!(db.search_records("SAMI").unwrap().len(), 1);
        assert_eq!(db.search_records("").unwrap().len(), 2);
        assert!(db.search_records("nobody").unwrap().is_empty());
    }

    #[test]
    fn test_list_records_newest_first_with_totals() {
        let (db, doctor_id, patient_id) = setup_db();
        let omar = db.insert_doctor(&DoctorInput::new("Dr. Omar")).unwrap();
        let first = db.insert_record(doctor_id, patient_id).unwrap();
        let second = db.insert_record(omar.id, patient_id).unwrap();
        db.insert_treatment(first.id, &TreatmentInput::new("Crown", 300.0))
            .unwrap();

        let summaries = db.list_records().unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].record.id, second.id);
        assert_eq!(summaries[1].financials.cost, 300.0);

        assert_eq!(db.list_records_for_patient(patient_id).unwrap().len(), 2);
        assert_eq!(db.list_records_for_doctor(omar.id).unwrap().len(), 1);
    }
}
