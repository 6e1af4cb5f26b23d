//! Clinic ledger export: every record with its totals, as JSON or CSV.

use serde::{Deserialize, Serialize};

use super::ExportResult;
use crate::db::Database;
use crate::models::{BalanceStatus, Financials, RecordSummary};

/// One ledger line per record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub record_id: i64,
    pub doctor: String,
    pub patient: String,
    pub created_at: String,
    pub cost: f64,
    pub amount: f64,
    pub balance: f64,
    pub status: BalanceStatus,
}

impl From<&RecordSummary> for LedgerRow {
    fn from(summary: &RecordSummary) -> Self {
        Self {
            record_id: summary.record.id,
            doctor: summary.record.doctor_name.clone(),
            patient: summary.record.patient_name.clone(),
            created_at: summary.record.created_at.clone(),
            cost: summary.financials.cost,
            amount: summary.financials.amount,
            balance: summary.financials.balance,
            status: summary.financials.status(),
        }
    }
}

/// Ledger of all records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerExport {
    /// Export timestamp
    pub exported_at: String,
    pub rows: Vec<LedgerRow>,
    /// Sum over all rows
    pub totals: Financials,
}

impl LedgerExport {
    /// Build the ledger from the records currently stored.
    pub fn from_db(db: &Database) -> ExportResult<Self> {
        let summaries = db.list_records()?;
        let rows: Vec<LedgerRow> = summaries.iter().map(LedgerRow::from).collect();
        let totals = Financials::new(
            rows.iter().map(|r| r.cost).sum(),
            rows.iter().map(|r| r.amount).sum(),
        );
        tracing::debug!(rows = rows.len(), "ledger built");

        Ok(Self {
            exported_at: chrono::Utc::now().to_rfc3339(),
            rows,
            totals,
        })
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("record_id,doctor,patient,created_at,cost,amount,balance,status\n");

        for row in &self.rows {
            csv.push_str(&format!(
                "{},{},{},{},{:.2},{:.2},{:.2},{:?}\n",
                row.record_id,
                escape_csv(&row.doctor),
                escape_csv(&row.patient),
                escape_csv(&row.created_at),
                row.cost,
                row.amount,
                row.balance,
                row.status,
            ));
        }

        csv
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DoctorInput, PatientInput, PaymentInput, TreatmentInput};

    fn setup_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        let doctor = db.insert_doctor(&DoctorInput::new("Dr. Huda, DDS")).unwrap();
        let layla = db
            .insert_patient(&PatientInput::new("Layla", "0501234567"))
            .unwrap();
        let sami = db
            .insert_patient(&PatientInput::new("Sami \"Jr\"", "0509876543"))
            .unwrap();

        let first = db.insert_record(doctor.id, layla.id).unwrap();
        db.insert_treatment(first.id, &TreatmentInput::new("Filling", 100.0))
            .unwrap();
        db.insert_payment(first.id, &PaymentInput::new(40.0)).unwrap();

        let second = db.insert_record(doctor.id, sami.id).unwrap();
        db.insert_payment(second.id, &PaymentInput::new(25.0)).unwrap();
        db
    }

    #[test]
    fn test_ledger_totals() {
        let ledger = LedgerExport::from_db(&setup_db()).unwrap();

        assert_eq!(ledger.rows.len(), 2);
        assert_eq!(ledger.totals, Financials::new(100.0, 65.0));
        assert!(ledger
            .rows
            .iter()
            .any(|r| r.status == BalanceStatus::Overpaid && r.balance == -25.0));
    }

    #[test]
    fn test_to_csv() {
        let ledger = LedgerExport::from_db(&setup_db()).unwrap();
        let csv = ledger.to_csv();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("record_id,doctor"));
        assert!(csv.contains("\"Dr. Huda, DDS\""));
        assert!(csv.contains("\"Sami \"\"Jr\"\"\""));
        assert!(csv.contains("100.00,40.00,60.00,Outstanding"));
    }

    #[test]
    fn test_to_json() {
        let ledger = LedgerExport::from_db(&setup_db()).unwrap();
        let json = ledger.to_json().unwrap();

        let parsed: LedgerExport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.rows, ledger.rows);
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("two\nlines"), "\"two\nlines\"");
    }
}
