//! Dashboard statistics.

use serde::{Deserialize, Serialize};

use super::{Database, DbResult};
use crate::models::Financials;

/// Clinic-wide counts and totals for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClinicStats {
    /// Active doctors
    pub doctors: i64,
    /// Active patients
    pub patients: i64,
    pub records: i64,
    pub totals: Financials,
}

impl Database {
    /// Counts of active doctors and patients, all records, and money totals.
    pub fn clinic_stats(&self) -> DbResult<ClinicStats> {
        let (doctors, patients, records, cost, amount): (i64, i64, i64, f64, f64) =
            self.conn.query_row(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM doctors WHERE deleted_at IS NULL),
                    (SELECT COUNT(*) FROM patients WHERE deleted_at IS NULL),
                    (SELECT COUNT(*) FROM records),
                    (SELECT COALESCE(SUM(cost), 0.0) FROM treatments),
                    (SELECT COALESCE(SUM(amount), 0.0) FROM payments)
                "#,
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
            )?;

        Ok(ClinicStats {
            doctors,
            patients,
            records,
            totals: Financials::new(cost, amount),
        })
    }
}
