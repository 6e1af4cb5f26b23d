//! Treatment models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A billable treatment performed under a record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Treatment {
    pub id: i64,
    pub record_id: i64,
    pub name: String,
    pub cost: f64,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Validated fields for creating or updating a treatment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreatmentInput {
    pub name: String,
    pub cost: f64,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl TreatmentInput {
    pub fn new(name: impl Into<String>, cost: f64) -> Self {
        Self {
            name: name.into(),
            cost,
            date: None,
            notes: None,
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}
