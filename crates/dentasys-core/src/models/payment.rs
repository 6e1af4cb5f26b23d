//! Payment models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Money received against a record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: i64,
    pub record_id: i64,
    pub amount: f64,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Validated fields for creating or updating a payment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentInput {
    pub amount: f64,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl PaymentInput {
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            date: None,
            notes: None,
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}
