//! Record models and financial aggregation.

use serde::{Deserialize, Serialize};

use crate::db::{Database, DbResult};

/// One doctor-patient treatment engagement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: i64,
    pub doctor_id: i64,
    pub patient_id: i64,
    /// Creation timestamp
    pub created_at: String,
    /// Joined from `doctors`
    pub doctor_name: String,
    /// Joined from `patients`
    pub patient_name: String,
}

impl Record {
    /// Sum of treatment costs, read from storage on every call.
    pub fn cost(&self, db: &Database) -> DbResult<f64> {
        db.record_cost(self.id)
    }

    /// Sum of payment amounts, read from storage on every call.
    pub fn amount(&self, db: &Database) -> DbResult<f64> {
        db.record_amount(self.id)
    }

    /// `cost - amount`. Negative when overpaid.
    pub fn balance(&self, db: &Database) -> DbResult<f64> {
        Ok(self.financials(db)?.balance)
    }

    pub fn financials(&self, db: &Database) -> DbResult<Financials> {
        db.record_financials(self.id)
    }
}

/// Totals for a record (or the whole clinic).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Financials {
    /// Total treatment cost
    pub cost: f64,
    /// Total paid
    pub amount: f64,
    /// cost - amount
    pub balance: f64,
}

impl Financials {
    pub fn new(cost: f64, amount: f64) -> Self {
        Self {
            cost,
            amount,
            balance: cost - amount,
        }
    }

    pub fn status(&self) -> BalanceStatus {
        BalanceStatus::of(self.balance)
    }
}

/// How a balance is presented.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BalanceStatus {
    /// Patient still owes money
    Outstanding,
    /// Paid in full
    Settled,
    /// Paid more than the treatments cost
    Overpaid,
}

impl BalanceStatus {
    pub fn of(balance: f64) -> Self {
        if balance > 0.0 {
            BalanceStatus::Outstanding
        } else if balance < 0.0 {
            BalanceStatus::Overpaid
        } else {
            BalanceStatus::Settled
        }
    }

    /// Localization key for display.
    pub fn label_key(self) -> &'static str {
        match self {
            BalanceStatus::Outstanding => "balance_outstanding",
            BalanceStatus::Settled => "balance_settled",
            BalanceStatus::Overpaid => "balance_overpaid",
        }
    }

    /// Display color used by the desktop shell.
    pub fn color(self) -> &'static str {
        match self {
            BalanceStatus::Outstanding => "#e74c3c",
            BalanceStatus::Settled => "#27ae60",
            BalanceStatus::Overpaid => "#f39c12",
        }
    }
}

/// A record together with its computed totals, as shown in list views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordSummary {
    pub record: Record,
    pub financials: Financials,
}

/// Two-decimal money text with the currency symbol in front, e.g. `$-30.00`.
pub fn format_money(value: f64, symbol: &str) -> String {
    format!("{}{:.2}", symbol, value)
}
