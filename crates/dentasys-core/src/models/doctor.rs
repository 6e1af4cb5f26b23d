//! Doctor models.

use serde::{Deserialize, Serialize};

/// A doctor on the clinic staff.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Set when the doctor was removed while still owning records
    pub deleted_at: Option<String>,
}

impl Doctor {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Localization key for the status column.
    pub fn status_key(&self) -> &'static str {
        if self.is_active() {
            "status_active"
        } else {
            "status_deleted"
        }
    }
}

/// Validated fields for creating or updating a doctor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoctorInput {
    pub name: String,
    pub phone: Option<String>,
}

impl DoctorInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}
