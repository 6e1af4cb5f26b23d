//! Patient models.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Patient gender as stored in the `gender` column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Localization key for display.
    pub fn label_key(self) -> &'static str {
        match self {
            Gender::Male => "gender_male",
            Gender::Female => "gender_female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    /// Accepts the stored value or either UI label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "ذكر" => Ok(Gender::Male),
            "female" | "أنثى" => Ok(Gender::Female),
            other => Err(format!("unknown gender: {}", other)),
        }
    }
}

/// A clinic patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Set when the patient was removed while still owning records
    pub deleted_at: Option<String>,
}

impl Patient {
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

    /// Age in whole years on `today`, if the birth date is known.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        let birth = self.birth_date?;
        let mut years = today.year() - birth.year();
        if (today.month(), today.day()) < (birth.month(), birth.day()) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }
}

/// Validated fields for creating or updating a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientInput {
    pub name: String,
    pub phone: String,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl PatientInput {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            gender: None,
            birth_date: None,
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(birth: Option<NaiveDate>) -> Patient {
        Patient {
            id: 1,
            name: "Layla".into(),
            phone: "0501234567".into(),
            gender: Some(Gender::Female),
            birth_date: birth,
            notes: None,
            created_at: "2024-01-15 10:00:00".into(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_age_on() {
        let p = patient(NaiveDate::from_ymd_opt(1990, 6, 15));
        let before_birthday = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
        let on_birthday = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(p.age_on(before_birthday), Some(33));
        assert_eq!(p.age_on(on_birthday), Some(34));
        assert_eq!(patient(None).age_on(on_birthday), None);
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!("Male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("أنثى".parse::<Gender>().unwrap(), Gender::Female);
        assert!("other".parse::<Gender>().is_err());
        assert_eq!(Gender::Female.label_key(), "gender_female");
    }
}
