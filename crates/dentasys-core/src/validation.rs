//! Form validation.
//!
//! Forms carry raw text as typed by the user. Validation trims and parses it,
//! collects every problem found, and only then hands back typed inputs ready
//! for storage.

use std::fmt;

use chrono::{Local, NaiveDate};
use dentasys_i18n::{Arg, Locale};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{DoctorInput, Gender, PatientInput, PaymentInput, TreatmentInput};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;
pub const TREATMENT_NAME_MAX_CHARS: usize = 200;
pub const PHONE_MIN_DIGITS: usize = 10;
pub const PHONE_MAX_DIGITS: usize = 15;
pub const MAX_MONEY: f64 = 999_999.99;

/// Form fields that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    DoctorName,
    PatientName,
    Phone,
    Gender,
    BirthDate,
    TreatmentName,
    Cost,
    TreatmentDate,
    PaymentAmount,
    PaymentDate,
    Doctor,
    Patient,
}

impl Field {
    /// Localization key of the field label.
    pub fn label_key(self) -> &'static str {
        match self {
            Field::DoctorName => "doctor_name",
            Field::PatientName => "patient_name",
            Field::Phone => "phone_number",
            Field::Gender => "gender",
            Field::BirthDate => "birth_date",
            Field::TreatmentName => "treatment_name",
            Field::Cost => "cost",
            Field::TreatmentDate => "treatment_date",
            Field::PaymentAmount => "payment_amount",
            Field::PaymentDate => "payment_date",
            Field::Doctor => "col_doctor",
            Field::Patient => "col_patient",
        }
    }

    fn english(self) -> &'static str {
        match self {
            Field::DoctorName => "Doctor name",
            Field::PatientName => "Patient name",
            Field::Phone => "Phone number",
            Field::Gender => "Gender",
            Field::BirthDate => "Birth date",
            Field::TreatmentName => "Treatment name",
            Field::Cost => "Cost",
            Field::TreatmentDate => "Treatment date",
            Field::PaymentAmount => "Payment amount",
            Field::PaymentDate => "Payment date",
            Field::Doctor => "doctor",
            Field::Patient => "patient",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.english())
    }
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ValidationIssue {
    #[error("{0} is required")]
    Required(Field),

    #[error("{field} must be at least {min} characters")]
    TooShort { field: Field, min: usize },

    #[error("{field} must be less than {max} characters")]
    TooLong { field: Field, max: usize },

    #[error("Phone number must be at least 10 digits")]
    PhoneTooShort,

    #[error("Phone number must be less than 15 digits")]
    PhoneTooLong,

    #[error("Phone number contains invalid characters")]
    PhoneInvalidChars,

    #[error("{0} must be a valid number")]
    InvalidNumber(Field),

    #[error("{0} cannot be negative")]
    Negative(Field),

    #[error("{0} must be greater than zero")]
    NotPositive(Field),

    #[error("{0} is too large")]
    TooLarge(Field),

    #[error("{0} cannot be in the future")]
    FutureDate(Field),

    #[error("{0} must be in YYYY-MM-DD format")]
    DateFormat(Field),

    #[error("{0} has an invalid value")]
    InvalidChoice(Field),

    #[error("Please select a {0}")]
    NotSelected(Field),
}

impl ValidationIssue {
    /// The field the issue belongs to.
    pub fn field(&self) -> Field {
        match self {
            ValidationIssue::PhoneTooShort
            | ValidationIssue::PhoneTooLong
            | ValidationIssue::PhoneInvalidChars => Field::Phone,
            ValidationIssue::TooShort { field, .. } | ValidationIssue::TooLong { field, .. } => {
                *field
            }
            ValidationIssue::Required(field)
            | ValidationIssue::InvalidNumber(field)
            | ValidationIssue::Negative(field)
            | ValidationIssue::NotPositive(field)
            | ValidationIssue::TooLarge(field)
            | ValidationIssue::FutureDate(field)
            | ValidationIssue::DateFormat(field)
            | ValidationIssue::InvalidChoice(field)
            | ValidationIssue::NotSelected(field) => *field,
        }
    }

    /// Localization key of the message.
    pub fn message_key(&self) -> &'static str {
        match self {
            ValidationIssue::Required(_) => "validation_required",
            ValidationIssue::TooShort { .. } => "validation_too_short",
            ValidationIssue::TooLong { .. } => "validation_too_long",
            ValidationIssue::PhoneTooShort => "validation_phone_too_short",
            ValidationIssue::PhoneTooLong => "validation_phone_too_long",
            ValidationIssue::PhoneInvalidChars => "validation_phone_invalid_chars",
            ValidationIssue::InvalidNumber(_) => "validation_invalid_number",
            ValidationIssue::Negative(_) => "validation_negative",
            ValidationIssue::NotPositive(_) => "validation_not_positive",
            ValidationIssue::TooLarge(_) => "validation_too_large",
            ValidationIssue::FutureDate(_) => "validation_future_date",
            ValidationIssue::DateFormat(_) => "validation_date_format",
            ValidationIssue::InvalidChoice(_) => "validation_invalid_choice",
            ValidationIssue::NotSelected(Field::Doctor) => "select_doctor_msg",
            ValidationIssue::NotSelected(_) => "select_patient_msg",
        }
    }

    /// The message in the given locale.
    pub fn message(&self, locale: &Locale<'_>) -> String {
        let field = locale.text(self.field().label_key()).to_string();
        let mut args: Vec<(&str, Arg)> = vec![("field", Arg::from(field))];
        match self {
            ValidationIssue::TooShort { min, .. } => args.push(("min", Arg::from(*min))),
            ValidationIssue::TooLong { max, .. } => args.push(("max", Arg::from(*max))),
            _ => {}
        }
        locale.format(self.message_key(), &args)
    }
}

/// Every issue found in one form submission.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", join_issues(.0))]
pub struct ValidationError(pub Vec<ValidationIssue>);

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.0
    }

    pub fn has(&self, issue: &ValidationIssue) -> bool {
        self.0.contains(issue)
    }

    /// All messages in the given locale.
    pub fn messages(&self, locale: &Locale<'_>) -> Vec<String> {
        self.0.iter().map(|issue| issue.message(locale)).collect()
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Accumulates issues while a form is checked.
#[derive(Default)]
struct Checker {
    issues: Vec<ValidationIssue>,
}

impl Checker {
    fn finish<T>(self, value: T) -> ValidationResult<T> {
        if self.issues.is_empty() {
            Ok(value)
        } else {
            tracing::debug!(issues = self.issues.len(), "form rejected");
            Err(ValidationError(self.issues))
        }
    }

    fn name(&mut self, field: Field, raw: &str, max: usize) -> String {
        let name = raw.trim();
        let chars = name.chars().count();
        if chars == 0 {
            self.issues.push(ValidationIssue::Required(field));
        } else if chars < NAME_MIN_CHARS {
            self.issues.push(ValidationIssue::TooShort {
                field,
                min: NAME_MIN_CHARS,
            });
        } else if chars > max {
            self.issues.push(ValidationIssue::TooLong { field, max });
        }
        name.to_string()
    }

    fn phone(&mut self, raw: &str, required: bool) -> Option<String> {
        let phone = raw.trim();
        if phone.is_empty() {
            if required {
                self.issues.push(ValidationIssue::Required(Field::Phone));
            }
            return None;
        }

        let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | '.' | ' ');
        if !phone.chars().all(allowed) {
            self.issues.push(ValidationIssue::PhoneInvalidChars);
        } else {
            let digits = phone
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '+')
                .count();
            if digits < PHONE_MIN_DIGITS {
                self.issues.push(ValidationIssue::PhoneTooShort);
            } else if digits > PHONE_MAX_DIGITS {
                self.issues.push(ValidationIssue::PhoneTooLong);
            }
        }
        Some(phone.to_string())
    }

    fn date(&mut self, field: Field, raw: &str, today: NaiveDate) -> Option<NaiveDate> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) if date > today => {
                self.issues.push(ValidationIssue::FutureDate(field));
                None
            }
            Ok(date) => Some(date),
            Err(_) => {
                self.issues.push(ValidationIssue::DateFormat(field));
                None
            }
        }
    }

    /// Money in `0..=MAX_MONEY`, or `(0, MAX_MONEY]` when `positive`.
    fn money(&mut self, field: Field, raw: &str, positive: bool) -> f64 {
        let raw = raw.trim();
        if raw.is_empty() {
            self.issues.push(ValidationIssue::Required(field));
            return 0.0;
        }
        let value = match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                self.issues.push(ValidationIssue::InvalidNumber(field));
                return 0.0;
            }
        };

        if positive && value <= 0.0 {
            self.issues.push(ValidationIssue::NotPositive(field));
        } else if value < 0.0 {
            self.issues.push(ValidationIssue::Negative(field));
        } else if value > MAX_MONEY {
            self.issues.push(ValidationIssue::TooLarge(field));
        }
        value
    }

    fn selected(&mut self, field: Field, id: Option<i64>) -> i64 {
        match id {
            Some(id) => id,
            None => {
                self.issues.push(ValidationIssue::NotSelected(field));
                0
            }
        }
    }
}

fn optional_text(raw: &str) -> Option<String> {
    let text = raw.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Raw doctor form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoctorForm {
    pub name: String,
    pub phone: String,
}

impl DoctorForm {
    pub fn validate(&self) -> ValidationResult<DoctorInput> {
        let mut check = Checker::default();
        let name = check.name(Field::DoctorName, &self.name, NAME_MAX_CHARS);
        let phone = check.phone(&self.phone, false);
        check.finish(DoctorInput { name, phone })
    }
}

/// Raw patient form. Empty strings mean "not given".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientForm {
    pub name: String,
    pub phone: String,
    pub gender: String,
    pub birth_date: String,
    pub notes: String,
}

impl PatientForm {
    pub fn validate(&self) -> ValidationResult<PatientInput> {
        self.validate_at(today())
    }

    pub fn validate_at(&self, today: NaiveDate) -> ValidationResult<PatientInput> {
        let mut check = Checker::default();
        let name = check.name(Field::PatientName, &self.name, NAME_MAX_CHARS);
        let phone = check.phone(&self.phone, true).unwrap_or_default();

        let gender = match self.gender.trim() {
            "" => None,
            raw => match raw.parse::<Gender>() {
                Ok(g) => Some(g),
                Err(_) => {
                    check.issues.push(ValidationIssue::InvalidChoice(Field::Gender));
                    None
                }
            },
        };
        let birth_date = check.date(Field::BirthDate, &self.birth_date, today);

        check.finish(PatientInput {
            name,
            phone,
            gender,
            birth_date,
            notes: optional_text(&self.notes),
        })
    }
}

/// Raw treatment form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreatmentForm {
    pub name: String,
    pub cost: String,
    pub date: String,
    pub notes: String,
}

impl TreatmentForm {
    pub fn validate(&self) -> ValidationResult<TreatmentInput> {
        self.validate_at(today())
    }

    pub fn validate_at(&self, today: NaiveDate) -> ValidationResult<TreatmentInput> {
        let mut check = Checker::default();
        let name = check.name(Field::TreatmentName, &self.name, TREATMENT_NAME_MAX_CHARS);
        let cost = check.money(Field::Cost, &self.cost, false);
        let date = check.date(Field::TreatmentDate, &self.date, today);
        check.finish(TreatmentInput {
            name,
            cost,
            date,
            notes: optional_text(&self.notes),
        })
    }
}

/// Raw payment form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentForm {
    pub amount: String,
    pub date: String,
    pub notes: String,
}

impl PaymentForm {
    pub fn validate(&self) -> ValidationResult<PaymentInput> {
        self.validate_at(today())
    }

    pub fn validate_at(&self, today: NaiveDate) -> ValidationResult<PaymentInput> {
        let mut check = Checker::default();
        let amount = check.money(Field::PaymentAmount, &self.amount, true);
        let date = check.date(Field::PaymentDate, &self.date, today);
        check.finish(PaymentInput {
            amount,
            date,
            notes: optional_text(&self.notes),
        })
    }
}

/// Doctor and patient picked in the record form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordForm {
    pub doctor_id: Option<i64>,
    pub patient_id: Option<i64>,
}

impl RecordForm {
    /// Returns `(doctor_id, patient_id)`.
    pub fn validate(&self) -> ValidationResult<(i64, i64)> {
        let mut check = Checker::default();
        let doctor_id = check.selected(Field::Doctor, self.doctor_id);
        let patient_id = check.selected(Field::Patient, self.patient_id);
        check.finish((doctor_id, patient_id))
    }
}
