//! DentaSys Core Library
//!
//! Local-first practice management for a dental clinic: doctors, patients,
//! and the treatment/payment records that tie them together.
//!
//! # Architecture
//!
//! ```text
//!            Desktop shell (forms, tables, dialogs)
//!                          │
//!                 [FFI: DentaSysCore object]
//!                          │
//!     ┌──────────────┬─────┴───────┬──────────────┐
//!     ▼              ▼             ▼              ▼
//! Validation      Search       Export       LocaleContext
//!  (forms)     (ranked, UI   (PDF report,   (en / ar, RTL,
//!     │         debounced)    CSV ledger)    observers)
//!     └──────────────┴─────┬───────┘
//!                          ▼
//!            SQLite: doctors ─┐      ┌─ patients
//!                             ▼      ▼
//!                             records
//!                          ┌─────┴─────┐
//!                     treatments    payments
//! ```
//!
//! # Core Rules
//!
//! - **A record with treatments or payments is never deleted.** The check and
//!   the delete share one transaction.
//! - Doctors and patients that own records are soft-deleted.
//! - `cost`, `amount` and `balance` are always computed from child rows.
//!
//! # Modules
//!
//! - [`db`]: SQLite storage layer
//! - [`models`]: Domain types (Doctor, Patient, Record, Treatment, Payment)
//! - [`validation`]: Form checks with localized messages
//! - [`search`]: Ranked global search and input debouncing
//! - [`export`]: PDF record report and ledger export
//! - [`config`]: Clinic configuration and data paths
//! - [`logging`]: `tracing` subscriber setup

pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod models;
pub mod search;
pub mod validation;

// Re-export commonly used types
pub use config::ClinicConfig;
pub use db::{ClinicStats, Database, DbError, DeleteOutcome, Dependents};
pub use dentasys_i18n::{Language, Locale, LocaleContext};
pub use export::{ExportError, LedgerExport, PdfOptions, RecordReport};
pub use logging::init_logging;
pub use models::{
    BalanceStatus, Doctor, Financials, Gender, Patient, Payment, Record, RecordSummary, Treatment,
};
pub use search::{Debouncer, SearchResults, Searcher};
pub use validation::{
    DoctorForm, PatientForm, PaymentForm, RecordForm, TreatmentForm, ValidationError,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum DentaSysError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Form input rejected; the text lists every issue in the active language.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Integrity(String),

    #[error("Export error: {0}")]
    ExportError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Language error: {0}")]
    LanguageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<db::DbError> for DentaSysError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(what) => DentaSysError::NotFound(what),
            db::DbError::Integrity(msg) | db::DbError::Constraint(msg) => {
                DentaSysError::Integrity(msg)
            }
            other => DentaSysError::DatabaseError(other.to_string()),
        }
    }
}

impl From<export::ExportError> for DentaSysError {
    fn from(e: export::ExportError) -> Self {
        match e {
            export::ExportError::Database(db_err) => db_err.into(),
            export::ExportError::RecordNotFound(id) => {
                DentaSysError::NotFound(format!("record {}", id))
            }
            other => DentaSysError::ExportError(other.to_string()),
        }
    }
}

impl From<config::ConfigError> for DentaSysError {
    fn from(e: config::ConfigError) -> Self {
        DentaSysError::ConfigError(e.to_string())
    }
}

impl From<dentasys_i18n::I18nError> for DentaSysError {
    fn from(e: dentasys_i18n::I18nError) -> Self {
        DentaSysError::LanguageError(e.to_string())
    }
}

impl From<serde_json::Error> for DentaSysError {
    fn from(e: serde_json::Error) -> Self {
        DentaSysError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for DentaSysError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        DentaSysError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path with default settings.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<DentaSysCore>, DentaSysError> {
    let config = ClinicConfig {
        database_path: path.into(),
        ..Default::default()
    };
    let db = Database::open(&config.database_path)?;
    DentaSysCore::new(db, config)
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<DentaSysCore>, DentaSysError> {
    let db = Database::open_in_memory()?;
    DentaSysCore::new(db, ClinicConfig::default())
}

/// Load `config.json` (defaults if absent) and open the database it names.
#[uniffi::export]
pub fn open_with_config(config_path: String) -> Result<Arc<DentaSysCore>, DentaSysError> {
    let config = ClinicConfig::load(Path::new(&config_path))?;
    init_logging(&config.log_filter);
    let db = Database::open(&config.database_path)?;
    DentaSysCore::new(db, config)
}

/// Set up logging with the default filter (`RUST_LOG` overrides it).
#[uniffi::export]
pub fn init_default_logging() -> bool {
    init_logging(config::default_log_filter())
}

/// Set up logging with the filter from `config.json` (`RUST_LOG` overrides it).
#[uniffi::export]
pub fn init_logging_from_config(config_path: String) -> Result<bool, DentaSysError> {
    let config = ClinicConfig::load(Path::new(&config_path))?;
    Ok(init_logging(&config.log_filter))
}

// =========================================================================
// Callback Interfaces
// =========================================================================

/// Implemented by the shell to re-render after a language switch.
#[uniffi::export(with_foreign)]
pub trait LanguageListener: Send + Sync {
    fn on_language_changed(&self, language_code: String, rtl: bool);
}

/// Receives the outcome of a debounced search.
#[uniffi::export(with_foreign)]
pub trait SearchListener: Send + Sync {
    fn on_search_results(&self, term: String, results: FfiSearchResults);
    fn on_search_failed(&self, term: String, message: String);
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe clinic handle for FFI.
#[derive(uniffi::Object)]
pub struct DentaSysCore {
    db: Arc<Mutex<Database>>,
    locale: Mutex<LocaleContext>,
    /// Foreign listeners are called after `locale` is released, so they may
    /// call back into the core.
    listeners: Mutex<Vec<(u64, Arc<dyn LanguageListener>)>>,
    next_listener: AtomicU64,
    search_debouncer: Debouncer,
    config: ClinicConfig,
}

impl DentaSysCore {
    fn new(db: Database, config: ClinicConfig) -> Result<Arc<Self>, DentaSysError> {
        let locale = LocaleContext::with_builtin(config.language)?;
        tracing::info!(
            database = %config.database_path.display(),
            language = %config.language,
            "clinic opened"
        );
        Ok(Arc::new(Self {
            db: Arc::new(Mutex::new(db)),
            locale: Mutex::new(locale),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(1),
            search_debouncer: Debouncer::new(config.search_debounce()),
            config,
        }))
    }

    /// Turn a validation failure into one localized error.
    fn invalid(&self, err: ValidationError) -> DentaSysError {
        match self.locale.lock() {
            Ok(ctx) => DentaSysError::InvalidInput(err.messages(&ctx.locale()).join("\n")),
            Err(_) => DentaSysError::InvalidInput(err.to_string()),
        }
    }

    fn notify_listeners(&self, language: Language) -> Result<(), DentaSysError> {
        let listeners: Vec<Arc<dyn LanguageListener>> = self
            .listeners
            .lock()?
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        tracing::debug!(language = %language, listeners = listeners.len(), "language changed");
        for listener in listeners {
            listener.on_language_changed(language.code().to_string(), language.is_rtl());
        }
        Ok(())
    }

    fn record_with_totals(db: &Database, record: Record) -> Result<FfiRecord, DentaSysError> {
        let financials = db.record_financials(record.id)?;
        Ok(FfiRecord::from(RecordSummary { record, financials }))
    }
}

#[uniffi::export]
impl DentaSysCore {
    // =========================================================================
    // Doctor Operations
    // =========================================================================

    /// Validate the form and create a doctor.
    pub fn create_doctor(&self, form: FfiDoctorForm) -> Result<FfiDoctor, DentaSysError> {
        let input = DoctorForm::from(form).validate().map_err(|e| self.invalid(e))?;
        let db = self.db.lock()?;
        Ok(db.insert_doctor(&input)?.into())
    }

    /// Validate the form and update a doctor. Returns false if it does not exist.
    pub fn update_doctor(&self, id: i64, form: FfiDoctorForm) -> Result<bool, DentaSysError> {
        let input = DoctorForm::from(form).validate().map_err(|e| self.invalid(e))?;
        let db = self.db.lock()?;
        Ok(db.update_doctor(id, &input)?)
    }

    /// Get a doctor by ID (soft-deleted ones included).
    pub fn get_doctor(&self, id: i64) -> Result<Option<FfiDoctor>, DentaSysError> {
        let db = self.db.lock()?;
        Ok(db.get_doctor(id)?.map(Into::into))
    }

    /// List doctors by name.
    pub fn list_doctors(&self, include_deleted: bool) -> Result<Vec<FfiDoctor>, DentaSysError> {
        let db = self.db.lock()?;
        let doctors = if include_deleted {
            db.list_all_doctors()?
        } else {
            db.list_doctors()?
        };
        Ok(doctors.into_iter().map(Into::into).collect())
    }

    /// Search active doctors by name or phone.
    pub fn search_doctors(&self, term: String) -> Result<Vec<FfiDoctor>, DentaSysError> {
        let db = self.db.lock()?;
        Ok(db.search_doctors(&term)?.into_iter().map(Into::into).collect())
    }

    /// Delete a doctor (soft delete when the doctor owns records).
    pub fn delete_doctor(&self, id: i64) -> Result<FfiDeleteOutcome, DentaSysError> {
        let db = self.db.lock()?;
        Ok(db.delete_doctor(id)?.into())
    }

    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Validate the form and create a patient.
    pub fn create_patient(&self, form: FfiPatientForm) -> Result<FfiPatient, DentaSysError> {
        let input = PatientForm::from(form).validate().map_err(|e| self.invalid(e))?;
        let db = self.db.lock()?;
        Ok(db.insert_patient(&input)?.into())
    }

    /// Validate the form and update a patient. Returns false if it does not exist.
    pub fn update_patient(&self, id: i64, form: FfiPatientForm) -> Result<bool, DentaSysError> {
        let input = PatientForm::from(form).validate().map_err(|e| self.invalid(e))?;
        let db = self.db.lock()?;
        Ok(db.update_patient(id, &input)?)
    }

    /// Get a patient by ID (soft-deleted ones included).
    pub fn get_patient(&self, id: i64) -> Result<Option<FfiPatient>, DentaSysError> {
        let db = self.db.lock()?;
        Ok(db.get_patient(id)?.map(Into::into))
    }

    /// List patients by name.
    pub fn list_patients(&self, include_deleted: bool) -> Result<Vec<FfiPatient>, DentaSysError> {
        let db = self.db.lock()?;
        let patients = if include_deleted {
            db.list_all_patients()?
        } else {
            db.list_patients()?
        };
        Ok(patients.into_iter().map(Into::into).collect())
    }

    /// Search active patients by name or phone.
    pub fn search_patients(&self, term: String) -> Result<Vec<FfiPatient>, DentaSysError> {
        let db = self.db.lock()?;
        Ok(db.search_patients(&term)?.into_iter().map(Into::into).collect())
    }

    /// Delete a patient (soft delete when the patient owns records).
    pub fn delete_patient(&self, id: i64) -> Result<FfiDeleteOutcome, DentaSysError> {
        let db = self.db.lock()?;
        Ok(db.delete_patient(id)?.into())
    }

    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Create a record for the selected doctor and patient.
    pub fn create_record(
        &self,
        doctor_id: Option<i64>,
        patient_id: Option<i64>,
    ) -> Result<FfiRecord, DentaSysError> {
        let (doctor_id, patient_id) = RecordForm {
            doctor_id,
            patient_id,
        }
        .validate()
        .map_err(|e| self.invalid(e))?;
        let db = self.db.lock()?;
        let record = db.insert_record(doctor_id, patient_id)?;
        Self::record_with_totals(&db, record)
    }

    /// Reassign a record. Returns false if it does not exist.
    pub fn update_record(
        &self,
        id: i64,
        doctor_id: Option<i64>,
        patient_id: Option<i64>,
    ) -> Result<bool, DentaSysError> {
        let (doctor_id, patient_id) = RecordForm {
            doctor_id,
            patient_id,
        }
        .validate()
        .map_err(|e| self.invalid(e))?;
        let db = self.db.lock()?;
        Ok(db.update_record(id, doctor_id, patient_id)?)
    }

    /// Get a record with its current totals.
    pub fn get_record(&self, id: i64) -> Result<Option<FfiRecord>, DentaSysError> {
        let db = self.db.lock()?;
        db.get_record(id)?
            .map(|record| Self::record_with_totals(&db, record))
            .transpose()
    }

    /// All records, newest first.
    pub fn list_records(&self) -> Result<Vec<FfiRecord>, DentaSysError> {
        let db = self.db.lock()?;
        Ok(db.list_records()?.into_iter().map(Into::into).collect())
    }

    /// Records whose doctor or patient name contains the term.
    pub fn search_records(&self, term: String) -> Result<Vec<FfiRecord>, DentaSysError> {
        let db = self.db.lock()?;
        Ok(db.search_records(&term)?.into_iter().map(Into::into).collect())
    }

    pub fn records_for_doctor(&self, doctor_id: i64) -> Result<Vec<FfiRecord>, DentaSysError> {
        let db = self.db.lock()?;
        db.list_records_for_doctor(doctor_id)?
            .into_iter()
            .map(|record| Self::record_with_totals(&db, record))
            .collect()
    }

    pub fn records_for_patient(&self, patient_id: i64) -> Result<Vec<FfiRecord>, DentaSysError> {
        let db = self.db.lock()?;
        db.list_records_for_patient(patient_id)?
            .into_iter()
            .map(|record| Self::record_with_totals(&db, record))
            .collect()
    }

    /// Delete a record. Refused while it has treatments or payments.
    pub fn delete_record(&self, id: i64) -> Result<FfiDeleteOutcome, DentaSysError> {
        let db = self.db.lock()?;
        Ok(db.delete_record(id)?.into())
    }

    /// Cost, paid amount and balance of a record.
    pub fn record_financials(&self, record_id: i64) -> Result<FfiFinancials, DentaSysError> {
        let db = self.db.lock()?;
        Ok(db.record_financials(record_id)?.into())
    }

    // =========================================================================
    // Treatment Operations
    // =========================================================================

    pub fn add_treatment(
        &self,
        record_id: i64,
        form: FfiTreatmentForm,
    ) -> Result<FfiTreatment, DentaSysError> {
        let input = TreatmentForm::from(form).validate().map_err(|e| self.invalid(e))?;
        let db = self.db.lock()?;
        Ok(db.insert_treatment(record_id, &input)?.into())
    }

    pub fn update_treatment(&self, id: i64, form: FfiTreatmentForm) -> Result<bool, DentaSysError> {
        let input = TreatmentForm::from(form).validate().map_err(|e| self.invalid(e))?;
        let db = self.db.lock()?;
        Ok(db.update_treatment(id, &input)?)
    }

    pub fn get_treatment(&self, id: i64) -> Result<Option<FfiTreatment>, DentaSysError> {
        let db = self.db.lock()?;
        Ok(db.get_treatment(id)?.map(Into::into))
    }

    /// Treatments of a record, most recent first.
    pub fn list_treatments(&self, record_id: i64) -> Result<Vec<FfiTreatment>, DentaSysError> {
        let db = self.db.lock()?;
        Ok(db.list_treatments(record_id)?.into_iter().map(Into::into).collect())
    }

    pub fn delete_treatment(&self, id: i64) -> Result<bool, DentaSysError> {
        let db = self.db.lock()?;
        Ok(db.delete_treatment(id)?)
    }

    // =========================================================================
    // Payment Operations
    // =========================================================================

    pub fn add_payment(
        &self,
        record_id: i64,
        form: FfiPaymentForm,
    ) -> Result<FfiPayment, DentaSysError> {
        let input = PaymentForm::from(form).validate().map_err(|e| self.invalid(e))?;
        let db = self.db.lock()?;
        Ok(db.insert_payment(record_id, &input)?.into())
    }

    pub fn update_payment(&self, id: i64, form: FfiPaymentForm) -> Result<bool, DentaSysError> {
        let input = PaymentForm::from(form).validate().map_err(|e| self.invalid(e))?;
        let db = self.db.lock()?;
        Ok(db.update_payment(id, &input)?)
    }

    pub fn get_payment(&self, id: i64) -> Result<Option<FfiPayment>, DentaSysError> {
        let db = self.db.lock()?;
        Ok(db.get_payment(id)?.map(Into::into))
    }

    /// Payments of a record, most recent first.
    pub fn list_payments(&self, record_id: i64) -> Result<Vec<FfiPayment>, DentaSysError> {
        let db = self.db.lock()?;
        Ok(db.list_payments(record_id)?.into_iter().map(Into::into).collect())
    }

    pub fn delete_payment(&self, id: i64) -> Result<bool, DentaSysError> {
        let db = self.db.lock()?;
        Ok(db.delete_payment(id)?)
    }

    // =========================================================================
    // Search & Dashboard
    // =========================================================================

    /// Search doctors, patients and records at once.
    pub fn search(&self, term: String) -> Result<FfiSearchResults, DentaSysError> {
        let db = self.db.lock()?;
        Ok(Searcher::new(&db).search(&term)?.into())
    }

    /// Search once input has been quiet for the configured delay.
    ///
    /// Each call supersedes the pending one; only the newest term reaches
    /// `listener`.
    pub fn search_debounced(&self, term: String, listener: Arc<dyn SearchListener>) {
        let db = Arc::clone(&self.db);
        self.search_debouncer.trigger(move || {
            let outcome = db
                .lock()
                .map_err(DentaSysError::from)
                .and_then(|db| Ok(FfiSearchResults::from(Searcher::new(&db).search(&term)?)));
            match outcome {
                Ok(results) => listener.on_search_results(term, results),
                Err(e) => {
                    tracing::warn!(error = %e, "debounced search failed");
                    listener.on_search_failed(term, e.to_string());
                }
            }
        });
    }

    /// Drop a pending debounced search.
    pub fn cancel_search(&self) {
        self.search_debouncer.cancel();
    }

    /// Debounce delay applied by [`DentaSysCore::search_debounced`].
    pub fn search_debounce_ms(&self) -> u64 {
        self.config.search_debounce_ms
    }

    pub fn clinic_stats(&self) -> Result<FfiClinicStats, DentaSysError> {
        let db = self.db.lock()?;
        Ok(db.clinic_stats()?.into())
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Write the PDF report of a record to `path`.
    pub fn export_record_pdf(&self, record_id: i64, path: String) -> Result<(), DentaSysError> {
        let report = {
            let db = self.db.lock()?;
            RecordReport::build(&db, record_id)?
        };
        let ctx = self.locale.lock()?;
        report.write_pdf(Path::new(&path), &ctx.locale(), &self.config.pdf_options())?;
        Ok(())
    }

    /// Suggested file name for a record report.
    pub fn record_report_file_name(&self, record_id: i64) -> Result<String, DentaSysError> {
        let db = self.db.lock()?;
        Ok(RecordReport::build(&db, record_id)?.file_name())
    }

    /// Export the ledger of all records as JSON.
    pub fn export_ledger_json(&self) -> Result<String, DentaSysError> {
        let db = self.db.lock()?;
        Ok(LedgerExport::from_db(&db)?.to_json()?)
    }

    /// Export the ledger of all records as CSV.
    pub fn export_ledger_csv(&self) -> Result<String, DentaSysError> {
        let db = self.db.lock()?;
        Ok(LedgerExport::from_db(&db)?.to_csv())
    }

    // =========================================================================
    // Localization
    // =========================================================================

    /// Switch language by code (`en` / `ar`) and notify listeners.
    pub fn set_language(&self, code: String) -> Result<(), DentaSysError> {
        let language = self.locale.lock()?.set_language_code(&code)?.current;
        self.notify_listeners(language)
    }

    /// Switch to the other language. Returns the new code.
    pub fn toggle_language(&self) -> Result<String, DentaSysError> {
        let language = self.locale.lock()?.toggle().current;
        self.notify_listeners(language)?;
        Ok(language.code().to_string())
    }

    pub fn current_language(&self) -> Result<String, DentaSysError> {
        let ctx = self.locale.lock()?;
        Ok(ctx.language().code().to_string())
    }

    pub fn is_rtl(&self) -> Result<bool, DentaSysError> {
        let ctx = self.locale.lock()?;
        Ok(ctx.language().is_rtl())
    }

    /// Display text for a key in the active language.
    pub fn text(&self, key: String) -> Result<String, DentaSysError> {
        let ctx = self.locale.lock()?;
        Ok(ctx.locale().text(&key).to_string())
    }

    /// Amount with the configured currency symbol, two decimals.
    pub fn format_money(&self, value: f64) -> String {
        models::format_money(value, &self.config.currency_symbol)
    }

    /// Register a listener. Returns the handle for removal.
    pub fn add_language_listener(
        &self,
        listener: Arc<dyn LanguageListener>,
    ) -> Result<u64, DentaSysError> {
        let id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock()?.push((id, listener));
        Ok(id)
    }

    pub fn remove_language_listener(&self, handle: u64) -> Result<bool, DentaSysError> {
        let mut listeners = self.listeners.lock()?;
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != handle);
        Ok(listeners.len() != before)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe doctor.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDoctor {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub created_at: String,
    pub deleted_at: Option<String>,
    pub active: bool,
}

impl From<Doctor> for FfiDoctor {
    fn from(doctor: Doctor) -> Self {
        Self {
            active: doctor.is_active(),
            id: doctor.id,
            name: doctor.name,
            phone: doctor.phone,
            created_at: doctor.created_at,
            deleted_at: doctor.deleted_at,
        }
    }
}

/// FFI-safe patient. Dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: i64,
    pub name: String,
    pub phone: String,
    /// `male` / `female`
    pub gender: Option<String>,
    pub birth_date: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub deleted_at: Option<String>,
    pub active: bool,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            active: patient.is_active(),
            id: patient.id,
            name: patient.name,
            phone: patient.phone,
            gender: patient.gender.map(|g| g.as_str().to_string()),
            birth_date: patient.birth_date.map(|d| d.to_string()),
            notes: patient.notes,
            created_at: patient.created_at,
            deleted_at: patient.deleted_at,
        }
    }
}

/// FFI-safe record with computed totals.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecord {
    pub id: i64,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub doctor_name: String,
    pub patient_name: String,
    pub created_at: String,
    pub financials: FfiFinancials,
}

impl From<RecordSummary> for FfiRecord {
    fn from(summary: RecordSummary) -> Self {
        let record = summary.record;
        Self {
            id: record.id,
            doctor_id: record.doctor_id,
            patient_id: record.patient_id,
            doctor_name: record.doctor_name,
            patient_name: record.patient_name,
            created_at: record.created_at,
            financials: summary.financials.into(),
        }
    }
}

/// FFI-safe totals.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFinancials {
    pub cost: f64,
    pub amount: f64,
    pub balance: f64,
    /// Localization key: `balance_outstanding` / `balance_settled` / `balance_overpaid`
    pub status_key: String,
    /// Hex color for the balance cell
    pub color: String,
}

impl From<Financials> for FfiFinancials {
    fn from(f: Financials) -> Self {
        let status = f.status();
        Self {
            cost: f.cost,
            amount: f.amount,
            balance: f.balance,
            status_key: status.label_key().to_string(),
            color: status.color().to_string(),
        }
    }
}

/// FFI-safe treatment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTreatment {
    pub id: i64,
    pub record_id: i64,
    pub name: String,
    pub cost: f64,
    pub date: Option<String>,
    pub notes: Option<String>,
}

impl From<Treatment> for FfiTreatment {
    fn from(t: Treatment) -> Self {
        Self {
            id: t.id,
            record_id: t.record_id,
            name: t.name,
            cost: t.cost,
            date: t.date.map(|d| d.to_string()),
            notes: t.notes,
        }
    }
}

/// FFI-safe payment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPayment {
    pub id: i64,
    pub record_id: i64,
    pub amount: f64,
    pub date: Option<String>,
    pub notes: Option<String>,
}

impl From<Payment> for FfiPayment {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            record_id: p.record_id,
            amount: p.amount,
            date: p.date.map(|d| d.to_string()),
            notes: p.notes,
        }
    }
}

/// FFI-safe delete outcome.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum FfiDeleteOutcome {
    Removed,
    SoftDeleted,
    Refused {
        has_treatments: bool,
        has_payments: bool,
    },
    NotFound,
}

impl From<DeleteOutcome> for FfiDeleteOutcome {
    fn from(outcome: DeleteOutcome) -> Self {
        match outcome {
            DeleteOutcome::Removed => FfiDeleteOutcome::Removed,
            DeleteOutcome::SoftDeleted => FfiDeleteOutcome::SoftDeleted,
            DeleteOutcome::Refused(dependents) => FfiDeleteOutcome::Refused {
                has_treatments: dependents.treatments,
                has_payments: dependents.payments,
            },
            DeleteOutcome::NotFound => FfiDeleteOutcome::NotFound,
        }
    }
}

/// FFI-safe global search results.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSearchResults {
    pub doctors: Vec<FfiDoctor>,
    pub patients: Vec<FfiPatient>,
    pub records: Vec<FfiRecord>,
    pub total: u64,
}

impl From<SearchResults> for FfiSearchResults {
    fn from(results: SearchResults) -> Self {
        let total = results.total() as u64;
        Self {
            doctors: results.doctors.into_iter().map(Into::into).collect(),
            patients: results.patients.into_iter().map(Into::into).collect(),
            records: results.records.into_iter().map(Into::into).collect(),
            total,
        }
    }
}

/// FFI-safe dashboard statistics.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClinicStats {
    pub doctors: i64,
    pub patients: i64,
    pub records: i64,
    pub totals: FfiFinancials,
}

impl From<ClinicStats> for FfiClinicStats {
    fn from(stats: ClinicStats) -> Self {
        Self {
            doctors: stats.doctors,
            patients: stats.patients,
            records: stats.records,
            totals: stats.totals.into(),
        }
    }
}

// =========================================================================
// FFI Form Types (raw text as typed)
// =========================================================================

#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiDoctorForm {
    pub name: String,
    pub phone: String,
}

impl From<FfiDoctorForm> for DoctorForm {
    fn from(form: FfiDoctorForm) -> Self {
        DoctorForm {
            name: form.name,
            phone: form.phone,
        }
    }
}

#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiPatientForm {
    pub name: String,
    pub phone: String,
    pub gender: String,
    pub birth_date: String,
    pub notes: String,
}

impl From<FfiPatientForm> for PatientForm {
    fn from(form: FfiPatientForm) -> Self {
        PatientForm {
            name: form.name,
            phone: form.phone,
            gender: form.gender,
            birth_date: form.birth_date,
            notes: form.notes,
        }
    }
}

#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiTreatmentForm {
    pub name: String,
    pub cost: String,
    pub date: String,
    pub notes: String,
}

impl From<FfiTreatmentForm> for TreatmentForm {
    fn from(form: FfiTreatmentForm) -> Self {
        TreatmentForm {
            name: form.name,
            cost: form.cost,
            date: form.date,
            notes: form.notes,
        }
    }
}

#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiPaymentForm {
    pub amount: String,
    pub date: String,
    pub notes: String,
}

impl From<FfiPaymentForm> for PaymentForm {
    fn from(form: FfiPaymentForm) -> Self {
        PaymentForm {
            amount: form.amount,
            date: form.date,
            notes: form.notes,
        }
    }
}
