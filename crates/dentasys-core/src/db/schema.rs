//! SQLite schema definition.

/// Complete database schema for DentaSys.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Doctors (soft-deleted once they own records)
-- ============================================================================

CREATE TABLE IF NOT EXISTS doctors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    phone TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    deleted_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_doctors_name ON doctors(name);
CREATE INDEX IF NOT EXISTS idx_doctors_deleted ON doctors(deleted_at);

-- ============================================================================
-- Patients (soft-deleted once they own records)
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    phone TEXT NOT NULL,
    gender TEXT CHECK (gender IS NULL OR gender IN ('male', 'female')),
    birth_date TEXT,
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    deleted_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(name);
CREATE INDEX IF NOT EXISTS idx_patients_deleted ON patients(deleted_at);

-- ============================================================================
-- Records (one doctor-patient engagement)
-- ============================================================================

CREATE TABLE IF NOT EXISTS records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    doctor_id INTEGER NOT NULL REFERENCES doctors(id),
    patient_id INTEGER NOT NULL REFERENCES patients(id),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE (doctor_id, patient_id)
);

CREATE INDEX IF NOT EXISTS idx_records_doctor ON records(doctor_id);
CREATE INDEX IF NOT EXISTS idx_records_patient ON records(patient_id);

-- ============================================================================
-- Treatments and Payments (children of a record, hard-deleted)
-- ============================================================================

CREATE TABLE IF NOT EXISTS treatments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    record_id INTEGER NOT NULL REFERENCES records(id),
    name TEXT NOT NULL,
    cost REAL NOT NULL CHECK (cost >= 0),
    date TEXT,
    notes TEXT
);

CREATE INDEX IF NOT EXISTS idx_treatments_record ON treatments(record_id);

CREATE TABLE IF NOT EXISTS payments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    record_id INTEGER NOT NULL REFERENCES records(id),
    amount REAL NOT NULL CHECK (amount > 0),
    date TEXT,
    notes TEXT
);

CREATE INDEX IF NOT EXISTS idx_payments_record ON payments(record_id);
"#;
