//! Record deletion guard and doctor/patient soft deletion.

use dentasys_core::db::{Database, DbError, DeleteOutcome, Dependents};
use dentasys_core::models::{DoctorInput, PatientInput, PaymentInput, TreatmentInput};

struct Clinic {
    db: Database,
    doctor_id: i64,
    patient_id: i64,
    record_id: i64,
}

fn clinic() -> Clinic {
    let db = Database::open_in_memory().unwrap();
    let doctor = db.insert_doctor(&DoctorInput::new("Dr. Huda")).unwrap();
    let patient = db
        .insert_patient(&PatientInput::new("Layla", "0501234567"))
        .unwrap();
    let record = db.insert_record(doctor.id, patient.id).unwrap();
    Clinic {
        db,
        doctor_id: doctor.id,
        patient_id: patient.id,
        record_id: record.id,
    }
}

fn row_count(db: &Database, table: &str) -> i64 {
    db.conn()
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
}

#[test]
fn test_refused_delete_changes_nothing() {
    let c = clinic();
    c.db.insert_treatment(c.record_id, &TreatmentInput::new("Crown", 400.0))
        .unwrap();
    c.db.insert_payment(c.record_id, &PaymentInput::new(100.0))
        .unwrap();

    let outcome = c.db.delete_record(c.record_id).unwrap();
    assert_eq!(
        outcome,
        DeleteOutcome::Refused(Dependents {
            treatments: true,
            payments: true
        })
    );
    assert!(!outcome.is_success());

    assert_eq!(row_count(&c.db, "records"), 1);
    assert_eq!(row_count(&c.db, "treatments"), 1);
    assert_eq!(row_count(&c.db, "payments"), 1);
}

#[test]
fn test_delete_allowed_once_children_removed() {
    let c = clinic();
    let treatment = c
        .db
        .insert_treatment(c.record_id, &TreatmentInput::new("Crown", 400.0))
        .unwrap();

    assert!(!c.db.delete_record(c.record_id).unwrap().is_success());

    c.db.delete_treatment(treatment.id).unwrap();
    assert_eq!(c.db.delete_record(c.record_id).unwrap(), DeleteOutcome::Removed);
    assert!(c.db.get_record(c.record_id).unwrap().is_none());
}

#[test]
fn test_soft_deleted_doctor_stays_resolvable() {
    let c = clinic();

    assert_eq!(
        c.db.delete_doctor(c.doctor_id).unwrap(),
        DeleteOutcome::SoftDeleted
    );

    let doctor = c.db.get_doctor(c.doctor_id).unwrap().unwrap();
    assert!(!doctor.is_active());
    assert_eq!(doctor.status_key(), "status_deleted");

    assert!(c.db.list_doctors().unwrap().is_empty());
    assert_eq!(c.db.list_all_doctors().unwrap().len(), 1);
    assert!(c.db.search_doctors("huda").unwrap().is_empty());

    // The record keeps its history
    let record = c.db.get_record(c.record_id).unwrap().unwrap();
    assert_eq!(record.doctor_name, "Dr. Huda");
    assert_eq!(c.db.list_records_for_doctor(c.doctor_id).unwrap().len(), 1);

    // Deleting again keeps the first deletion time
    assert_eq!(
        c.db.delete_doctor(c.doctor_id).unwrap(),
        DeleteOutcome::SoftDeleted
    );
    let again = c.db.get_doctor(c.doctor_id).unwrap().unwrap();
    assert_eq!(again.deleted_at, doctor.deleted_at);
}

#[test]
fn test_soft_deleted_patient_stays_resolvable() {
    let c = clinic();

    assert_eq!(
        c.db.delete_patient(c.patient_id).unwrap(),
        DeleteOutcome::SoftDeleted
    );
    assert!(c.db.get_patient(c.patient_id).unwrap().is_some());
    assert!(c.db.list_patients().unwrap().is_empty());
    assert_eq!(c.db.list_records_for_patient(c.patient_id).unwrap().len(), 1);
}

#[test]
fn test_no_new_records_for_deleted_people() {
    let c = clinic();
    let other_patient = c
        .db
        .insert_patient(&PatientInput::new("Sami", "0509876543"))
        .unwrap();
    c.db.delete_doctor(c.doctor_id).unwrap();

    let err = c
        .db
        .insert_record(c.doctor_id, other_patient.id)
        .unwrap_err();
    assert!(matches!(err, DbError::Constraint(_)));

    // Editing the existing record without changing the doctor is still fine
    assert!(c
        .db
        .update_record(c.record_id, c.doctor_id, c.patient_id)
        .unwrap());
}

#[test]
fn test_record_survives_after_last_child_gone_only_if_asked() {
    let c = clinic();
    let payment = c
        .db
        .insert_payment(c.record_id, &PaymentInput::new(50.0))
        .unwrap();
    c.db.delete_payment(payment.id).unwrap();

    // Removing the last child does not cascade to the record
    assert!(c.db.get_record(c.record_id).unwrap().is_some());
    assert_eq!(c.db.delete_record(c.record_id).unwrap(), DeleteOutcome::Removed);
}
