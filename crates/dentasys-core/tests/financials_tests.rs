//! Record aggregation properties.

use dentasys_core::db::Database;
use dentasys_core::models::{
    BalanceStatus, DoctorInput, Financials, PatientInput, PaymentInput, TreatmentInput,
};
use proptest::prelude::*;

fn record_with(costs: &[u32], amounts: &[u32]) -> (Database, i64) {
    let db = Database::open_in_memory().unwrap();
    let doctor = db.insert_doctor(&DoctorInput::new("Dr. Huda")).unwrap();
    let patient = db
        .insert_patient(&PatientInput::new("Layla", "0501234567"))
        .unwrap();
    let record = db.insert_record(doctor.id, patient.id).unwrap();

    for (i, cost) in costs.iter().enumerate() {
        db.insert_treatment(
            record.id,
            &TreatmentInput::new(format!("Treatment {i}"), f64::from(*cost)),
        )
        .unwrap();
    }
    for amount in amounts {
        db.insert_payment(record.id, &PaymentInput::new(f64::from(*amount)))
            .unwrap();
    }
    (db, record.id)
}

#[test]
fn test_worked_example() {
    let (db, record_id) = record_with(&[100, 50], &[120]);
    let record = db.get_record(record_id).unwrap().unwrap();

    assert_eq!(record.cost(&db).unwrap(), 150.0);
    assert_eq!(record.amount(&db).unwrap(), 120.0);
    assert_eq!(record.balance(&db).unwrap(), 30.0);
}

#[test]
fn test_totals_follow_child_changes() {
    let (db, record_id) = record_with(&[100], &[]);
    let payment = db.insert_payment(record_id, &PaymentInput::new(130.0)).unwrap();

    let overpaid = db.record_financials(record_id).unwrap();
    assert_eq!(overpaid.balance, -30.0);
    assert_eq!(overpaid.status(), BalanceStatus::Overpaid);

    db.update_payment(payment.id, &PaymentInput::new(100.0)).unwrap();
    assert_eq!(
        db.record_financials(record_id).unwrap().status(),
        BalanceStatus::Settled
    );

    db.delete_payment(payment.id).unwrap();
    assert_eq!(
        db.record_financials(record_id).unwrap(),
        Financials::new(100.0, 0.0)
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_totals_are_sums(
        costs in prop::collection::vec(0u32..100_000, 0..8),
        amounts in prop::collection::vec(1u32..100_000, 0..8),
    ) {
        let (db, record_id) = record_with(&costs, &amounts);
        let financials = db.record_financials(record_id).unwrap();

        let cost: f64 = costs.iter().map(|c| f64::from(*c)).sum();
        let amount: f64 = amounts.iter().map(|a| f64::from(*a)).sum();

        prop_assert_eq!(financials.cost, cost);
        prop_assert_eq!(financials.amount, amount);
        prop_assert_eq!(financials.balance, cost - amount);
        prop_assert_eq!(financials.status(), BalanceStatus::of(cost - amount));
    }
}
