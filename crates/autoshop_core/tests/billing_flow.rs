use autoshop_core::db::Store;
use autoshop_core::factory::build_test;
use autoshop_core::model::invoice::NewInvoice;
use autoshop_core::repo::{AppointmentRepository, InvoiceListQuery, InvoiceRepository};
use autoshop_core::{
    AppointmentRequest, RepoError, SqliteAppointmentRepository, SqliteInvoiceRepository,
    ValidationError,
};
use chrono::{NaiveDate, NaiveDateTime};

fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 10, 2)
        .unwrap()
        .and_hms_opt(14, 0, 0)
        .unwrap()
}

fn booking(service: &str) -> AppointmentRequest {
    AppointmentRequest {
        client_name: "María González".to_string(),
        email: "maria@test.com".to_string(),
        service_type: service.to_string(),
        date: "2025-10-15".to_string(),
    }
}

fn invoice_count(store: &Store) -> u64 {
    SqliteInvoiceRepository::new(store.clone()).count().unwrap()
}

#[test]
fn create_invoice_persists_and_emails_receipt() {
    let fixture = build_test(fixed_time()).unwrap();

    let appointment = fixture
        .managers
        .appointments
        .create_appointment(&booking("oil_change"))
        .unwrap();

    let receipt = fixture
        .managers
        .billing
        .create_invoice(appointment.id, 50.0)
        .unwrap();

    assert_eq!(receipt.id, 1);
    assert_eq!(receipt.issued_at, fixed_time());
    assert_eq!(receipt.amount, 50.0);
    assert!(receipt.email_sent);

    // Confirmation plus receipt.
    assert_eq!(fixture.email.call_count(), 2);
    let sent = fixture.email.sent();
    assert_eq!(sent[1].to, "maria@test.com");
    assert!(sent[1].subject.contains("Invoice #1"));
    assert!(sent[1].body.contains("$50.00"));

    let stored = fixture.managers.billing.get_invoice(receipt.id).unwrap();
    assert_eq!(stored.appointment_id, appointment.id);
    assert!(!stored.paid);
    assert_eq!(stored.issued_at, fixed_time());
}

#[test]
fn invoice_for_missing_appointment_is_rejected_without_a_row() {
    let fixture = build_test(fixed_time()).unwrap();

    let before = invoice_count(&fixture.store);
    let err = fixture
        .managers
        .billing
        .create_invoice(999, 50.0)
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: "appointment",
            id: 999,
        }
    ));
    assert_eq!(invoice_count(&fixture.store), before);
    assert_eq!(fixture.email.call_count(), 0);
}

#[test]
fn store_foreign_key_rejects_invoices_independently() {
    let fixture = build_test(fixed_time()).unwrap();

    // Bypass the manager pre-check and hit the store directly.
    let repo = SqliteInvoiceRepository::new(fixture.store.clone());
    let err = repo
        .create(&NewInvoice::unpaid(999, 10.0, fixed_time()))
        .unwrap_err();

    assert!(matches!(err, RepoError::Constraint(_)));
    assert_eq!(invoice_count(&fixture.store), 0);
}

#[test]
fn invalid_amount_fails_before_any_lookup_or_write() {
    let fixture = build_test(fixed_time()).unwrap();

    fixture
        .managers
        .appointments
        .create_appointment(&booking("oil_change"))
        .unwrap();
    let confirmations = fixture.email.call_count();

    for bad in [-1.0, f64::NAN, f64::INFINITY] {
        let err = fixture
            .managers
            .billing
            .create_invoice(1, bad)
            .unwrap_err();
        assert!(matches!(
            err,
            RepoError::Validation(ValidationError::InvalidAmount(_))
        ));
    }

    assert_eq!(invoice_count(&fixture.store), 0);
    assert_eq!(fixture.email.call_count(), confirmations);
}

#[test]
fn zero_amount_is_accepted() {
    let fixture = build_test(fixed_time()).unwrap();
    fixture
        .managers
        .appointments
        .create_appointment(&booking("oil_change"))
        .unwrap();

    let receipt = fixture.managers.billing.create_invoice(1, 0.0).unwrap();
    assert_eq!(receipt.amount, 0.0);
}

#[test]
fn invoice_for_appointment_uses_catalogue_price() {
    let fixture = build_test(fixed_time()).unwrap();
    fixture
        .managers
        .appointments
        .create_appointment(&booking("full_service"))
        .unwrap();

    let receipt = fixture.managers.billing.invoice_for_appointment(1).unwrap();
    assert_eq!(receipt.amount, 150.0);

    let found = fixture
        .managers
        .billing
        .find_by_appointment(1)
        .unwrap()
        .unwrap();
    assert_eq!(found.id, receipt.id);
    assert_eq!(found.amount, 150.0);
}

#[test]
fn mark_invoice_paid_flips_the_flag() {
    let fixture = build_test(fixed_time()).unwrap();
    fixture
        .managers
        .appointments
        .create_appointment(&booking("brake_check"))
        .unwrap();
    let receipt = fixture.managers.billing.invoice_for_appointment(1).unwrap();

    fixture
        .managers
        .billing
        .mark_invoice_paid(receipt.id)
        .unwrap();
    assert!(fixture.managers.billing.get_invoice(receipt.id).unwrap().paid);

    let err = fixture.managers.billing.mark_invoice_paid(999).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: "invoice",
            ..
        }
    ));
}

#[test]
fn list_invoices_filters_by_paid_and_appointment() {
    let fixture = build_test(fixed_time()).unwrap();
    let billing = &fixture.managers.billing;

    for _ in 0..3 {
        fixture
            .managers
            .appointments
            .create_appointment(&booking("oil_change"))
            .unwrap();
    }
    for appointment_id in 1..=3 {
        billing.create_invoice(appointment_id, 50.0).unwrap();
    }
    billing.mark_invoice_paid(2).unwrap();

    let paid = billing
        .list_invoices(&InvoiceListQuery {
            paid: Some(true),
            ..InvoiceListQuery::default()
        })
        .unwrap();
    let paid_ids: Vec<i64> = paid.iter().map(|i| i.id).collect();
    assert_eq!(paid_ids, vec![2]);

    let unpaid = billing
        .list_invoices(&InvoiceListQuery {
            paid: Some(false),
            ..InvoiceListQuery::default()
        })
        .unwrap();
    let unpaid_ids: Vec<i64> = unpaid.iter().map(|i| i.id).collect();
    assert_eq!(unpaid_ids, vec![1, 3]);

    let for_first = billing
        .list_invoices(&InvoiceListQuery {
            appointment_id: Some(1),
            ..InvoiceListQuery::default()
        })
        .unwrap();
    assert_eq!(for_first.len(), 1);
    assert_eq!(for_first[0].appointment_id, 1);

    let page = billing
        .list_invoices(&InvoiceListQuery {
            limit: Some(1),
            offset: 1,
            ..InvoiceListQuery::default()
        })
        .unwrap();
    let page_ids: Vec<i64> = page.iter().map(|i| i.id).collect();
    assert_eq!(page_ids, vec![2]);

    let tail = billing
        .list_invoices(&InvoiceListQuery {
            offset: 2,
            ..InvoiceListQuery::default()
        })
        .unwrap();
    let tail_ids: Vec<i64> = tail.iter().map(|i| i.id).collect();
    assert_eq!(tail_ids, vec![3]);
}

#[test]
fn deleting_an_invoiced_appointment_violates_the_constraint() {
    let fixture = build_test(fixed_time()).unwrap();
    fixture
        .managers
        .appointments
        .create_appointment(&booking("oil_change"))
        .unwrap();
    fixture.managers.billing.create_invoice(1, 50.0).unwrap();

    let repo = SqliteAppointmentRepository::new(fixture.store.clone());
    let err = repo.delete(1).unwrap_err();
    assert!(matches!(err, RepoError::Constraint(_)));

    // The appointment the invoice references must survive.
    fixture.managers.appointments.get_appointment(1).unwrap();
}
