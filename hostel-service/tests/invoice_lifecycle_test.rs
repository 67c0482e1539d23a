//! Invoice lifecycle integration tests: creation and uniqueness, payment
//! proof review flow, paid/cancelled transitions, and derived statuses.

mod common;

use chrono::{Duration, TimeZone, Utc};
use common::{dec, unit_settings, TestApp, TEST_TENANT_ID};
use hostel_core::error::AppError;
use hostel_service::models::{Invoice, InvoiceStatus, LineItem};
use hostel_service::services::{BillingService, GenerateInvoice, UsageInput};
use rust_decimal::Decimal;

fn generate_input(room_number: &str, month: u32, year: i32) -> GenerateInvoice {
    GenerateInvoice {
        room_number: room_number.to_string(),
        month,
        year,
        usage: UsageInput {
            water_old: dec(30),
            water_new: dec(45),
            electric_old: dec(100),
            electric_new: dec(150),
            water_crate_count: 2,
            ..Default::default()
        },
        extras: Vec::new(),
    }
}

async fn app_with_room() -> TestApp {
    let app = TestApp::with_unit_settings().await;
    app.add_occupied_room("101", 3500, TEST_TENANT_ID).await;
    app
}

#[tokio::test]
async fn generate_creates_a_pending_invoice() {
    let app = app_with_room().await;

    let invoice = app
        .billing
        .generate_invoice(generate_input("101", 11, 2025))
        .await
        .expect("generate invoice");

    assert_eq!(invoice.invoice_id, "INV-202511-101");
    assert_eq!(invoice.status, InvoiceStatus::Pending);
    assert_eq!(invoice.tenant_id, TEST_TENANT_ID);
    assert_eq!(invoice.total_amount, dec(4270));
    assert!(invoice.payment_proof_url.is_none());
    assert!(invoice.paid_at.is_none());
    assert_eq!(invoice.due_date - invoice.created_at, Duration::days(5));

    let stored = app
        .billing
        .get(&invoice.invoice_id)
        .await
        .expect("fetch invoice")
        .expect("invoice persisted");
    let sum: Decimal = stored.items.iter().map(|item| item.amount).sum();
    assert_eq!(stored.total_amount, sum);
}

#[tokio::test]
async fn second_generation_for_same_period_is_a_duplicate() {
    let app = app_with_room().await;

    app.billing
        .generate_invoice(generate_input("101", 11, 2025))
        .await
        .expect("first generation succeeds");

    let err = app
        .billing
        .generate_invoice(generate_input("101", 11, 2025))
        .await
        .expect_err("second generation must fail");

    match err {
        AppError::DuplicateInvoice(message) => {
            assert!(message.contains("11/2025"));
            assert!(message.contains("101"));
        }
        other => panic!("expected DuplicateInvoice, got {:?}", other),
    }

    // A different period is still billable.
    app.billing
        .generate_invoice(generate_input("101", 12, 2025))
        .await
        .expect("next period generates");
}

#[tokio::test]
async fn generate_without_settings_is_an_invalid_configuration() {
    let app = TestApp::new();
    app.add_occupied_room("101", 3500, TEST_TENANT_ID).await;

    let err = app
        .billing
        .generate_invoice(generate_input("101", 11, 2025))
        .await
        .expect_err("must fail without settings");

    assert!(matches!(err, AppError::InvalidConfiguration(_)));
    assert!(app
        .billing
        .get("INV-202511-101")
        .await
        .expect("lookup")
        .is_none());
}

#[tokio::test]
async fn generate_rejects_a_vacant_room() {
    let app = TestApp::with_unit_settings().await;
    app.residency
        .create_room(common::sample_room("102", 3500))
        .await
        .expect("create room");

    let err = app
        .billing
        .generate_invoice(generate_input("102", 11, 2025))
        .await
        .expect_err("vacant room is not billable");

    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn generate_rejects_an_out_of_range_month() {
    let app = app_with_room().await;

    let err = app
        .billing
        .generate_invoice(generate_input("101", 13, 2025))
        .await
        .expect_err("month 13 is invalid");

    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn attached_proof_keeps_the_invoice_pending_awaiting_review() {
    let app = app_with_room().await;
    let invoice = app
        .billing
        .generate_invoice(generate_input("101", 11, 2025))
        .await
        .expect("generate invoice");

    let updated = app
        .billing
        .attach_payment_proof(&invoice.invoice_id, "slips/202511-101.jpg")
        .await
        .expect("attach proof");

    assert_eq!(updated.status, InvoiceStatus::Pending);
    assert!(updated.awaiting_review());

    let stored = app
        .billing
        .get(&invoice.invoice_id)
        .await
        .expect("fetch")
        .expect("exists");
    assert_eq!(
        stored.payment_proof_url.as_deref(),
        Some("slips/202511-101.jpg")
    );
    assert_eq!(stored.status, InvoiceStatus::Pending);
}

#[tokio::test]
async fn attaching_a_second_proof_is_rejected() {
    let app = app_with_room().await;
    let invoice = app
        .billing
        .generate_invoice(generate_input("101", 11, 2025))
        .await
        .expect("generate invoice");

    app.billing
        .attach_payment_proof(&invoice.invoice_id, "slips/first.jpg")
        .await
        .expect("first attach");

    let err = app
        .billing
        .attach_payment_proof(&invoice.invoice_id, "slips/second.jpg")
        .await
        .expect_err("second attach must fail");
    assert!(matches!(err, AppError::InvalidTransition(_)));

    let stored = app
        .billing
        .get(&invoice.invoice_id)
        .await
        .expect("fetch")
        .expect("exists");
    assert_eq!(stored.payment_proof_url.as_deref(), Some("slips/first.jpg"));
}

#[tokio::test]
async fn proof_cannot_be_attached_once_paid() {
    let app = app_with_room().await;
    let invoice = app
        .billing
        .generate_invoice(generate_input("101", 11, 2025))
        .await
        .expect("generate invoice");

    app.billing
        .mark_paid(&invoice.invoice_id)
        .await
        .expect("mark paid");

    let err = app
        .billing
        .attach_payment_proof(&invoice.invoice_id, "slips/late.jpg")
        .await
        .expect_err("paid invoices take no proof");
    assert!(matches!(err, AppError::InvalidTransition(_)));
}

#[tokio::test]
async fn mark_paid_sets_paid_at_once_and_only_once() {
    let app = app_with_room().await;
    let invoice = app
        .billing
        .generate_invoice(generate_input("101", 11, 2025))
        .await
        .expect("generate invoice");

    let paid = app
        .billing
        .mark_paid(&invoice.invoice_id)
        .await
        .expect("mark paid");
    assert_eq!(paid.status, InvoiceStatus::Paid);
    assert!(paid.paid_at.is_some());

    let err = app
        .billing
        .mark_paid(&invoice.invoice_id)
        .await
        .expect_err("second mark_paid must fail");
    match err {
        AppError::InvalidTransition(message) => assert!(message.contains("already paid")),
        other => panic!("expected InvalidTransition, got {:?}", other),
    }
}

#[tokio::test]
async fn mark_paid_works_with_or_without_proof() {
    let app = app_with_room().await;

    let with_proof = app
        .billing
        .generate_invoice(generate_input("101", 11, 2025))
        .await
        .expect("generate");
    app.billing
        .attach_payment_proof(&with_proof.invoice_id, "slips/a.jpg")
        .await
        .expect("attach");
    app.billing
        .mark_paid(&with_proof.invoice_id)
        .await
        .expect("paid with proof");

    let without_proof = app
        .billing
        .generate_invoice(generate_input("101", 12, 2025))
        .await
        .expect("generate");
    app.billing
        .mark_paid(&without_proof.invoice_id)
        .await
        .expect("paid without proof");
}

#[tokio::test]
async fn cancelled_invoices_accept_no_further_transitions() {
    let app = app_with_room().await;
    let invoice = app
        .billing
        .generate_invoice(generate_input("101", 11, 2025))
        .await
        .expect("generate invoice");

    let cancelled = app
        .billing
        .cancel(&invoice.invoice_id)
        .await
        .expect("cancel");
    assert_eq!(cancelled.status, InvoiceStatus::Cancelled);

    let err = app
        .billing
        .mark_paid(&invoice.invoice_id)
        .await
        .expect_err("cancelled invoices cannot be paid");
    assert!(matches!(err, AppError::InvalidTransition(_)));

    let err = app
        .billing
        .cancel(&invoice.invoice_id)
        .await
        .expect_err("cancelling twice fails");
    assert!(matches!(err, AppError::InvalidTransition(_)));
}

#[tokio::test]
async fn paid_invoices_cannot_be_cancelled() {
    let app = app_with_room().await;
    let invoice = app
        .billing
        .generate_invoice(generate_input("101", 11, 2025))
        .await
        .expect("generate invoice");

    app.billing
        .mark_paid(&invoice.invoice_id)
        .await
        .expect("mark paid");

    let err = app
        .billing
        .cancel(&invoice.invoice_id)
        .await
        .expect_err("paid invoices are not cancellable");
    assert!(matches!(err, AppError::InvalidTransition(_)));
}

#[tokio::test]
async fn delete_removes_the_invoice_from_any_state() {
    let app = app_with_room().await;
    let invoice = app
        .billing
        .generate_invoice(generate_input("101", 11, 2025))
        .await
        .expect("generate invoice");
    app.billing
        .mark_paid(&invoice.invoice_id)
        .await
        .expect("mark paid");

    app.billing
        .delete(&invoice.invoice_id)
        .await
        .expect("delete");

    assert!(app
        .billing
        .get(&invoice.invoice_id)
        .await
        .expect("lookup")
        .is_none());

    // The period becomes billable again after the hard delete.
    app.billing
        .generate_invoice(generate_input("101", 11, 2025))
        .await
        .expect("re-generate after delete");
}

#[tokio::test]
async fn tenant_listing_is_sorted_by_newest_due_date() {
    let app = app_with_room().await;
    app.billing
        .generate_invoice(generate_input("101", 10, 2025))
        .await
        .expect("generate");
    app.billing
        .generate_invoice(generate_input("101", 11, 2025))
        .await
        .expect("generate");

    let invoices = app
        .billing
        .list_for_tenant(TEST_TENANT_ID)
        .await
        .expect("list");

    assert_eq!(invoices.len(), 2);
    assert!(invoices[0].due_date >= invoices[1].due_date);
}

fn handcrafted_invoice(due_year: i32, due_month: u32, due_day: u32) -> Invoice {
    Invoice {
        invoice_id: Invoice::document_id(2025, 11, "101"),
        room_id: "101".to_string(),
        tenant_id: TEST_TENANT_ID.to_string(),
        month: 11,
        year: 2025,
        status: InvoiceStatus::Pending,
        items: vec![LineItem::new("Room rent", dec(3500))],
        total_amount: dec(3500),
        due_date: Utc
            .with_ymd_and_hms(due_year, due_month, due_day, 0, 0, 0)
            .unwrap(),
        payment_proof_url: None,
        paid_at: None,
        created_at: Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap(),
    }
}

#[test]
fn overdue_is_computed_at_read_time() {
    let invoice = handcrafted_invoice(2025, 11, 6);

    let before = Utc.with_ymd_and_hms(2025, 11, 5, 12, 0, 0).unwrap();
    let after = Utc.with_ymd_and_hms(2025, 11, 8, 12, 0, 0).unwrap();

    assert_eq!(
        BillingService::effective_status(&invoice, before),
        InvoiceStatus::Pending
    );
    assert_eq!(
        BillingService::effective_status(&invoice, after),
        InvoiceStatus::Overdue
    );
    // The stored status never changed.
    assert_eq!(invoice.status, InvoiceStatus::Pending);
}

#[test]
fn late_fee_accrues_per_day_overdue() {
    let settings = unit_settings();
    let invoice = handcrafted_invoice(2025, 11, 6);

    let on_time = Utc.with_ymd_and_hms(2025, 11, 6, 0, 0, 0).unwrap();
    assert_eq!(
        BillingService::late_fee(&invoice, &settings, on_time),
        Decimal::ZERO
    );

    let four_days_late = Utc.with_ymd_and_hms(2025, 11, 10, 0, 0, 0).unwrap();
    assert_eq!(
        BillingService::late_fee(&invoice, &settings, four_days_late),
        dec(200)
    );
}
