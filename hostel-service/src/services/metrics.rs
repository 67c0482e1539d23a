//! Prometheus metrics for hostel-service.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_counter_vec, register_histogram_vec, Counter, CounterVec,
    HistogramVec, TextEncoder,
};

/// Invoice counter by status.
pub static INVOICES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "hostel_invoices_total",
        "Total number of invoices by status",
        &["status"] // pending, paid, cancelled
    )
    .expect("Failed to register invoices_total")
});

/// Total invoiced amount.
pub static INVOICE_AMOUNT_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "hostel_invoice_amount_total",
        "Total amount across generated invoices"
    )
    .expect("Failed to register invoice_amount_total")
});

/// Payment proof upload counter.
pub static PAYMENT_PROOFS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "hostel_payment_proofs_total",
        "Total number of payment proofs attached"
    )
    .expect("Failed to register payment_proofs_total")
});

/// Maintenance request counter by priority.
pub static MAINTENANCE_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "hostel_maintenance_requests_total",
        "Total number of maintenance requests by priority",
        &["priority"]
    )
    .expect("Failed to register maintenance_requests_total")
});

/// Error counter for alerting.
pub static ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "hostel_errors_total",
        "Total number of errors by type",
        &["error_type"]
    )
    .expect("Failed to register errors_total")
});

/// Document store operation duration histogram.
pub static STORE_OP_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "hostel_store_op_duration_seconds",
        "Document store operation duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register store_op_duration")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&INVOICES_TOTAL);
    Lazy::force(&INVOICE_AMOUNT_TOTAL);
    Lazy::force(&PAYMENT_PROOFS_TOTAL);
    Lazy::force(&MAINTENANCE_REQUESTS_TOTAL);
    Lazy::force(&ERRORS_TOTAL);
    Lazy::force(&STORE_OP_DURATION);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
