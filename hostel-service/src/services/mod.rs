//! Services module for hostel-service.

pub mod billing;
pub mod calculator;
pub mod dashboard;
pub mod maintenance;
pub mod metrics;
pub mod residency;
pub mod storage;

pub use billing::{BillingService, GenerateInvoice};
pub use calculator::{compute_invoice, water_crate_price, ComputedInvoice, UsageInput};
pub use dashboard::{summarize, DashboardSummary};
pub use maintenance::{ListRequestsFilter, MaintenanceService};
pub use metrics::{get_metrics, init_metrics};
pub use residency::ResidencyService;
pub use storage::{LocalStorage, ObjectStorage};
