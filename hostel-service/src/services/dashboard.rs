//! Dashboard aggregation.
//!
//! Plain functions over already-fetched records, so the same code serves a
//! one-shot query or a live change feed.

use crate::models::{Invoice, InvoiceStatus, MaintenanceRequest, RequestStatus, Room, RoomStatus};
use rust_decimal::Decimal;

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total_rooms: usize,
    pub occupied_rooms: usize,
    /// Percent, rounded.
    pub occupancy_rate: u32,
    pub pending_invoices: usize,
    pub total_pending_amount: Decimal,
    pub open_requests: usize,
}

/// Summarize occupancy, receivables, and maintenance workload.
///
/// Pending amounts only count invoices whose room still exists; a bill left
/// behind by a deleted room would otherwise inflate receivables forever.
pub fn summarize(
    rooms: &[Room],
    invoices: &[Invoice],
    requests: &[MaintenanceRequest],
) -> DashboardSummary {
    let total_rooms = rooms.len();
    let occupied_rooms = rooms
        .iter()
        .filter(|room| room.status == RoomStatus::Occupied)
        .count();
    let occupancy_rate = if total_rooms > 0 {
        ((occupied_rooms as f64 / total_rooms as f64) * 100.0).round() as u32
    } else {
        0
    };

    let billable: Vec<&Invoice> = invoices
        .iter()
        .filter(|invoice| invoice.status == InvoiceStatus::Pending)
        .filter(|invoice| rooms.iter().any(|room| room.room_number == invoice.room_id))
        .collect();
    let total_pending_amount = billable.iter().map(|invoice| invoice.total_amount).sum();

    let open_requests = requests
        .iter()
        .filter(|request| {
            matches!(
                request.status,
                RequestStatus::Open | RequestStatus::InProgress
            )
        })
        .count();

    DashboardSummary {
        total_rooms,
        occupied_rooms,
        occupancy_rate,
        pending_invoices: billable.len(),
        total_pending_amount,
        open_requests,
    }
}
