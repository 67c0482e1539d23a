//! Utility invoice computation.
//!
//! Pure and synchronous: raw form inputs plus one settings snapshot in,
//! ordered line items and their total out. Safe to call concurrently.

use crate::models::{HostelSettings, LineItem, Room, WaterCalculationMethod};
use hostel_core::error::AppError;
use rust_decimal::Decimal;

/// Price per crate of drinking water. Policy constant, not configurable.
pub fn water_crate_price() -> Decimal {
    Decimal::new(50, 0)
}

/// Raw billing inputs for one room and period, as entered on the admin form.
#[derive(Debug, Clone, Default)]
pub struct UsageInput {
    pub water_old: Decimal,
    pub water_new: Decimal,
    pub electric_old: Decimal,
    pub electric_new: Decimal,
    /// Occupant count for flat-rate water billing; ignored when metered.
    pub number_of_people: u32,
    pub water_crate_count: u32,
}

/// Computed invoice lines and their total. The total is always the sum of
/// the items, never computed separately.
#[derive(Debug, Clone)]
pub struct ComputedInvoice {
    pub items: Vec<LineItem>,
    pub total: Decimal,
}

/// Compute the billable line items for a room and period.
///
/// Item order is fixed: rent, water, electricity, drinking-water crates
/// (when ordered), then extra items in input order. A meter reading lower
/// than the previous one contributes a zero charge rather than a credit; the
/// raw usage still appears in the line label so the anomaly stays visible.
pub fn compute_invoice(
    room: &Room,
    settings: Option<&HostelSettings>,
    usage: &UsageInput,
    extras: &[LineItem],
) -> Result<ComputedInvoice, AppError> {
    let settings = settings.ok_or_else(|| {
        AppError::InvalidConfiguration(anyhow::anyhow!(
            "Hostel settings must be loaded before an invoice can be computed"
        ))
    })?;

    let mut items = Vec::with_capacity(4 + extras.len());

    items.push(LineItem::new("Room rent", room.base_price));

    match settings.water_calculation_method {
        WaterCalculationMethod::Person => {
            let rate = settings.person_rate();
            items.push(LineItem::new(
                format!(
                    "Water (flat rate, {} person(s) x {})",
                    usage.number_of_people, rate
                ),
                Decimal::from(usage.number_of_people) * rate,
            ));
        }
        WaterCalculationMethod::Unit => {
            let units = usage.water_new - usage.water_old;
            items.push(LineItem::new(
                format!(
                    "Water ({} - {} = {} units)",
                    usage.water_new, usage.water_old, units
                ),
                clamp_usage(units) * settings.water_unit_price,
            ));
        }
    }

    let units = usage.electric_new - usage.electric_old;
    items.push(LineItem::new(
        format!(
            "Electricity ({} - {} = {} units)",
            usage.electric_new, usage.electric_old, units
        ),
        clamp_usage(units) * settings.electric_unit_price,
    ));

    if usage.water_crate_count > 0 {
        items.push(LineItem::new(
            format!("Drinking water ({} crates)", usage.water_crate_count),
            Decimal::from(usage.water_crate_count) * water_crate_price(),
        ));
    }

    items.extend_from_slice(extras);

    let total = items.iter().map(|item| item.amount).sum();
    Ok(ComputedInvoice { items, total })
}

/// Meter rollbacks never bill negative amounts.
fn clamp_usage(units: Decimal) -> Decimal {
    units.max(Decimal::ZERO)
}
