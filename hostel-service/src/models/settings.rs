//! Hostel configuration model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How water charges are computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterCalculationMethod {
    /// Metered: price per meter unit consumed.
    #[default]
    Unit,
    /// Flat rate per occupant per billing period.
    Person,
}

impl WaterCalculationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaterCalculationMethod::Unit => "unit",
            WaterCalculationMethod::Person => "person",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "person" => WaterCalculationMethod::Person,
            _ => WaterCalculationMethod::Unit,
        }
    }
}

/// Bank account shown to tenants as the payment channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankAccount {
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
}

/// Hostel-wide billing configuration. A single document; a calculation must
/// use one consistent snapshot of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostelSettings {
    pub name: String,
    pub address: String,
    /// Older settings documents predate this field; they billed per unit.
    #[serde(default)]
    pub water_calculation_method: WaterCalculationMethod,
    pub water_unit_price: Decimal,
    #[serde(default)]
    pub water_price_per_person: Option<Decimal>,
    pub electric_unit_price: Decimal,
    pub late_fee_per_day: Decimal,
    #[serde(rename = "bank_account_info")]
    pub bank_account: BankAccount,
}

impl HostelSettings {
    /// Flat per-person water rate, falling back to the historical default
    /// when the field was never configured.
    pub fn person_rate(&self) -> Decimal {
        self.water_price_per_person
            .unwrap_or_else(default_person_rate)
    }
}

pub fn default_person_rate() -> Decimal {
    Decimal::new(100, 0)
}
