//! Domain models for hostel-service.

mod invoice;
mod maintenance;
mod meter_reading;
mod room;
mod settings;
mod tenant;

pub use invoice::{Invoice, InvoiceStatus, LineItem};
pub use maintenance::{
    CreateMaintenanceRequest, MaintenanceRequest, RequestPriority, RequestStatus,
};
pub use meter_reading::{MeterReading, RecordReading};
pub use room::{CreateRoom, Room, RoomStatus, RoomType};
pub use settings::{BankAccount, HostelSettings, WaterCalculationMethod};
pub use tenant::{EmergencyContact, RegisterTenant, Tenant, TenantDocument};
