//! hostel-service: room inventory, tenant residency, utility billing, and
//! maintenance tracking backed by a document store.

pub mod config;
pub mod models;
pub mod services;
pub mod store;
