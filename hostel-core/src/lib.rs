//! hostel-core: Shared infrastructure for the hostel management services.
pub mod config;
pub mod error;
pub mod observability;

pub use async_trait;
pub use bson;
pub use mongodb;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tracing;
