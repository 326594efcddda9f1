//! service-core: Shared infrastructure for directory services.
pub mod config;
pub mod error;
pub mod observability;

pub use async_trait;
pub use mongodb;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tracing;
