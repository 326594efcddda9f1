//! directory-service: the multi-tenant directory core.
//!
//! Everything the per-entity services share: the party hierarchy reference,
//! claims and their signed-token codec, query criteria, permission
//! resolution, and the generic tenant-scoped record-access engine.
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod startup;
