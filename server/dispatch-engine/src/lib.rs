//! Dispatch Engine — incident lifecycle, unit assignment, and routing core.
//!
//! Builds on the triage engine's pure functions: inbound reports flow through
//! classification and dedup into persisted incidents; lifecycle transitions
//! then move status, record the audit trail, and assign/free field units.
//! Persistence sits behind the `Store` trait (atomic per operation);
//! notification fan-out sits behind the fire-and-forget `Notifier` trait.

pub mod config;
pub mod error;
pub mod geo;
pub mod lifecycle;
pub mod notify;
pub mod rbac;
pub mod service;
pub mod store;
pub mod types;
pub mod units;

pub use config::Config;
pub use error::DispatchError;
pub use service::Dispatch;
pub use store::{MemStore, Store};
