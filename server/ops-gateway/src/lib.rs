//! Ops Gateway
//!
//! HTTP service that fronts the intake-and-dispatch pipeline: report intake,
//! incident lifecycle, unit provisioning, alert broadcast, and routing queries.
//! Bind to 127.0.0.1 by default (internal only).

pub mod handlers;
mod state;
mod types;

pub use state::AppState;
