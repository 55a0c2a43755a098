//! Triage Engine — deterministic, rule-based incident intake.
//!
//! Ingests raw incident reports, classifies severity and type from keyword
//! heuristics, flags near-duplicate reports, suggests responding agencies and
//! a unit type, and computes the spatial risk index plus automatic alert
//! drafts for high/critical threats.
//!
//! No AI, no DB, no network; pure computation + in-memory state.

pub mod classifier;
pub mod config;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod risk;
pub mod router;
pub mod types;

pub use config::Config;
pub use engine::TriageEngine;
pub use error::TriageError;
pub use types::{InboundReport, TriageOutcome};
