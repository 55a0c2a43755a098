//! Structured error taxonomy for dispatch operations.
//!
//! `Store` is the only retryable member; everything else is permanent for the
//! given input and surfaced to the caller unchanged.

use thiserror::Error;

use crate::types::IncidentStatus;

#[derive(Debug, Error)]
pub enum DispatchError {
  #[error("validation: {field}: {reason}")]
  Validation { field: String, reason: String },

  #[error("not found: {0}")]
  NotFound(String),

  #[error("invalid status transition from {from} to {to}")]
  InvalidTransition {
    from: IncidentStatus,
    to: IncidentStatus,
  },

  #[error("not authorized: {action}")]
  Unauthorized { action: String },

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store unavailable: {0}")]
  Store(String),
}

impl DispatchError {
  pub fn validation(field: &str, reason: &str) -> Self {
    Self::Validation {
      field: field.to_string(),
      reason: reason.to_string(),
    }
  }

  pub fn not_found(what: impl Into<String>) -> Self {
    Self::NotFound(what.into())
  }

  pub fn unauthorized(action: &str) -> Self {
    Self::Unauthorized {
      action: action.to_string(),
    }
  }

  pub fn conflict(msg: impl Into<String>) -> Self {
    Self::Conflict(msg.into())
  }

  pub fn store(msg: impl Into<String>) -> Self {
    Self::Store(msg.into())
  }

  /// Only store failures should be retried by callers.
  pub fn is_retryable(&self) -> bool {
    matches!(self, Self::Store(_))
  }
}

impl From<triage_engine::TriageError> for DispatchError {
  fn from(err: triage_engine::TriageError) -> Self {
    match err {
      triage_engine::TriageError::Validation { field, reason } => {
        Self::Validation { field, reason }
      }
      other => Self::validation("report", &other.to_string()),
    }
  }
}
