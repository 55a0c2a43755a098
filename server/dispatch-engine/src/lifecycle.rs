//! Incident status state machine and per-transition audit trail.

use chrono::{DateTime, Utc};

use crate::error::DispatchError;
use crate::types::{Incident, IncidentStatus};

/// Legal targets per state. Terminal states have none; same-state moves are
/// not listed, so they fail like any other illegal transition.
pub fn allowed_targets(from: IncidentStatus) -> &'static [IncidentStatus] {
  match from {
    IncidentStatus::Pending => &[
      IncidentStatus::Verified,
      IncidentStatus::Dispatched,
      IncidentStatus::Resolved,
      IncidentStatus::FalseAlarm,
    ],
    IncidentStatus::Verified => &[
      IncidentStatus::Dispatched,
      IncidentStatus::Resolved,
      IncidentStatus::FalseAlarm,
    ],
    IncidentStatus::Dispatched => &[IncidentStatus::Resolved, IncidentStatus::FalseAlarm],
    IncidentStatus::Resolved | IncidentStatus::FalseAlarm => &[],
  }
}

pub fn validate(from: IncidentStatus, to: IncidentStatus) -> Result<(), DispatchError> {
  if allowed_targets(from).contains(&to) {
    Ok(())
  } else {
    Err(DispatchError::InvalidTransition { from, to })
  }
}

/// A validated-to-be-attempted status change. The store applies it atomically
/// together with the audit write and any unit side effect.
#[derive(Debug, Clone)]
pub struct Transition {
  pub to: IncidentStatus,
  pub actor_id: i64,
  pub at: DateTime<Utc>,
  /// Unit accompanying a `dispatched` transition, assigned in the same
  /// atomic unit as the status change.
  pub unit_id: Option<i64>,
}

/// Record the actor/timestamp pair for the transition target. Pairs are
/// write-once: the table has no re-entry into a state, so a second write is
/// unreachable, and the guard keeps it that way.
pub fn apply_audit(incident: &mut Incident, transition: &Transition) {
  match transition.to {
    IncidentStatus::Verified => {
      if incident.verified_at.is_none() {
        incident.verified_at = Some(transition.at);
        incident.verified_by = Some(transition.actor_id);
      }
    }
    IncidentStatus::Dispatched => {
      if incident.dispatched_at.is_none() {
        incident.dispatched_at = Some(transition.at);
        incident.dispatched_by = Some(transition.actor_id);
      }
    }
    IncidentStatus::Resolved | IncidentStatus::FalseAlarm => {
      if incident.resolved_at.is_none() {
        incident.resolved_at = Some(transition.at);
        incident.resolved_by = Some(transition.actor_id);
      }
    }
    IncidentStatus::Pending => {}
  }
}

/// Terminal transitions release an assigned unit back to idle.
pub fn releases_unit(to: IncidentStatus) -> bool {
  matches!(to, IncidentStatus::Resolved | IncidentStatus::FalseAlarm)
}
