//! Role tiers for authorization decisions.
//!
//! The core trusts a resolved (actor_id, role) pair per call; authentication
//! itself lives outside this crate.

use crate::error::DispatchError;
use crate::types::{Role, Source};

/// Senior command roles: full administrative authority.
pub const ADMIN_TIER: &[Role] = &[
  Role::Admin,
  Role::SysAdmin,
  Role::Command,
  Role::NationalSupervisor,
];

/// Roles allowed to drive the incident lifecycle and unit dispatch.
pub const DISPATCHER_TIER: &[Role] = &[
  Role::Admin,
  Role::SysAdmin,
  Role::Command,
  Role::NationalSupervisor,
  Role::Police,
  Role::Fire,
  Role::Medical,
  Role::Traffic,
  Role::DisasterCoordinator,
  Role::MilitaryAnalyst,
];

/// Roles allowed to flag or merge incidents.
pub const FLAG_TIER: &[Role] = &[
  Role::Admin,
  Role::SysAdmin,
  Role::Command,
  Role::NationalSupervisor,
  Role::Verifier,
];

/// Roles allowed to update unit status/location.
pub const UNIT_UPDATE_TIER: &[Role] = &[
  Role::Admin,
  Role::SysAdmin,
  Role::Command,
  Role::NationalSupervisor,
  Role::DisasterCoordinator,
  Role::Traffic,
];

pub fn require(role: Role, allowed: &[Role], action: &str) -> Result<(), DispatchError> {
  if allowed.contains(&role) {
    Ok(())
  } else {
    Err(DispatchError::unauthorized(action))
  }
}

/// Report source derived from the caller's role. Anonymous reports count as
/// citizen-originated regardless of what the payload declares.
pub fn derive_source(role: Option<Role>) -> Option<Source> {
  let role = role?;
  if ADMIN_TIER.contains(&role) || role == Role::Verifier {
    Some(Source::OpsCenter)
  } else if matches!(
    role,
    Role::Police
      | Role::Fire
      | Role::Medical
      | Role::Traffic
      | Role::DisasterCoordinator
      | Role::MilitaryAnalyst
  ) {
    Some(Source::Responder)
  } else {
    Some(Source::Citizen)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dispatcher_tier_includes_admin_tier() {
    for role in ADMIN_TIER {
      assert!(DISPATCHER_TIER.contains(role));
    }
  }

  #[test]
  fn citizen_is_not_a_dispatcher() {
    let err = require(Role::Citizen, DISPATCHER_TIER, "update status").unwrap_err();
    assert!(matches!(err, DispatchError::Unauthorized { .. }));
  }

  #[test]
  fn verifier_can_flag_but_is_not_admin() {
    assert!(require(Role::Verifier, FLAG_TIER, "flag").is_ok());
    assert!(require(Role::Verifier, ADMIN_TIER, "broadcast").is_err());
  }

  #[test]
  fn source_derivation_by_role() {
    assert_eq!(derive_source(None), None);
    assert_eq!(derive_source(Some(Role::Citizen)), Some(Source::Citizen));
    assert_eq!(derive_source(Some(Role::Police)), Some(Source::Responder));
    assert_eq!(derive_source(Some(Role::Verifier)), Some(Source::OpsCenter));
    assert_eq!(derive_source(Some(Role::Admin)), Some(Source::OpsCenter));
  }
}
