//! Route incidents to responding agencies and a preferred unit type.

use crate::types::{IncidentType, Role, RoutingSuggestion, Severity};

/// Preferred responding roles per incident type, in priority order.
fn agency_table(incident_type: IncidentType) -> &'static [Role] {
  match incident_type {
    IncidentType::Fire => &[Role::Fire, Role::DisasterCoordinator],
    IncidentType::Flood => &[Role::DisasterCoordinator, Role::Traffic],
    IncidentType::Accident => &[Role::Traffic, Role::Medical],
    IncidentType::Medical => &[Role::Medical],
    IncidentType::Crime => &[Role::Police],
    IncidentType::Unrest => &[Role::Police, Role::MilitaryAnalyst],
    IncidentType::Hazard => &[Role::Fire, Role::DisasterCoordinator],
    IncidentType::Infrastructure => &[Role::DisasterCoordinator, Role::Traffic],
    IncidentType::Crowd => &[Role::Police, Role::Traffic],
    IncidentType::Suspicious => &[Role::Police],
    IncidentType::Other => &[Role::DisasterCoordinator, Role::Police],
  }
}

/// Ordered agency suggestion. High/critical escalates to command and the
/// national supervisor; duplicates are dropped keeping first occurrence.
pub fn suggest_agencies(incident_type: IncidentType, severity: Severity) -> Vec<Role> {
  let mut roles: Vec<Role> = agency_table(incident_type).to_vec();
  if severity.is_escalated() {
    roles.push(Role::Command);
    roles.push(Role::NationalSupervisor);
  }
  let mut deduped = Vec::with_capacity(roles.len());
  for role in roles {
    if !deduped.contains(&role) {
      deduped.push(role);
    }
  }
  deduped
}

/// Single preferred unit type for dispatch.
pub fn suggest_unit_type(incident_type: IncidentType) -> Role {
  match incident_type {
    IncidentType::Fire | IncidentType::Hazard => Role::Fire,
    IncidentType::Flood | IncidentType::Infrastructure => Role::DisasterCoordinator,
    IncidentType::Accident | IncidentType::Medical => Role::Medical,
    IncidentType::Crime
    | IncidentType::Unrest
    | IncidentType::Crowd
    | IncidentType::Suspicious
    | IncidentType::Other => Role::Police,
  }
}

/// Human-readable audit string; displayed, never machine-parsed.
pub fn build_rationale(
  incident_type: IncidentType,
  severity: Severity,
  agencies: &[Role],
  unit_type: Role,
) -> String {
  let agency_list = agencies
    .iter()
    .map(|r| r.as_str())
    .collect::<Vec<_>>()
    .join(",");
  format!(
    "type={}; severity={}; agencies={}; suggested_unit_type={}",
    incident_type.as_str(),
    severity.as_str(),
    agency_list,
    unit_type.as_str()
  )
}

/// Full routing suggestion for an incident.
pub fn suggest(incident_type: IncidentType, severity: Severity) -> RoutingSuggestion {
  let agencies = suggest_agencies(incident_type, severity);
  let unit_type = suggest_unit_type(incident_type);
  let rationale = build_rationale(incident_type, severity, &agencies, unit_type);
  RoutingSuggestion {
    agencies,
    unit_type,
    rationale,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn medical_low_is_just_medical() {
    let agencies = suggest_agencies(IncidentType::Medical, Severity::Low);
    assert_eq!(agencies, vec![Role::Medical]);
  }

  #[test]
  fn medical_critical_escalates_without_duplicates() {
    let agencies = suggest_agencies(IncidentType::Medical, Severity::Critical);
    assert_eq!(
      agencies,
      vec![Role::Medical, Role::Command, Role::NationalSupervisor]
    );
  }

  #[test]
  fn escalation_does_not_duplicate_roles() {
    // Every role appears once even after the command append.
    let agencies = suggest_agencies(IncidentType::Unrest, Severity::High);
    let mut seen = std::collections::HashSet::new();
    assert!(agencies.iter().all(|r| seen.insert(*r)));
  }

  #[test]
  fn fire_routes_to_fire_first() {
    let agencies = suggest_agencies(IncidentType::Fire, Severity::Medium);
    assert_eq!(agencies, vec![Role::Fire, Role::DisasterCoordinator]);
    assert_eq!(suggest_unit_type(IncidentType::Fire), Role::Fire);
  }

  #[test]
  fn default_unit_type_is_police() {
    assert_eq!(suggest_unit_type(IncidentType::Other), Role::Police);
  }

  #[test]
  fn rationale_embeds_all_parts() {
    let suggestion = suggest(IncidentType::Unrest, Severity::High);
    assert_eq!(
      suggestion.rationale,
      "type=unrest; severity=high; agencies=police,military_analyst,command,national_supervisor; suggested_unit_type=police"
    );
  }
}
