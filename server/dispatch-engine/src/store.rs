//! Repository interface over the transactional store, plus the in-memory
//! implementation.
//!
//! Every trait method is one atomic unit: the lifecycle transition's
//! read-validate-write (including its unit side effect) must be isolated
//! against concurrent writers to the same row. `MemStore` serializes through
//! a single mutex; a poisoned lock surfaces as the retryable `Store` error.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::error::DispatchError;
use crate::lifecycle::{self, Transition};
use crate::types::*;

pub trait Store: Send + Sync {
  fn create_incident(&self, draft: NewIncident) -> Result<Incident, DispatchError>;
  fn incident(&self, id: i64) -> Result<Option<Incident>, DispatchError>;
  fn incidents(&self) -> Result<Vec<Incident>, DispatchError>;
  fn recent_incidents(&self, since: DateTime<Utc>) -> Result<Vec<Incident>, DispatchError>;
  /// Atomic read-validate-write: status, audit pair, and any unit assignment
  /// or release either all apply or none do.
  fn update_incident_status(
    &self,
    id: i64,
    transition: Transition,
  ) -> Result<Incident, DispatchError>;
  fn set_flag(&self, id: i64, reason: String, actor_id: i64) -> Result<Incident, DispatchError>;
  /// Privileged manual merge: marks `id` a duplicate of `target_id` and
  /// forces status to false_alarm, bypassing the transition table.
  fn merge_duplicate(&self, id: i64, target_id: i64) -> Result<Incident, DispatchError>;

  fn create_unit(&self, draft: NewUnit) -> Result<Unit, DispatchError>;
  fn unit(&self, id: i64) -> Result<Option<Unit>, DispatchError>;
  fn units(&self) -> Result<Vec<Unit>, DispatchError>;
  fn update_unit(&self, id: i64, patch: UnitPatch) -> Result<Unit, DispatchError>;
  fn idle_units(&self, unit_type: Option<Role>) -> Result<Vec<Unit>, DispatchError>;

  fn create_alert(&self, draft: NewAlert) -> Result<Alert, DispatchError>;
  fn alerts(&self) -> Result<Vec<Alert>, DispatchError>;

  fn stats(&self) -> Result<Stats, DispatchError>;
}

#[derive(Default)]
struct Inner {
  incidents: BTreeMap<i64, Incident>,
  units: BTreeMap<i64, Unit>,
  alerts: BTreeMap<i64, Alert>,
  next_incident_id: i64,
  next_unit_id: i64,
  next_alert_id: i64,
}

/// In-memory store. Row iteration order is creation order (BTreeMap by id),
/// which the dedup scan relies on for its first-match contract.
#[derive(Default)]
pub struct MemStore {
  inner: Mutex<Inner>,
}

impl MemStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> Result<MutexGuard<'_, Inner>, DispatchError> {
    self
      .inner
      .lock()
      .map_err(|_| DispatchError::store("store lock poisoned"))
  }
}

impl Store for MemStore {
  fn create_incident(&self, draft: NewIncident) -> Result<Incident, DispatchError> {
    let mut inner = self.lock()?;
    inner.next_incident_id += 1;
    let id = inner.next_incident_id;
    let incident = Incident {
      id,
      title: draft.title,
      description: draft.description,
      latitude: draft.latitude,
      longitude: draft.longitude,
      incident_type: draft.incident_type,
      severity: draft.severity,
      status: IncidentStatus::Pending,
      source: draft.source,
      reporter_id: draft.reporter_id,
      created_at: draft.created_at,
      classification: draft.classification,
      suggested_agencies: draft.suggested_agencies,
      suggested_unit_type: draft.suggested_unit_type,
      routing_rationale: draft.routing_rationale,
      spatial_risk_index: draft.spatial_risk_index,
      assigned_unit_id: None,
      potential_duplicate_id: draft.potential_duplicate_id,
      duplicate_of_id: None,
      verified_at: None,
      verified_by: None,
      dispatched_at: None,
      dispatched_by: None,
      resolved_at: None,
      resolved_by: None,
      flagged: false,
      flag_reason: None,
      flagged_by: None,
    };
    inner.incidents.insert(id, incident.clone());
    Ok(incident)
  }

  fn incident(&self, id: i64) -> Result<Option<Incident>, DispatchError> {
    Ok(self.lock()?.incidents.get(&id).cloned())
  }

  fn incidents(&self) -> Result<Vec<Incident>, DispatchError> {
    Ok(self.lock()?.incidents.values().cloned().collect())
  }

  fn recent_incidents(&self, since: DateTime<Utc>) -> Result<Vec<Incident>, DispatchError> {
    Ok(
      self
        .lock()?
        .incidents
        .values()
        .filter(|i| i.created_at >= since)
        .cloned()
        .collect(),
    )
  }

  fn update_incident_status(
    &self,
    id: i64,
    transition: Transition,
  ) -> Result<Incident, DispatchError> {
    let mut inner = self.lock()?;

    // Validate everything before the first write so a failure leaves no
    // partial state behind.
    let current = inner
      .incidents
      .get(&id)
      .ok_or_else(|| DispatchError::not_found(format!("incident {}", id)))?
      .status;
    lifecycle::validate(current, transition.to)?;

    // A unit id accompanies only the dispatched transition.
    let assign_unit = match (transition.to, transition.unit_id) {
      (IncidentStatus::Dispatched, Some(unit_id)) => {
        if !inner.units.contains_key(&unit_id) {
          return Err(DispatchError::not_found(format!("unit {}", unit_id)));
        }
        Some(unit_id)
      }
      _ => None,
    };

    let assigned_before = inner
      .incidents
      .get(&id)
      .and_then(|i| i.assigned_unit_id);

    if let Some(unit_id) = assign_unit {
      // Permissive by contract: a busy unit may be reassigned without
      // releasing its prior incident.
      if let Some(unit) = inner.units.get_mut(&unit_id) {
        unit.status = UnitStatus::Busy;
        unit.last_updated = transition.at;
      }
    }

    if lifecycle::releases_unit(transition.to) {
      if let Some(unit_id) = assigned_before {
        if let Some(unit) = inner.units.get_mut(&unit_id) {
          unit.status = UnitStatus::Idle;
          unit.last_updated = transition.at;
        }
      }
    }

    let incident = inner
      .incidents
      .get_mut(&id)
      .ok_or_else(|| DispatchError::not_found(format!("incident {}", id)))?;
    if let Some(unit_id) = assign_unit {
      incident.assigned_unit_id = Some(unit_id);
    }
    lifecycle::apply_audit(incident, &transition);
    incident.status = transition.to;
    Ok(incident.clone())
  }

  fn set_flag(&self, id: i64, reason: String, actor_id: i64) -> Result<Incident, DispatchError> {
    let mut inner = self.lock()?;
    let incident = inner
      .incidents
      .get_mut(&id)
      .ok_or_else(|| DispatchError::not_found(format!("incident {}", id)))?;
    incident.flagged = true;
    incident.flag_reason = Some(reason);
    incident.flagged_by = Some(actor_id);
    Ok(incident.clone())
  }

  fn merge_duplicate(&self, id: i64, target_id: i64) -> Result<Incident, DispatchError> {
    if id == target_id {
      return Err(DispatchError::conflict("cannot merge an incident into itself"));
    }
    let mut inner = self.lock()?;
    let target_created_at = inner
      .incidents
      .get(&target_id)
      .ok_or_else(|| DispatchError::not_found(format!("incident {}", target_id)))?
      .created_at;
    let incident = inner
      .incidents
      .get_mut(&id)
      .ok_or_else(|| DispatchError::not_found(format!("incident {}", id)))?;
    if incident.duplicate_of_id.is_some() {
      return Err(DispatchError::conflict("incident is already merged"));
    }
    if target_created_at > incident.created_at {
      return Err(DispatchError::conflict("merge target is newer than the incident"));
    }
    incident.duplicate_of_id = Some(target_id);
    incident.status = IncidentStatus::FalseAlarm;
    Ok(incident.clone())
  }

  fn create_unit(&self, draft: NewUnit) -> Result<Unit, DispatchError> {
    let mut inner = self.lock()?;
    if inner.units.values().any(|u| u.callsign == draft.callsign) {
      return Err(DispatchError::conflict(format!(
        "callsign {} already exists",
        draft.callsign
      )));
    }
    inner.next_unit_id += 1;
    let id = inner.next_unit_id;
    let unit = Unit {
      id,
      callsign: draft.callsign,
      unit_type: draft.unit_type,
      status: UnitStatus::Idle,
      latitude: draft.latitude,
      longitude: draft.longitude,
      last_updated: Utc::now(),
    };
    inner.units.insert(id, unit.clone());
    Ok(unit)
  }

  fn unit(&self, id: i64) -> Result<Option<Unit>, DispatchError> {
    Ok(self.lock()?.units.get(&id).cloned())
  }

  fn units(&self) -> Result<Vec<Unit>, DispatchError> {
    Ok(self.lock()?.units.values().cloned().collect())
  }

  fn update_unit(&self, id: i64, patch: UnitPatch) -> Result<Unit, DispatchError> {
    let mut inner = self.lock()?;
    let unit = inner
      .units
      .get_mut(&id)
      .ok_or_else(|| DispatchError::not_found(format!("unit {}", id)))?;
    if let Some(status) = patch.status {
      unit.status = status;
    }
    if let Some(latitude) = patch.latitude {
      unit.latitude = Some(latitude);
    }
    if let Some(longitude) = patch.longitude {
      unit.longitude = Some(longitude);
    }
    unit.last_updated = Utc::now();
    Ok(unit.clone())
  }

  fn idle_units(&self, unit_type: Option<Role>) -> Result<Vec<Unit>, DispatchError> {
    Ok(
      self
        .lock()?
        .units
        .values()
        .filter(|u| u.status == UnitStatus::Idle)
        .filter(|u| unit_type.map_or(true, |t| u.unit_type == t))
        .cloned()
        .collect(),
    )
  }

  fn create_alert(&self, draft: NewAlert) -> Result<Alert, DispatchError> {
    let mut inner = self.lock()?;
    inner.next_alert_id += 1;
    let id = inner.next_alert_id;
    let alert = Alert {
      id,
      title: draft.title,
      message: draft.message,
      severity: draft.severity,
      incident_id: draft.incident_id,
      latitude: draft.latitude,
      longitude: draft.longitude,
      radius_km: draft.radius_km,
      audience: draft.audience,
      recommended_action: draft.recommended_action,
      created_at: Utc::now(),
    };
    inner.alerts.insert(id, alert.clone());
    Ok(alert)
  }

  fn alerts(&self) -> Result<Vec<Alert>, DispatchError> {
    Ok(self.lock()?.alerts.values().cloned().collect())
  }

  fn stats(&self) -> Result<Stats, DispatchError> {
    let inner = self.lock()?;
    let statuses = [
      IncidentStatus::Pending,
      IncidentStatus::Verified,
      IncidentStatus::Dispatched,
      IncidentStatus::Resolved,
      IncidentStatus::FalseAlarm,
    ];
    let severities = [
      Severity::Low,
      Severity::Medium,
      Severity::High,
      Severity::Critical,
    ];
    Ok(Stats {
      total_incidents: inner.incidents.len(),
      by_status: statuses
        .iter()
        .map(|&status| StatusCount {
          status,
          count: inner.incidents.values().filter(|i| i.status == status).count(),
        })
        .collect(),
      by_severity: severities
        .iter()
        .map(|&severity| SeverityCount {
          severity,
          count: inner
            .incidents
            .values()
            .filter(|i| i.severity == severity)
            .count(),
        })
        .collect(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;

  fn draft(title: &str) -> NewIncident {
    NewIncident {
      title: title.into(),
      description: "test".into(),
      latitude: 9.01,
      longitude: 38.75,
      incident_type: IncidentType::Fire,
      severity: Severity::High,
      source: Source::Citizen,
      reporter_id: None,
      created_at: Utc::now(),
      classification: ClassificationResult::default(),
      suggested_agencies: vec![Role::Fire],
      suggested_unit_type: Role::Fire,
      routing_rationale: "type=fire".into(),
      spatial_risk_index: 0.5,
      potential_duplicate_id: None,
    }
  }

  fn transition(to: IncidentStatus, unit_id: Option<i64>) -> Transition {
    Transition {
      to,
      actor_id: 7,
      at: Utc::now(),
      unit_id,
    }
  }

  #[test]
  fn ids_are_sequential() {
    let store = MemStore::new();
    let a = store.create_incident(draft("a")).unwrap();
    let b = store.create_incident(draft("b")).unwrap();
    assert_eq!(a.id + 1, b.id);
    assert_eq!(a.status, IncidentStatus::Pending);
  }

  #[test]
  fn transition_records_audit_and_status() {
    let store = MemStore::new();
    let incident = store.create_incident(draft("a")).unwrap();
    let updated = store
      .update_incident_status(incident.id, transition(IncidentStatus::Resolved, None))
      .unwrap();
    assert_eq!(updated.status, IncidentStatus::Resolved);
    assert_eq!(updated.resolved_by, Some(7));
    assert!(updated.resolved_at.is_some());
  }

  #[test]
  fn terminal_state_rejects_further_transitions() {
    let store = MemStore::new();
    let incident = store.create_incident(draft("a")).unwrap();
    store
      .update_incident_status(incident.id, transition(IncidentStatus::Resolved, None))
      .unwrap();
    let err = store
      .update_incident_status(incident.id, transition(IncidentStatus::Pending, None))
      .unwrap_err();
    assert!(matches!(err, DispatchError::InvalidTransition { .. }));
  }

  #[test]
  fn dispatch_with_missing_unit_leaves_no_partial_state() {
    let store = MemStore::new();
    let incident = store.create_incident(draft("a")).unwrap();
    let err = store
      .update_incident_status(incident.id, transition(IncidentStatus::Dispatched, Some(99)))
      .unwrap_err();
    assert!(matches!(err, DispatchError::NotFound(_)));
    let after = store.incident(incident.id).unwrap().unwrap();
    assert_eq!(after.status, IncidentStatus::Pending);
    assert!(after.dispatched_at.is_none());
    assert!(after.assigned_unit_id.is_none());
  }

  #[test]
  fn dispatch_assigns_and_resolution_releases() {
    let store = MemStore::new();
    let unit = store
      .create_unit(NewUnit {
        callsign: "ALPHA-1".into(),
        unit_type: Role::Fire,
        latitude: Some(9.0),
        longitude: Some(38.75),
      })
      .unwrap();
    let incident = store.create_incident(draft("a")).unwrap();

    let dispatched = store
      .update_incident_status(
        incident.id,
        transition(IncidentStatus::Dispatched, Some(unit.id)),
      )
      .unwrap();
    assert_eq!(dispatched.assigned_unit_id, Some(unit.id));
    assert_eq!(
      store.unit(unit.id).unwrap().unwrap().status,
      UnitStatus::Busy
    );

    let resolved = store
      .update_incident_status(incident.id, transition(IncidentStatus::Resolved, None))
      .unwrap();
    // Assignment reference is history; only the unit goes back to idle.
    assert_eq!(resolved.assigned_unit_id, Some(unit.id));
    assert_eq!(
      store.unit(unit.id).unwrap().unwrap().status,
      UnitStatus::Idle
    );
  }

  #[test]
  fn false_alarm_also_releases_the_unit() {
    let store = MemStore::new();
    let unit = store
      .create_unit(NewUnit {
        callsign: "BRAVO-2".into(),
        unit_type: Role::Police,
        latitude: None,
        longitude: None,
      })
      .unwrap();
    let incident = store.create_incident(draft("a")).unwrap();
    store
      .update_incident_status(
        incident.id,
        transition(IncidentStatus::Dispatched, Some(unit.id)),
      )
      .unwrap();
    store
      .update_incident_status(incident.id, transition(IncidentStatus::FalseAlarm, None))
      .unwrap();
    assert_eq!(
      store.unit(unit.id).unwrap().unwrap().status,
      UnitStatus::Idle
    );
  }

  #[test]
  fn unit_id_ignored_outside_dispatched() {
    let store = MemStore::new();
    let unit = store
      .create_unit(NewUnit {
        callsign: "CHARLIE-3".into(),
        unit_type: Role::Police,
        latitude: None,
        longitude: None,
      })
      .unwrap();
    let incident = store.create_incident(draft("a")).unwrap();
    let verified = store
      .update_incident_status(
        incident.id,
        transition(IncidentStatus::Verified, Some(unit.id)),
      )
      .unwrap();
    assert!(verified.assigned_unit_id.is_none());
    assert_eq!(
      store.unit(unit.id).unwrap().unwrap().status,
      UnitStatus::Idle
    );
  }

  #[test]
  fn merge_conflicts() {
    let store = MemStore::new();
    let a = store.create_incident(draft("a")).unwrap();
    let b = store.create_incident(draft("b")).unwrap();

    let err = store.merge_duplicate(a.id, a.id).unwrap_err();
    assert!(matches!(err, DispatchError::Conflict(_)));

    // b is newer than a: merging a into b violates creation-time ordering.
    let err = store.merge_duplicate(a.id, b.id).unwrap_err();
    assert!(matches!(err, DispatchError::Conflict(_)));

    let merged = store.merge_duplicate(b.id, a.id).unwrap();
    assert_eq!(merged.duplicate_of_id, Some(a.id));
    assert_eq!(merged.status, IncidentStatus::FalseAlarm);

    // duplicate_of is set once.
    let err = store.merge_duplicate(b.id, a.id).unwrap_err();
    assert!(matches!(err, DispatchError::Conflict(_)));
  }

  #[test]
  fn duplicate_callsign_conflicts() {
    let store = MemStore::new();
    let unit = NewUnit {
      callsign: "ALPHA-1".into(),
      unit_type: Role::Police,
      latitude: None,
      longitude: None,
    };
    store.create_unit(unit.clone()).unwrap();
    assert!(matches!(
      store.create_unit(unit).unwrap_err(),
      DispatchError::Conflict(_)
    ));
  }

  #[test]
  fn unit_patch_applies_field_by_field() {
    let store = MemStore::new();
    let unit = store
      .create_unit(NewUnit {
        callsign: "DELTA-4".into(),
        unit_type: Role::Medical,
        latitude: Some(9.0),
        longitude: Some(38.75),
      })
      .unwrap();
    let patched = store
      .update_unit(
        unit.id,
        UnitPatch {
          status: Some(UnitStatus::Offline),
          latitude: None,
          longitude: None,
        },
      )
      .unwrap();
    assert_eq!(patched.status, UnitStatus::Offline);
    // Untouched fields keep their values.
    assert_eq!(patched.latitude, Some(9.0));
  }

  #[test]
  fn stats_counts_by_status_and_severity() {
    let store = MemStore::new();
    let a = store.create_incident(draft("a")).unwrap();
    store.create_incident(draft("b")).unwrap();
    store
      .update_incident_status(a.id, transition(IncidentStatus::Resolved, None))
      .unwrap();
    let stats = store.stats().unwrap();
    assert_eq!(stats.total_incidents, 2);
    let pending = stats
      .by_status
      .iter()
      .find(|c| c.status == IncidentStatus::Pending)
      .unwrap();
    assert_eq!(pending.count, 1);
    let high = stats
      .by_severity
      .iter()
      .find(|c| c.severity == Severity::High)
      .unwrap();
    assert_eq!(high.count, 2);
  }
}
