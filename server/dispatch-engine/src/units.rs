//! Unit proximity ranking and in-radius threat queries.
//!
//! Assignment and release themselves run inside the store transaction (see
//! `store`); these functions are the pure ranking half.

use serde::Serialize;

use crate::error::DispatchError;
use crate::geo;
use crate::types::{Incident, IncidentType, Role, Severity, Unit, UnitStatus};

#[derive(Debug, Clone, Serialize)]
pub struct NearestUnit {
  pub unit_id: i64,
  pub callsign: String,
  pub unit_type: Role,
  pub distance_km: f64,
  pub eta_minutes: f64,
}

/// Nearest idle unit to a point, optionally filtered by unit type. Units
/// without a known location never qualify.
pub fn nearest_unit(
  lat: f64,
  lng: f64,
  unit_type: Option<Role>,
  units: &[Unit],
) -> Result<NearestUnit, DispatchError> {
  let mut best: Option<NearestUnit> = None;
  for unit in units {
    if unit.status != UnitStatus::Idle {
      continue;
    }
    if let Some(wanted) = unit_type {
      if unit.unit_type != wanted {
        continue;
      }
    }
    let (Some(unit_lat), Some(unit_lng)) = (unit.latitude, unit.longitude) else {
      continue;
    };
    let distance_km = geo::haversine_km(lat, lng, unit_lat, unit_lng);
    if best.as_ref().map_or(true, |b| distance_km < b.distance_km) {
      best = Some(NearestUnit {
        unit_id: unit.id,
        callsign: unit.callsign.clone(),
        unit_type: unit.unit_type,
        distance_km,
        eta_minutes: geo::eta_minutes(distance_km),
      });
    }
  }
  best.ok_or_else(|| DispatchError::not_found("no idle units match"))
}

#[derive(Debug, Clone, Serialize)]
pub struct ProximityThreat {
  pub incident_id: i64,
  pub title: String,
  pub severity: Severity,
  pub distance_km: f64,
  pub recommended_action: &'static str,
  pub spatial_risk_index: f64,
}

pub fn recommended_action(incident_type: IncidentType) -> &'static str {
  match incident_type {
    IncidentType::Unrest | IncidentType::Crime => "Avoid area",
    _ => "Seek shelter",
  }
}

/// High/critical incidents within the radius (any status), annotated with a
/// recommended action and the incident's spatial risk index.
pub fn proximity_threats(
  lat: f64,
  lng: f64,
  radius_km: f64,
  incidents: &[Incident],
) -> Vec<ProximityThreat> {
  incidents
    .iter()
    .filter_map(|incident| {
      let distance_km = geo::haversine_km(lat, lng, incident.latitude, incident.longitude);
      if distance_km <= radius_km && incident.severity.is_escalated() {
        Some(ProximityThreat {
          incident_id: incident.id,
          title: incident.title.clone(),
          severity: incident.severity,
          distance_km,
          recommended_action: recommended_action(incident.incident_type),
          spatial_risk_index: incident.spatial_risk_index,
        })
      } else {
        None
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;

  fn unit(id: i64, unit_type: Role, status: UnitStatus, coords: Option<(f64, f64)>) -> Unit {
    Unit {
      id,
      callsign: format!("U-{}", id),
      unit_type,
      status,
      latitude: coords.map(|c| c.0),
      longitude: coords.map(|c| c.1),
      last_updated: Utc::now(),
    }
  }

  #[test]
  fn no_idle_units_is_not_found() {
    let units = vec![unit(1, Role::Police, UnitStatus::Busy, Some((9.0, 38.75)))];
    let err = nearest_unit(9.0, 38.75, None, &units).unwrap_err();
    assert!(matches!(err, DispatchError::NotFound(_)));
  }

  #[test]
  fn unlocatable_units_never_qualify() {
    let units = vec![unit(1, Role::Police, UnitStatus::Idle, None)];
    assert!(nearest_unit(9.0, 38.75, None, &units).is_err());
  }

  #[test]
  fn picks_minimum_distance_of_requested_type() {
    let units = vec![
      unit(1, Role::Police, UnitStatus::Idle, Some((9.10, 38.75))),
      unit(2, Role::Police, UnitStatus::Idle, Some((9.01, 38.75))),
      unit(3, Role::Fire, UnitStatus::Idle, Some((9.001, 38.75))),
    ];
    let nearest = nearest_unit(9.0, 38.75, Some(Role::Police), &units).unwrap();
    assert_eq!(nearest.unit_id, 2);
    assert_eq!(nearest.unit_type, Role::Police);
  }

  #[test]
  fn eta_penalty_only_beyond_ten_km() {
    let near = vec![unit(1, Role::Police, UnitStatus::Idle, Some((9.01, 38.75)))];
    let nearest = nearest_unit(9.0, 38.75, None, &near).unwrap();
    assert!(nearest.distance_km < 10.0);
    assert!((nearest.eta_minutes - nearest.distance_km / 0.5).abs() < 1e-9);

    let far = vec![unit(2, Role::Police, UnitStatus::Idle, Some((9.5, 38.75)))];
    let nearest = nearest_unit(9.0, 38.75, None, &far).unwrap();
    assert!(nearest.distance_km > 10.0);
    assert!((nearest.eta_minutes - nearest.distance_km / 0.5 * 1.1).abs() < 1e-9);
  }

  #[test]
  fn action_depends_on_type() {
    assert_eq!(recommended_action(IncidentType::Unrest), "Avoid area");
    assert_eq!(recommended_action(IncidentType::Crime), "Avoid area");
    assert_eq!(recommended_action(IncidentType::Fire), "Seek shelter");
  }
}
