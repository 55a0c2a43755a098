//! Orchestration facade: intake, lifecycle, units, alerts.
//!
//! Each public operation is one inbound request: role gate, store
//! transaction, then best-effort notification. Notifications never affect
//! the result.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use triage_engine::types::InboundReport;
use triage_engine::{classifier, dedup, normalize, risk, router};

use crate::config::Config;
use crate::error::DispatchError;
use crate::lifecycle::Transition;
use crate::notify::{FeedEvent, Notifier};
use crate::rbac;
use crate::store::Store;
use crate::types::*;
use crate::units::{self, NearestUnit, ProximityThreat};

pub struct Dispatch {
  store: Arc<dyn Store>,
  notifier: Arc<dyn Notifier>,
  config: Config,
}

impl Dispatch {
  pub fn new(store: Arc<dyn Store>, notifier: Arc<dyn Notifier>) -> Self {
    Self::with_config(store, notifier, Config::default())
  }

  pub fn with_config(
    store: Arc<dyn Store>,
    notifier: Arc<dyn Notifier>,
    config: Config,
  ) -> Self {
    Self {
      store,
      notifier,
      config,
    }
  }

  // -------------------------------------------------------------------------
  // Intake
  // -------------------------------------------------------------------------

  /// Full intake pipeline: normalize, classify, dedup, route, persist, alert.
  /// Open to any caller; anonymous reports are accepted as citizen-sourced.
  pub fn submit_report(
    &self,
    actor: Option<Actor>,
    raw: &InboundReport,
  ) -> Result<Incident, DispatchError> {
    let report = normalize::normalize(raw)?;

    // The caller, not the payload, decides the source: derived from the role
    // when known, citizen when anonymous.
    let source = rbac::derive_source(actor.map(|a| a.role)).unwrap_or(Source::Citizen);

    let classification =
      classifier::analyze(&format!("{} {}", report.title, report.description));
    let severity = classification.severity;
    let incident_type = if classification.incident_type != IncidentType::Other {
      classification.incident_type
    } else {
      report.declared_type
    };

    // Unlocked candidate scan; missed duplicates under concurrent writes are
    // acceptable, the flag is advisory.
    let since = Utc::now() - Duration::hours(self.config.dedup_window_hours);
    let recent = self.store.recent_incidents(since)?;
    let potential_duplicate_id = dedup::find_duplicate(
      &report.title,
      report.latitude,
      report.longitude,
      self.config.dedup_degree_threshold,
      &recent,
    )
    .map(|c| c.id);

    let routing = router::suggest(incident_type, severity);
    let spatial_risk_index = risk::spatial_risk_index(&classification);

    let incident = self.store.create_incident(NewIncident {
      title: report.title.clone(),
      description: report.description,
      latitude: report.latitude,
      longitude: report.longitude,
      incident_type,
      severity,
      source,
      reporter_id: actor.map(|a| a.id),
      created_at: Utc::now(),
      classification,
      suggested_agencies: routing.agencies,
      suggested_unit_type: routing.unit_type,
      routing_rationale: routing.rationale,
      spatial_risk_index,
      potential_duplicate_id,
    })?;
    info!(
      incident_id = incident.id,
      severity = incident.severity.as_str(),
      incident_type = incident.incident_type.as_str(),
      "incident created"
    );
    self.notifier.publish(FeedEvent::RefreshIncidents);

    if let Some(draft) = risk::auto_alert(severity, incident_type, &incident.title) {
      self.store.create_alert(NewAlert {
        title: draft.title,
        message: draft.message,
        severity: draft.severity,
        incident_id: Some(incident.id),
        latitude: Some(incident.latitude),
        longitude: Some(incident.longitude),
        radius_km: None,
        audience: None,
        recommended_action: Some(units::recommended_action(incident_type).to_string()),
      })?;
      self.notifier.publish(FeedEvent::RefreshAlerts);
    }

    Ok(incident)
  }

  // -------------------------------------------------------------------------
  // Lifecycle
  // -------------------------------------------------------------------------

  pub fn update_status(
    &self,
    actor: Actor,
    incident_id: i64,
    to: IncidentStatus,
    unit_id: Option<i64>,
  ) -> Result<Incident, DispatchError> {
    rbac::require(actor.role, rbac::DISPATCHER_TIER, "update incident status")?;
    let incident = self.store.update_incident_status(
      incident_id,
      Transition {
        to,
        actor_id: actor.id,
        at: Utc::now(),
        unit_id,
      },
    )?;
    info!(
      incident_id,
      status = incident.status.as_str(),
      actor_id = actor.id,
      "incident status updated"
    );
    self.notifier.publish(FeedEvent::RefreshIncidents);
    self.notifier.publish(FeedEvent::RefreshUnits);
    Ok(incident)
  }

  pub fn flag_incident(
    &self,
    actor: Actor,
    incident_id: i64,
    reason: String,
  ) -> Result<Incident, DispatchError> {
    rbac::require(actor.role, rbac::FLAG_TIER, "flag incident")?;
    if reason.trim().is_empty() {
      return Err(DispatchError::validation("reason", "must not be empty"));
    }
    self.store.set_flag(incident_id, reason, actor.id)
  }

  pub fn merge_duplicate(
    &self,
    actor: Actor,
    incident_id: i64,
    target_id: i64,
  ) -> Result<Incident, DispatchError> {
    rbac::require(actor.role, rbac::FLAG_TIER, "merge incident")?;
    let incident = self.store.merge_duplicate(incident_id, target_id)?;
    self.notifier.publish(FeedEvent::RefreshIncidents);
    Ok(incident)
  }

  // -------------------------------------------------------------------------
  // Alerts
  // -------------------------------------------------------------------------

  /// Manual geo-targeted broadcast; senior command only.
  pub fn broadcast_alert(&self, actor: Actor, draft: NewAlert) -> Result<Alert, DispatchError> {
    rbac::require(actor.role, rbac::ADMIN_TIER, "broadcast alert")?;
    let alert = self.store.create_alert(draft)?;
    self.notifier.publish(FeedEvent::RefreshAlerts);
    Ok(alert)
  }

  // -------------------------------------------------------------------------
  // Units
  // -------------------------------------------------------------------------

  pub fn provision_unit(&self, actor: Actor, draft: NewUnit) -> Result<Unit, DispatchError> {
    rbac::require(actor.role, rbac::ADMIN_TIER, "provision unit")?;
    if draft.callsign.trim().is_empty() {
      return Err(DispatchError::validation("callsign", "must not be empty"));
    }
    let unit = self.store.create_unit(draft)?;
    self.notifier.publish(FeedEvent::RefreshUnits);
    Ok(unit)
  }

  pub fn update_unit(
    &self,
    actor: Actor,
    unit_id: i64,
    patch: UnitPatch,
  ) -> Result<Unit, DispatchError> {
    rbac::require(actor.role, rbac::UNIT_UPDATE_TIER, "update unit")?;
    let unit = self.store.update_unit(unit_id, patch)?;
    self.notifier.publish(FeedEvent::RefreshUnits);
    Ok(unit)
  }

  pub fn nearest_unit(
    &self,
    lat: f64,
    lng: f64,
    unit_type: Option<Role>,
  ) -> Result<NearestUnit, DispatchError> {
    let idle = self.store.idle_units(unit_type)?;
    units::nearest_unit(lat, lng, unit_type, &idle)
  }

  pub fn proximity_threats(
    &self,
    lat: f64,
    lng: f64,
    radius_km: Option<f64>,
  ) -> Result<Vec<ProximityThreat>, DispatchError> {
    let radius = radius_km.unwrap_or(self.config.default_radius_km);
    let incidents = self.store.incidents()?;
    Ok(units::proximity_threats(lat, lng, radius, &incidents))
  }

  // -------------------------------------------------------------------------
  // Reads
  // -------------------------------------------------------------------------

  pub fn incident(&self, id: i64) -> Result<Incident, DispatchError> {
    self
      .store
      .incident(id)?
      .ok_or_else(|| DispatchError::not_found(format!("incident {}", id)))
  }

  pub fn incidents(&self) -> Result<Vec<Incident>, DispatchError> {
    self.store.incidents()
  }

  pub fn units(&self) -> Result<Vec<Unit>, DispatchError> {
    self.store.units()
  }

  pub fn alerts(&self) -> Result<Vec<Alert>, DispatchError> {
    self.store.alerts()
  }

  pub fn stats(&self) -> Result<Stats, DispatchError> {
    self.store.stats()
  }
}
