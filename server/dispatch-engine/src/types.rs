//! Persistent records and operation inputs for the dispatch core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use triage_engine::types::{
  ClassificationResult, IncidentType, Role, Severity, Source,
};

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
  Pending,
  Verified,
  Dispatched,
  Resolved,
  FalseAlarm,
}

impl IncidentStatus {
  pub fn from_str_loose(s: &str) -> Option<Self> {
    match s.to_ascii_lowercase().as_str() {
      "pending" => Some(Self::Pending),
      "verified" => Some(Self::Verified),
      "dispatched" => Some(Self::Dispatched),
      "resolved" => Some(Self::Resolved),
      "false_alarm" => Some(Self::FalseAlarm),
      _ => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Pending => "pending",
      Self::Verified => "verified",
      Self::Dispatched => "dispatched",
      Self::Resolved => "resolved",
      Self::FalseAlarm => "false_alarm",
    }
  }
}

impl fmt::Display for IncidentStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
  Idle,
  Busy,
  Offline,
}

impl UnitStatus {
  pub fn from_str_loose(s: &str) -> Option<Self> {
    match s.to_ascii_lowercase().as_str() {
      "idle" => Some(Self::Idle),
      "busy" => Some(Self::Busy),
      "offline" => Some(Self::Offline),
      _ => None,
    }
  }
}

// ---------------------------------------------------------------------------
// Actor (resolved upstream by the authn boundary)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct Actor {
  pub id: i64,
  pub role: Role,
}

// ---------------------------------------------------------------------------
// Incident (aggregate root)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Incident {
  pub id: i64,
  pub title: String,
  pub description: String,
  pub latitude: f64,
  pub longitude: f64,
  pub incident_type: IncidentType,
  pub severity: Severity,
  pub status: IncidentStatus,
  pub source: Source,
  pub reporter_id: Option<i64>,
  pub created_at: DateTime<Utc>,

  // Attached at creation, never mutated.
  pub classification: ClassificationResult,
  pub suggested_agencies: Vec<Role>,
  pub suggested_unit_type: Role,
  pub routing_rationale: String,
  pub spatial_risk_index: f64,

  // Assignment history: the reference survives release.
  pub assigned_unit_id: Option<i64>,

  // Self-referential links, set once and never cleared.
  pub potential_duplicate_id: Option<i64>,
  pub duplicate_of_id: Option<i64>,

  // Audit pairs, write-once; first transition wins.
  pub verified_at: Option<DateTime<Utc>>,
  pub verified_by: Option<i64>,
  pub dispatched_at: Option<DateTime<Utc>>,
  pub dispatched_by: Option<i64>,
  pub resolved_at: Option<DateTime<Utc>>,
  pub resolved_by: Option<i64>,

  // Moderation.
  pub flagged: bool,
  pub flag_reason: Option<String>,
  pub flagged_by: Option<i64>,
}

impl triage_engine::dedup::Candidate for Incident {
  fn title(&self) -> &str {
    &self.title
  }

  fn coords(&self) -> (f64, f64) {
    (self.latitude, self.longitude)
  }
}

/// Everything the store needs to mint a new incident row.
#[derive(Debug, Clone)]
pub struct NewIncident {
  pub title: String,
  pub description: String,
  pub latitude: f64,
  pub longitude: f64,
  pub incident_type: IncidentType,
  pub severity: Severity,
  pub source: Source,
  pub reporter_id: Option<i64>,
  pub created_at: DateTime<Utc>,
  pub classification: ClassificationResult,
  pub suggested_agencies: Vec<Role>,
  pub suggested_unit_type: Role,
  pub routing_rationale: String,
  pub spatial_risk_index: f64,
  pub potential_duplicate_id: Option<i64>,
}

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Unit {
  pub id: i64,
  pub callsign: String,
  pub unit_type: Role,
  pub status: UnitStatus,
  pub latitude: Option<f64>,
  pub longitude: Option<f64>,
  pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUnit {
  pub callsign: String,
  pub unit_type: Role,
  pub latitude: Option<f64>,
  pub longitude: Option<f64>,
}

/// Partial update applied field-by-field; absent fields keep current values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnitPatch {
  #[serde(default)]
  pub status: Option<UnitStatus>,
  #[serde(default)]
  pub latitude: Option<f64>,
  #[serde(default)]
  pub longitude: Option<f64>,
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Alert {
  pub id: i64,
  pub title: String,
  pub message: String,
  pub severity: Severity,
  pub incident_id: Option<i64>,
  pub latitude: Option<f64>,
  pub longitude: Option<f64>,
  pub radius_km: Option<f64>,
  pub audience: Option<String>,
  pub recommended_action: Option<String>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAlert {
  pub title: String,
  pub message: String,
  pub severity: Severity,
  pub incident_id: Option<i64>,
  pub latitude: Option<f64>,
  pub longitude: Option<f64>,
  pub radius_km: Option<f64>,
  pub audience: Option<String>,
  pub recommended_action: Option<String>,
}

// ---------------------------------------------------------------------------
// Aggregate counts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct StatusCount {
  pub status: IncidentStatus,
  pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeverityCount {
  pub severity: Severity,
  pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
  pub total_incidents: usize,
  pub by_status: Vec<StatusCount>,
  pub by_severity: Vec<SeverityCount>,
}
