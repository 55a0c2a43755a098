//! Core types for the triage engine (JSON contracts + internal models).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Inbound types (JSON contract — what the caller sends)
// ---------------------------------------------------------------------------

/// One inbound incident report. Unknown fields are silently ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundReport {
  pub title: String,
  pub description: String,
  pub latitude: f64,
  pub longitude: f64,
  pub incident_type: String,
  #[serde(default)]
  pub severity: Option<String>,
  #[serde(default)]
  pub source: Option<String>,
  pub timestamp: String,
}

// ---------------------------------------------------------------------------
// Enums (normalized; serde strings are the wire contract)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Low,
  Medium,
  High,
  Critical,
}

impl Severity {
  pub fn from_str_loose(s: &str) -> Option<Self> {
    match s.to_ascii_lowercase().as_str() {
      "low" => Some(Self::Low),
      "medium" | "med" => Some(Self::Medium),
      "high" => Some(Self::High),
      "critical" | "crit" => Some(Self::Critical),
      _ => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Low => "low",
      Self::Medium => "medium",
      Self::High => "high",
      Self::Critical => "critical",
    }
  }

  /// High or critical — the escalation band for routing and alerting.
  pub fn is_escalated(self) -> bool {
    matches!(self, Self::High | Self::Critical)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentType {
  Fire,
  Accident,
  Crime,
  Medical,
  Unrest,
  Hazard,
  Flood,
  Infrastructure,
  Crowd,
  Suspicious,
  Other,
}

impl IncidentType {
  pub fn from_str_loose(s: &str) -> Option<Self> {
    match s.to_ascii_lowercase().as_str() {
      "fire" => Some(Self::Fire),
      "accident" => Some(Self::Accident),
      "crime" => Some(Self::Crime),
      "medical" => Some(Self::Medical),
      "unrest" => Some(Self::Unrest),
      "hazard" => Some(Self::Hazard),
      "flood" => Some(Self::Flood),
      "infrastructure" => Some(Self::Infrastructure),
      "crowd" => Some(Self::Crowd),
      "suspicious" => Some(Self::Suspicious),
      "other" => Some(Self::Other),
      _ => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Fire => "fire",
      Self::Accident => "accident",
      Self::Crime => "crime",
      Self::Medical => "medical",
      Self::Unrest => "unrest",
      Self::Hazard => "hazard",
      Self::Flood => "flood",
      Self::Infrastructure => "infrastructure",
      Self::Crowd => "crowd",
      Self::Suspicious => "suspicious",
      Self::Other => "other",
    }
  }

  /// "fire" -> "Fire"; used when interpolating into alert messages.
  pub fn title_case(self) -> String {
    let s = self.as_str();
    let mut chars = s.chars();
    match chars.next() {
      Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
      None => String::new(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
  Citizen,
  Responder,
  OpsCenter,
  Sensor,
  Weather,
  Other,
}

impl Source {
  pub fn from_str_loose(s: &str) -> Option<Self> {
    match s.to_ascii_lowercase().as_str() {
      "citizen" => Some(Self::Citizen),
      "responder" => Some(Self::Responder),
      "ops_center" => Some(Self::OpsCenter),
      "sensor" => Some(Self::Sensor),
      "weather" => Some(Self::Weather),
      "other" => Some(Self::Other),
      _ => None,
    }
  }
}

/// User/agency roles. Units reuse the responder subset as their unit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
  Citizen,
  Police,
  Medical,
  Fire,
  Traffic,
  DisasterCoordinator,
  MilitaryAnalyst,
  NationalSupervisor,
  Verifier,
  SysAdmin,
  Admin,
  Command,
}

impl Role {
  pub fn from_str_loose(s: &str) -> Option<Self> {
    match s.to_ascii_lowercase().as_str() {
      "citizen" => Some(Self::Citizen),
      "police" => Some(Self::Police),
      "medical" => Some(Self::Medical),
      "fire" => Some(Self::Fire),
      "traffic" => Some(Self::Traffic),
      "disaster_coordinator" => Some(Self::DisasterCoordinator),
      "military_analyst" => Some(Self::MilitaryAnalyst),
      "national_supervisor" => Some(Self::NationalSupervisor),
      "verifier" => Some(Self::Verifier),
      "sys_admin" => Some(Self::SysAdmin),
      "admin" => Some(Self::Admin),
      "command" => Some(Self::Command),
      _ => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Citizen => "citizen",
      Self::Police => "police",
      Self::Medical => "medical",
      Self::Fire => "fire",
      Self::Traffic => "traffic",
      Self::DisasterCoordinator => "disaster_coordinator",
      Self::MilitaryAnalyst => "military_analyst",
      Self::NationalSupervisor => "national_supervisor",
      Self::Verifier => "verifier",
      Self::SysAdmin => "sys_admin",
      Self::Admin => "admin",
      Self::Command => "command",
    }
  }
}

// ---------------------------------------------------------------------------
// Internal normalized types
// ---------------------------------------------------------------------------

/// Canonical internal report after normalization + validation.
#[derive(Debug, Clone)]
pub struct Report {
  pub title: String,
  pub description: String,
  pub latitude: f64,
  pub longitude: f64,
  pub declared_type: IncidentType,
  pub declared_severity: Severity,
  pub source: Source,
  pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Keyword-heuristic triage output. Attached at intake, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
  pub severity: Severity,
  pub incident_type: IncidentType,
  pub confidence: f64,
  pub escalation_probability: f64,
  pub spread_risk: f64,
  pub casualty_likelihood: f64,
  pub crowd_size_estimate: u32,
}

impl Default for ClassificationResult {
  fn default() -> Self {
    Self {
      severity: Severity::Low,
      incident_type: IncidentType::Other,
      confidence: 0.3,
      escalation_probability: 0.1,
      spread_risk: 0.1,
      casualty_likelihood: 0.1,
      crowd_size_estimate: 0,
    }
  }
}

// ---------------------------------------------------------------------------
// Routing suggestion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RoutingSuggestion {
  pub agencies: Vec<Role>,
  pub unit_type: Role,
  pub rationale: String,
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// Draft of an automatically generated alert (high/critical intake only).
#[derive(Debug, Clone, Serialize)]
pub struct AlertDraft {
  pub title: String,
  pub message: String,
  pub severity: Severity,
}

// ---------------------------------------------------------------------------
// Recent-report window (dedup candidates for the standalone binary)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RecentReport {
  pub report_id: String,
  pub title: String,
  pub latitude: f64,
  pub longitude: f64,
  pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Output types (JSON contract — what we emit)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct TriageOutcome {
  pub report_id: String,
  pub title: String,
  pub latitude: f64,
  pub longitude: f64,
  pub source: Source,
  pub timestamp: String,
  /// Final values after classification override (declared type survives only
  /// when the classifier lands on `other`).
  pub severity: Severity,
  pub incident_type: IncidentType,
  pub classification: ClassificationResult,
  pub routing: RoutingSuggestion,
  pub spatial_risk_index: f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub potential_duplicate_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub alert: Option<AlertDraft>,
}

// ---------------------------------------------------------------------------
// CLI stream wrappers
// ---------------------------------------------------------------------------

/// Structured error output for invalid input lines.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub field: Option<String>,
}

impl ErrorOutput {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      error: true,
      message: message.into(),
      field: None,
    }
  }

  pub fn with_field(mut self, field: impl Into<String>) -> Self {
    self.field = Some(field.into());
    self
  }
}
