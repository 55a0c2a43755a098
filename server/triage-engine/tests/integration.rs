//! Integration tests for the triage engine.

use triage_engine::{InboundReport, TriageEngine};

fn fixture_report() -> InboundReport {
  let json = r#"{
    "title": "Fire in Piassa",
    "description": "Small shop fire, smoke visible, crowd gathering nearby.",
    "latitude": 9.03,
    "longitude": 38.75,
    "incident_type": "other",
    "severity": "low",
    "source": "citizen",
    "timestamp": "2025-06-01T10:30:00Z"
  }"#;
  serde_json::from_str(json).unwrap()
}

#[test]
fn fire_report_produces_full_outcome() {
  let mut engine = TriageEngine::with_defaults();
  let outcome = engine.process(&fixture_report()).unwrap();

  // Structure checks.
  assert!(outcome.report_id.starts_with("rpt-"));
  assert_eq!(outcome.title, "Fire in Piassa");

  // "fire" is a high-tier keyword and a fire-type keyword.
  assert_eq!(outcome.severity, triage_engine::types::Severity::High);
  assert_eq!(
    outcome.incident_type,
    triage_engine::types::IncidentType::Fire
  );
  assert!(outcome.classification.confidence >= 0.7);

  // Routing: fire first, then disaster coordination, then command escalation.
  assert_eq!(
    outcome.routing.agencies.first(),
    Some(&triage_engine::types::Role::Fire)
  );
  assert!(outcome
    .routing
    .agencies
    .contains(&triage_engine::types::Role::Command));
  assert_eq!(outcome.routing.unit_type, triage_engine::types::Role::Fire);
  assert!(outcome.routing.rationale.contains("type=fire"));

  // Risk + alert.
  assert!(outcome.spatial_risk_index > 0.0);
  assert!(outcome.alert.is_some());
}

#[test]
fn deterministic_output_across_runs() {
  let report = fixture_report();

  let mut engine1 = TriageEngine::with_defaults();
  let o1 = engine1.process(&report).unwrap();
  let json1 = serde_json::to_string(&o1).unwrap();

  let mut engine2 = TriageEngine::with_defaults();
  let o2 = engine2.process(&report).unwrap();
  let json2 = serde_json::to_string(&o2).unwrap();

  assert_eq!(json1, json2, "Same inputs must produce identical JSON output");
}

#[test]
fn unknown_fields_are_ignored() {
  let json = r#"{
    "title": "Crash at Bole",
    "description": "two cars collided",
    "latitude": 9.0054,
    "longitude": 38.7636,
    "incident_type": "accident",
    "timestamp": "2025-06-01T10:30:00Z",
    "some_unknown_field": "should be ignored",
    "another": 42
  }"#;

  let raw: InboundReport = serde_json::from_str(json).unwrap();
  let mut engine = TriageEngine::with_defaults();
  assert!(engine.process(&raw).is_ok());
}

#[test]
fn invalid_enum_gives_clear_error() {
  let json = r#"{
    "title": "Crash at Bole",
    "description": "two cars collided",
    "latitude": 9.0054,
    "longitude": 38.7636,
    "incident_type": "meteor",
    "timestamp": "2025-06-01T10:30:00Z"
  }"#;

  let raw: InboundReport = serde_json::from_str(json).unwrap();
  let mut engine = TriageEngine::with_defaults();
  let err = engine.process(&raw).unwrap_err();
  assert!(
    err.to_string().contains("incident_type"),
    "Error should mention the field: {}",
    err
  );
}

#[test]
fn second_report_of_same_event_is_flagged_not_blocked() {
  let mut engine = TriageEngine::with_defaults();
  let first = engine.process(&fixture_report()).unwrap();

  let json = r#"{
    "title": "fire in piassa",
    "description": "saw flames from the street",
    "latitude": 9.0301,
    "longitude": 38.7501,
    "incident_type": "fire",
    "timestamp": "2025-06-01T10:45:00Z"
  }"#;
  let raw: InboundReport = serde_json::from_str(json).unwrap();
  let second = engine.process(&raw).unwrap();

  assert_eq!(
    second.potential_duplicate_id.as_deref(),
    Some(first.report_id.as_str())
  );
  // Intake still produced a full outcome for the duplicate.
  assert!(second.report_id.starts_with("rpt-"));
  assert_ne!(second.report_id, first.report_id);
}
