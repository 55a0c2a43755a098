//! Normalize inbound reports into canonical internal Report models.

use chrono::{DateTime, Utc};

use crate::error::TriageError;
use crate::types::*;

/// Parse and normalize an InboundReport into a canonical Report.
pub fn normalize(raw: &InboundReport) -> Result<Report, TriageError> {
  // Validate + parse timestamp
  let timestamp: DateTime<Utc> = DateTime::parse_from_rfc3339(&raw.timestamp)
    .map_err(|e| TriageError::validation("timestamp", &format!("invalid RFC3339: {}", e)))?
    .with_timezone(&Utc);

  // Validate required strings are non-empty
  if raw.title.trim().is_empty() {
    return Err(TriageError::validation("title", "must not be empty"));
  }
  if raw.description.trim().is_empty() {
    return Err(TriageError::validation("description", "must not be empty"));
  }

  // Validate coordinates
  if !(-90.0..=90.0).contains(&raw.latitude) {
    return Err(TriageError::validation("latitude", "must be within [-90, 90]"));
  }
  if !(-180.0..=180.0).contains(&raw.longitude) {
    return Err(TriageError::validation(
      "longitude",
      "must be within [-180, 180]",
    ));
  }

  // Validate enums (declared severity/source are optional with defaults)
  let declared_type = IncidentType::from_str_loose(&raw.incident_type).ok_or_else(|| {
    TriageError::validation("incident_type", "unknown incident type")
  })?;
  let declared_severity = match &raw.severity {
    Some(s) => Severity::from_str_loose(s)
      .ok_or_else(|| TriageError::validation("severity", "expected low|medium|high|critical"))?,
    None => Severity::Low,
  };
  let source = match &raw.source {
    Some(s) => Source::from_str_loose(s)
      .ok_or_else(|| TriageError::validation("source", "unknown source"))?,
    None => Source::Citizen,
  };

  Ok(Report {
    title: raw.title.trim().to_string(),
    description: raw.description.trim().to_string(),
    latitude: raw.latitude,
    longitude: raw.longitude,
    declared_type,
    declared_severity,
    source,
    timestamp,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn raw() -> InboundReport {
    InboundReport {
      title: "Fire in Piassa".into(),
      description: "Small shop fire, smoke visible.".into(),
      latitude: 9.03,
      longitude: 38.75,
      incident_type: "fire".into(),
      severity: Some("medium".into()),
      source: Some("citizen".into()),
      timestamp: "2025-06-01T10:30:00Z".into(),
    }
  }

  #[test]
  fn normalize_valid_report() {
    let report = normalize(&raw()).unwrap();
    assert_eq!(report.declared_type, IncidentType::Fire);
    assert_eq!(report.declared_severity, Severity::Medium);
    assert_eq!(report.source, Source::Citizen);
  }

  #[test]
  fn severity_and_source_default_when_absent() {
    let mut input = raw();
    input.severity = None;
    input.source = None;
    let report = normalize(&input).unwrap();
    assert_eq!(report.declared_severity, Severity::Low);
    assert_eq!(report.source, Source::Citizen);
  }

  #[test]
  fn rejects_unknown_incident_type() {
    let mut input = raw();
    input.incident_type = "volcano".into();
    let err = normalize(&input).unwrap_err();
    assert!(err.to_string().contains("incident_type"));
  }

  #[test]
  fn rejects_bad_timestamp() {
    let mut input = raw();
    input.timestamp = "not-a-date".into();
    let err = normalize(&input).unwrap_err();
    assert!(err.to_string().contains("timestamp"));
  }

  #[test]
  fn rejects_out_of_range_coordinates() {
    let mut input = raw();
    input.latitude = 91.0;
    let err = normalize(&input).unwrap_err();
    assert!(err.to_string().contains("latitude"));
  }

  #[test]
  fn rejects_blank_title() {
    let mut input = raw();
    input.title = "   ".into();
    let err = normalize(&input).unwrap_err();
    assert!(err.to_string().contains("title"));
  }
}
