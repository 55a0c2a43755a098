//! Core engine: runs the full triage pipeline over a rolling recent window.

use chrono::Duration;

use crate::classifier;
use crate::config::Config;
use crate::dedup;
use crate::error::TriageError;
use crate::normalize;
use crate::risk;
use crate::router;
use crate::types::*;

/// The triage engine. Holds the recent-report window across reports so the
/// standalone binary can flag potential duplicates without a store.
pub struct TriageEngine {
  config: Config,
  recent: Vec<RecentReport>,
}

impl TriageEngine {
  pub fn new(config: Config) -> Self {
    Self {
      config,
      recent: Vec::new(),
    }
  }

  pub fn with_defaults() -> Self {
    Self::new(Config::default())
  }

  /// Process a single inbound report through classification, deduplication,
  /// routing, and risk aggregation.
  pub fn process(&mut self, raw: &InboundReport) -> Result<TriageOutcome, TriageError> {
    let report = normalize::normalize(raw)?;

    let classification =
      classifier::analyze(&format!("{} {}", report.title, report.description));

    // Classified severity always wins; the declared type survives only when
    // the classifier lands on `other`.
    let severity = classification.severity;
    let incident_type = if classification.incident_type != IncidentType::Other {
      classification.incident_type
    } else {
      report.declared_type
    };

    // Prune the window relative to the report's own clock (deterministic).
    let cutoff = report.timestamp - Duration::hours(self.config.dedup_window_hours);
    self.recent.retain(|r| r.timestamp >= cutoff);

    let potential_duplicate_id = dedup::find_duplicate(
      &report.title,
      report.latitude,
      report.longitude,
      self.config.dedup_degree_threshold,
      &self.recent,
    )
    .map(|c| c.report_id.clone());

    let routing = router::suggest(incident_type, severity);
    let spatial_risk_index = risk::spatial_risk_index(&classification);
    let alert = risk::auto_alert(severity, incident_type, &report.title);

    let report_id = derive_report_id(&report);

    self.recent.push(RecentReport {
      report_id: report_id.clone(),
      title: report.title.clone(),
      latitude: report.latitude,
      longitude: report.longitude,
      timestamp: report.timestamp,
    });
    if self.recent.len() > self.config.recent_capacity {
      let excess = self.recent.len() - self.config.recent_capacity;
      self.recent.drain(..excess);
    }

    Ok(TriageOutcome {
      report_id,
      title: report.title,
      latitude: report.latitude,
      longitude: report.longitude,
      source: report.source,
      timestamp: report.timestamp.to_rfc3339(),
      severity,
      incident_type,
      classification,
      routing,
      spatial_risk_index,
      potential_duplicate_id,
      alert,
    })
  }
}

/// Stable report ID: hash of title + coordinates + submission time.
fn derive_report_id(report: &Report) -> String {
  let mut hasher = blake3::Hasher::new();
  hasher.update(report.title.as_bytes());
  hasher.update(b"|");
  hasher.update(report.latitude.to_bits().to_le_bytes().as_slice());
  hasher.update(report.longitude.to_bits().to_le_bytes().as_slice());
  hasher.update(b"|");
  hasher.update(report.timestamp.to_rfc3339().as_bytes());
  let hex = hasher.finalize().to_hex();
  format!("rpt-{}", &hex[..16])
}
