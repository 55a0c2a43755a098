//! Spatial risk index + automatic alert drafting.

use crate::types::{AlertDraft, ClassificationResult, IncidentType, Severity};

const ESCALATION_WEIGHT: f64 = 0.4;
const SPREAD_WEIGHT: f64 = 0.3;
const CASUALTY_WEIGHT: f64 = 0.3;

/// Weighted composite of the classifier's risk estimates. Computed once at
/// intake and stored immutably on the incident.
pub fn spatial_risk_index(classification: &ClassificationResult) -> f64 {
  ESCALATION_WEIGHT * classification.escalation_probability
    + SPREAD_WEIGHT * classification.spread_risk
    + CASUALTY_WEIGHT * classification.casualty_likelihood
}

/// Draft an automatic alert when the final severity lands high or critical.
/// This is the only automatic alert-generation trigger in the pipeline.
pub fn auto_alert(
  severity: Severity,
  incident_type: IncidentType,
  incident_title: &str,
) -> Option<AlertDraft> {
  if !severity.is_escalated() {
    return None;
  }
  Some(AlertDraft {
    title: format!("NEW {} THREAT", severity.as_str().to_uppercase()),
    message: format!(
      "{} reported at {}. Immediate attention required.",
      incident_type.title_case(),
      incident_title
    ),
    severity,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn risk_index_weighted_sum() {
    let classification = ClassificationResult {
      escalation_probability: 0.8,
      spread_risk: 0.4,
      casualty_likelihood: 0.3,
      ..Default::default()
    };
    let index = spatial_risk_index(&classification);
    assert!((index - 0.53).abs() < 1e-9);
  }

  #[test]
  fn no_alert_below_high() {
    assert!(auto_alert(Severity::Low, IncidentType::Fire, "Shop fire").is_none());
    assert!(auto_alert(Severity::Medium, IncidentType::Fire, "Shop fire").is_none());
  }

  #[test]
  fn critical_alert_format() {
    let alert = auto_alert(Severity::Critical, IncidentType::Fire, "Fire in Piassa").unwrap();
    assert_eq!(alert.title, "NEW CRITICAL THREAT");
    assert_eq!(
      alert.message,
      "Fire reported at Fire in Piassa. Immediate attention required."
    );
    assert_eq!(alert.severity, Severity::Critical);
  }
}
