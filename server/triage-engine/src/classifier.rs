//! Keyword-heuristic classification of incident text into severity, type, and
//! risk estimates.
//!
//! Matching is substring containment on the lowercased text (no tokenization),
//! so keyword lists can carry both English and Amharic tokens. Severity tiers
//! and the type table are priority-ordered: the first match wins.

use crate::types::{ClassificationResult, IncidentType, Severity};

/// Severity keyword tiers, checked critical-first.
const CRITICAL_KEYWORDS: &[&str] = &[
  "explosion", "bomb", "mass casualty", "terror", "flood", "earthquake", "war", "gunfire",
  "shooter", "dead", "fatality", "ሙቀት", "ጦር",
];

const HIGH_KEYWORDS: &[&str] = &[
  "fire", "accident", "crash", "robbery", "riot", "protest", "attack", "burning", "bleeding",
  "unconscious", "ፍንዳታ", "ድርቅ", "እሳት", "ግጭት",
];

const MEDIUM_KEYWORDS: &[&str] = &[
  "fight", "injury", "blocked", "traffic", "theft", "break-in", "argument", "ትራፊክ", "መከላከያ",
];

/// Type priority table. Order is a contract: the first type whose keyword set
/// matches wins, so e.g. text containing both fire and flood terms is fire.
pub const TYPE_TABLE: &[(IncidentType, &[&str])] = &[
  (
    IncidentType::Fire,
    &["fire", "smoke", "flame", "burn", "ash", "esat", "chid", "እሳት", "ጭስ", "ቃጠሎ"],
  ),
  (
    IncidentType::Accident,
    &["crash", "collision", "hit", "car", "vehicle", "truck", "bus", "motorcycle", "mekina", "adega", "አደጋ", "መኪና"],
  ),
  (
    IncidentType::Crime,
    &["robbery", "theft", "gun", "knife", "attack", "stolen", "assault", "thief", "leba", "wunjel", "ስርቆት", "ግድያ"],
  ),
  (
    IncidentType::Medical,
    &["injured", "blood", "heart", "breath", "unconscious", "sick", "pain", "ambulance", "hemem", "hospital", "ህመም", "አስቸኳይ", "ደም"],
  ),
  (
    IncidentType::Unrest,
    &["protest", "riot", "crowd", "march", "chanting", "demonstration", "fukera", "gored", "ሰልፍ", "ተቃውሞ"],
  ),
  (
    IncidentType::Hazard,
    &["leak", "wire", "pole", "collapse", "hole", "landslide", "adega", "ስርየት", "መፍሰስ"],
  ),
  (
    IncidentType::Flood,
    &["flood", "water", "rain", "river", "drowning", "orf", "ጎርፍ", "ዝናብ", "ውሃ"],
  ),
  (
    IncidentType::Infrastructure,
    &["power", "electric", "blackout", "water", "pipe", "road", "bridge", "mebrat", "እልባት", "መንገድ"],
  ),
  (
    IncidentType::Crowd,
    &["gathering", "festival", "concert", "meeting", "sewb", "ብዛት", "ሕዝብ"],
  ),
  (
    IncidentType::Suspicious,
    &["bomb", "package", "weird", "strange", "terror", "shibir", "እገርጋሪ", "ጥርጣሬ"],
  ),
  (
    IncidentType::Other,
    &["noise", "disturbance", "loud", "ውይይት"],
  ),
];

fn contains_any(text: &str, keywords: &[&str]) -> bool {
  keywords.iter().any(|k| text.contains(k))
}

/// Analyze free text (title + description) into a classification.
///
/// Total function: unmatched input falls through to low/other with 0.3
/// confidence. Deterministic, no side effects.
pub fn analyze(text: &str) -> ClassificationResult {
  let text = text.to_lowercase();
  let mut result = ClassificationResult::default();

  // 1. Severity: ordered tiers, first match wins.
  if contains_any(&text, CRITICAL_KEYWORDS) {
    result.severity = Severity::Critical;
    result.confidence = 0.85;
  } else if contains_any(&text, HIGH_KEYWORDS) {
    result.severity = Severity::High;
    result.confidence = 0.7;
  } else if contains_any(&text, MEDIUM_KEYWORDS) {
    result.severity = Severity::Medium;
    result.confidence = 0.5;
  }

  // 2. Type: first matching entry in the priority table wins.
  for (incident_type, keywords) in TYPE_TABLE {
    if contains_any(&text, keywords) {
      result.incident_type = *incident_type;
      result.confidence = result.confidence.max(0.6);
      break;
    }
  }

  // 3. Risk heuristics derived from (type, severity).
  if matches!(
    result.incident_type,
    IncidentType::Fire | IncidentType::Flood | IncidentType::Unrest
  ) {
    result.escalation_probability =
      if matches!(result.severity, Severity::Medium | Severity::High) {
        0.6
      } else {
        0.8
      };
    result.spread_risk = if result.severity.is_escalated() { 0.7 } else { 0.4 };
  }
  if matches!(
    result.incident_type,
    IncidentType::Medical | IncidentType::Crime | IncidentType::Accident
  ) {
    result.casualty_likelihood = if result.severity.is_escalated() { 0.6 } else { 0.3 };
  }
  if matches!(result.incident_type, IncidentType::Crowd | IncidentType::Unrest) {
    result.crowd_size_estimate = if result.severity.is_escalated() { 50 } else { 20 };
  }
  if result.severity == Severity::Critical {
    result.escalation_probability = result.escalation_probability.max(0.85);
    result.spread_risk = result.spread_risk.max(0.8);
    result.casualty_likelihood = result.casualty_likelihood.max(0.7);
  }

  result
}
