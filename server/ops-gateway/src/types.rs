//! Request/response types for the gateway.

use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct StatusChangePayload {
  pub status: String,
  #[serde(default)]
  pub unit_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct FlagPayload {
  pub reason: String,
}

#[derive(Deserialize)]
pub struct MergePayload {
  pub target_incident_id: i64,
}

#[derive(Deserialize)]
pub struct UnitCreatePayload {
  pub callsign: String,
  pub unit_type: String,
  #[serde(default)]
  pub latitude: Option<f64>,
  #[serde(default)]
  pub longitude: Option<f64>,
}

#[derive(Deserialize)]
pub struct AlertCreatePayload {
  pub title: String,
  pub message: String,
  pub severity: String,
  #[serde(default)]
  pub incident_id: Option<i64>,
  #[serde(default)]
  pub latitude: Option<f64>,
  #[serde(default)]
  pub longitude: Option<f64>,
  #[serde(default)]
  pub radius_km: Option<f64>,
  #[serde(default)]
  pub audience: Option<String>,
  #[serde(default)]
  pub recommended_action: Option<String>,
}

#[derive(Deserialize)]
pub struct NearestUnitQuery {
  pub lat: f64,
  pub lng: f64,
  #[serde(default)]
  pub unit_type: Option<String>,
}

#[derive(Deserialize)]
pub struct ProximityQuery {
  pub lat: f64,
  pub lng: f64,
  #[serde(default)]
  pub radius_km: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
  pub error: String,
}
