//! HTTP handlers: thin adapters from axum to the dispatch service.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;

use dispatch_engine::types::{
  Actor, IncidentStatus, NewAlert, NewUnit, Role, Severity, UnitPatch,
};
use dispatch_engine::DispatchError;
use triage_engine::InboundReport;

use crate::state::AppState;
use crate::types::*;

type ApiError = (StatusCode, Json<ErrorBody>);

fn bad_request(message: impl Into<String>) -> ApiError {
  (
    StatusCode::BAD_REQUEST,
    Json(ErrorBody {
      error: message.into(),
    }),
  )
}

/// Map the core taxonomy onto HTTP status codes. `Store` is the only 5xx:
/// callers may retry it.
fn api_error(err: DispatchError) -> ApiError {
  let status = match &err {
    DispatchError::Validation { .. } | DispatchError::InvalidTransition { .. } => {
      StatusCode::BAD_REQUEST
    }
    DispatchError::NotFound(_) => StatusCode::NOT_FOUND,
    DispatchError::Unauthorized { .. } => StatusCode::FORBIDDEN,
    DispatchError::Conflict(_) => StatusCode::CONFLICT,
    DispatchError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
  };
  (
    status,
    Json(ErrorBody {
      error: err.to_string(),
    }),
  )
}

/// Actor identity resolved upstream; absent headers mean an anonymous caller.
fn actor_from_headers(headers: &HeaderMap) -> Result<Option<Actor>, ApiError> {
  let id = match headers.get("x-actor-id") {
    Some(v) => v
      .to_str()
      .ok()
      .and_then(|s| s.parse::<i64>().ok())
      .ok_or_else(|| bad_request("x-actor-id must be an integer"))?,
    None => return Ok(None),
  };
  let role = headers
    .get("x-actor-role")
    .and_then(|v| v.to_str().ok())
    .and_then(Role::from_str_loose)
    .ok_or_else(|| bad_request("x-actor-role missing or unknown"))?;
  Ok(Some(Actor { id, role }))
}

/// Mutating endpoints need a known caller.
fn require_actor(headers: &HeaderMap) -> Result<Actor, ApiError> {
  actor_from_headers(headers)?.ok_or((
    StatusCode::UNAUTHORIZED,
    Json(ErrorBody {
      error: "actor identity required".into(),
    }),
  ))
}

pub async fn health() -> &'static str {
  "ok"
}

// ---------------------------------------------------------------------------
// Incidents
// ---------------------------------------------------------------------------

pub async fn create_incident(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  Json(payload): Json<InboundReport>,
) -> Result<(StatusCode, Json<dispatch_engine::types::Incident>), ApiError> {
  let actor = actor_from_headers(&headers)?;
  let request_id = Uuid::new_v4();
  tracing::info!(%request_id, title = %payload.title, "report received");
  let incident = state
    .dispatch
    .submit_report(actor, &payload)
    .map_err(api_error)?;
  Ok((StatusCode::CREATED, Json(incident)))
}

pub async fn list_incidents(
  State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<dispatch_engine::types::Incident>>, ApiError> {
  state.dispatch.incidents().map(Json).map_err(api_error)
}

pub async fn get_incident(
  State(state): State<Arc<AppState>>,
  Path(id): Path<i64>,
) -> Result<Json<dispatch_engine::types::Incident>, ApiError> {
  state.dispatch.incident(id).map(Json).map_err(api_error)
}

pub async fn update_incident_status(
  State(state): State<Arc<AppState>>,
  Path(id): Path<i64>,
  headers: HeaderMap,
  Json(payload): Json<StatusChangePayload>,
) -> Result<Json<dispatch_engine::types::Incident>, ApiError> {
  let actor = require_actor(&headers)?;
  let to = IncidentStatus::from_str_loose(&payload.status)
    .ok_or_else(|| bad_request("unknown incident status"))?;
  state
    .dispatch
    .update_status(actor, id, to, payload.unit_id)
    .map(Json)
    .map_err(api_error)
}

pub async fn flag_incident(
  State(state): State<Arc<AppState>>,
  Path(id): Path<i64>,
  headers: HeaderMap,
  Json(payload): Json<FlagPayload>,
) -> Result<Json<dispatch_engine::types::Incident>, ApiError> {
  let actor = require_actor(&headers)?;
  state
    .dispatch
    .flag_incident(actor, id, payload.reason)
    .map(Json)
    .map_err(api_error)
}

pub async fn merge_incident(
  State(state): State<Arc<AppState>>,
  Path(id): Path<i64>,
  headers: HeaderMap,
  Json(payload): Json<MergePayload>,
) -> Result<Json<dispatch_engine::types::Incident>, ApiError> {
  let actor = require_actor(&headers)?;
  state
    .dispatch
    .merge_duplicate(actor, id, payload.target_incident_id)
    .map(Json)
    .map_err(api_error)
}

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

pub async fn list_units(
  State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<dispatch_engine::types::Unit>>, ApiError> {
  state.dispatch.units().map(Json).map_err(api_error)
}

pub async fn create_unit(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  Json(payload): Json<UnitCreatePayload>,
) -> Result<(StatusCode, Json<dispatch_engine::types::Unit>), ApiError> {
  let actor = require_actor(&headers)?;
  let unit_type = Role::from_str_loose(&payload.unit_type)
    .ok_or_else(|| bad_request("unknown unit type"))?;
  let unit = state
    .dispatch
    .provision_unit(
      actor,
      NewUnit {
        callsign: payload.callsign,
        unit_type,
        latitude: payload.latitude,
        longitude: payload.longitude,
      },
    )
    .map_err(api_error)?;
  Ok((StatusCode::CREATED, Json(unit)))
}

pub async fn update_unit(
  State(state): State<Arc<AppState>>,
  Path(id): Path<i64>,
  headers: HeaderMap,
  Json(patch): Json<UnitPatch>,
) -> Result<Json<dispatch_engine::types::Unit>, ApiError> {
  let actor = require_actor(&headers)?;
  state
    .dispatch
    .update_unit(actor, id, patch)
    .map(Json)
    .map_err(api_error)
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

pub async fn list_alerts(
  State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<dispatch_engine::types::Alert>>, ApiError> {
  state.dispatch.alerts().map(Json).map_err(api_error)
}

pub async fn create_alert(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  Json(payload): Json<AlertCreatePayload>,
) -> Result<(StatusCode, Json<dispatch_engine::types::Alert>), ApiError> {
  let actor = require_actor(&headers)?;
  let severity = Severity::from_str_loose(&payload.severity)
    .ok_or_else(|| bad_request("unknown severity"))?;
  let alert = state
    .dispatch
    .broadcast_alert(
      actor,
      NewAlert {
        title: payload.title,
        message: payload.message,
        severity,
        incident_id: payload.incident_id,
        latitude: payload.latitude,
        longitude: payload.longitude,
        radius_km: payload.radius_km,
        audience: payload.audience,
        recommended_action: payload.recommended_action,
      },
    )
    .map_err(api_error)?;
  Ok((StatusCode::CREATED, Json(alert)))
}

// ---------------------------------------------------------------------------
// Routing queries
// ---------------------------------------------------------------------------

pub async fn nearest_unit(
  State(state): State<Arc<AppState>>,
  Query(query): Query<NearestUnitQuery>,
) -> Result<Json<dispatch_engine::units::NearestUnit>, ApiError> {
  let unit_type = match &query.unit_type {
    Some(s) => Some(Role::from_str_loose(s).ok_or_else(|| bad_request("unknown unit type"))?),
    None => None,
  };
  state
    .dispatch
    .nearest_unit(query.lat, query.lng, unit_type)
    .map(Json)
    .map_err(api_error)
}

pub async fn proximity_alerts(
  State(state): State<Arc<AppState>>,
  Query(query): Query<ProximityQuery>,
) -> Result<Json<Vec<dispatch_engine::units::ProximityThreat>>, ApiError> {
  state
    .dispatch
    .proximity_threats(query.lat, query.lng, query.radius_km)
    .map(Json)
    .map_err(api_error)
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

pub async fn stats(
  State(state): State<Arc<AppState>>,
) -> Result<Json<dispatch_engine::types::Stats>, ApiError> {
  state.dispatch.stats().map(Json).map_err(api_error)
}
