//! Binary entrypoint for the ops gateway.

use axum::{routing::get, routing::patch, routing::post, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use dispatch_engine::notify::LogNotifier;
use dispatch_engine::{Dispatch, MemStore};
use ops_gateway::{handlers, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt::init();

  let port: u16 = std::env::var("PORT")
    .unwrap_or_else(|_| "5005".into())
    .parse()
    .expect("PORT must be a valid u16");

  let dispatch = Dispatch::new(Arc::new(MemStore::new()), Arc::new(LogNotifier));
  let state = Arc::new(AppState { dispatch });

  let app = Router::new()
    .route("/health", get(handlers::health))
    .route(
      "/incidents",
      post(handlers::create_incident).get(handlers::list_incidents),
    )
    .route("/incidents/:id", get(handlers::get_incident))
    .route("/incidents/:id/status", post(handlers::update_incident_status))
    .route("/incidents/:id/flag", post(handlers::flag_incident))
    .route("/incidents/:id/merge", post(handlers::merge_incident))
    .route(
      "/units",
      post(handlers::create_unit).get(handlers::list_units),
    )
    .route("/units/:id", patch(handlers::update_unit))
    .route(
      "/alerts",
      post(handlers::create_alert).get(handlers::list_alerts),
    )
    .route("/routing/nearest_unit", get(handlers::nearest_unit))
    .route("/routing/proximity_alerts", get(handlers::proximity_alerts))
    .route("/analytics/stats", get(handlers::stats))
    .layer(CorsLayer::permissive())
    .with_state(state);

  let addr = SocketAddr::from(([127, 0, 0, 1], port));
  println!("ops-gateway listening on http://{}", addr);

  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;

  Ok(())
}
