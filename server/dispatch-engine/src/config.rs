//! Dispatch configuration with sane defaults.

#[derive(Debug, Clone)]
pub struct Config {
  /// Dedup candidate window: incidents older than this many hours are
  /// not scanned at intake.
  pub dedup_window_hours: i64,
  /// Dedup proximity threshold in degree-space.
  pub dedup_degree_threshold: f64,
  /// Default radius for proximity-threat queries, km.
  pub default_radius_km: f64,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      dedup_window_hours: 2,
      dedup_degree_threshold: 0.005,
      default_radius_km: 5.0,
    }
  }
}
