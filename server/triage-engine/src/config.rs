//! Engine configuration with sane defaults.

/// Tunable thresholds for triage.
#[derive(Debug, Clone)]
pub struct Config {
  /// Dedup candidate window: reports older than this many hours are ignored.
  pub dedup_window_hours: i64,
  /// Dedup proximity threshold in degree-space (planar, not great-circle).
  pub dedup_degree_threshold: f64,
  /// Max reports kept in the in-memory recent window (oldest evicted first).
  pub recent_capacity: usize,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      dedup_window_hours: 2,
      dedup_degree_threshold: 0.005,
      recent_capacity: 512,
    }
  }
}
