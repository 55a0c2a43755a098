//! Fire-and-forget notification sink.
//!
//! Fan-out to live subscribers is an external collaborator; the core only
//! emits coarse refresh events. Delivery is best-effort and decoupled from
//! the store transaction: a failed publish never rolls back a state change.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedEvent {
  RefreshIncidents,
  RefreshAlerts,
  RefreshUnits,
}

impl FeedEvent {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::RefreshIncidents => "refresh_incidents",
      Self::RefreshAlerts => "refresh_alerts",
      Self::RefreshUnits => "refresh_units",
    }
  }
}

pub trait Notifier: Send + Sync {
  fn publish(&self, event: FeedEvent);
}

/// Swallows everything. Useful for tests and offline tooling.
pub struct NullNotifier;

impl Notifier for NullNotifier {
  fn publish(&self, _event: FeedEvent) {}
}

/// Logs each event; the gateway layers its own fan-out on top.
pub struct LogNotifier;

impl Notifier for LogNotifier {
  fn publish(&self, event: FeedEvent) {
    tracing::debug!(event = event.as_str(), "feed event");
  }
}
