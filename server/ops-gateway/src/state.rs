//! Shared application state.

use dispatch_engine::Dispatch;

pub struct AppState {
  pub dispatch: Dispatch,
}
