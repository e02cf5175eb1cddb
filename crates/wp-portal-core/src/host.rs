use futures::future::LocalBoxFuture;
use std::time::Duration;

use crate::state::AppState;

/// What the portal needs from its runtime.
pub trait Host {
    /// Blocking, modal notice.
    fn alert(&self, message: &str);
    /// Called after every state change.
    fn render(&self, state: &AppState);
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}
