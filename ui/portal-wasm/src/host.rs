use futures::future::LocalBoxFuture;
use std::time::Duration;
use tracing::warn;
use wp_portal_core::{AppState, Host};

use crate::dom::Elements;
use crate::render;

/// Runs the portal on the browser event loop.
pub struct BrowserHost {
    els: Elements,
}

impl BrowserHost {
    pub fn new(els: Elements) -> Self {
        Self { els }
    }
}

impl Host for BrowserHost {
    fn alert(&self, message: &str) {
        if let Err(err) = self.els.window.alert_with_message(message) {
            warn!(error = ?err, "window.alert failed");
        }
    }

    fn render(&self, state: &AppState) {
        render::render(&self.els, state);
    }

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(gloo_timers::future::sleep(duration))
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}
