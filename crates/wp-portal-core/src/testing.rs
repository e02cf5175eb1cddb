use futures::future::LocalBoxFuture;
use std::cell::RefCell;
use std::time::Duration;

use crate::host::Host;
use crate::state::AppState;

/// Host that records what the portal asks of it. Spawned tasks are parked
/// until a test drives them.
#[derive(Default)]
pub struct RecordingHost {
    alerts: RefCell<Vec<String>>,
    renders: RefCell<Vec<AppState>>,
    tasks: RefCell<Vec<LocalBoxFuture<'static, ()>>>,
}

impl RecordingHost {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    pub fn renders(&self) -> Vec<AppState> {
        self.renders.borrow().clone()
    }

    pub fn take_tasks(&self) -> Vec<LocalBoxFuture<'static, ()>> {
        std::mem::take(&mut *self.tasks.borrow_mut())
    }
}

impl Host for RecordingHost {
    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_owned());
    }

    fn render(&self, state: &AppState) {
        self.renders.borrow_mut().push(state.clone());
    }

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.tasks.borrow_mut().push(task);
    }
}
