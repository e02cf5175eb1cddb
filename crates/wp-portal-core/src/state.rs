use wp_api_types::{Address, Submission};

use crate::status::{SubmissionStatus, SubmitFailure};

/// Everything the page renders. Owned by the [`Portal`](crate::Portal).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppState {
    /// Connected account; set once and never cleared.
    pub session: Option<Address>,
    /// History plus live appends, in arrival order.
    pub submissions: Vec<Submission>,
    /// Current contents of the message field.
    pub message: String,
    pub status: SubmissionStatus,
    pub loading: bool,
    pub validation_error: Option<String>,
    pub network_error: Option<String>,
}

impl AppState {
    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    pub fn last_failure(&self) -> Option<&SubmitFailure> {
        match &self.status {
            SubmissionStatus::Cancelled(failure) => Some(failure),
            _ => None,
        }
    }
}
