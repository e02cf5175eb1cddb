use wp_api_types::Submission;

use crate::state::AppState;
use crate::validate::is_url_shaped;

/// One rendered row of the submission list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryView {
    pub address: String,
    pub timestamp_ms: u64,
    pub message: String,
    /// Anchor target, when the message is clickable.
    pub link: Option<String>,
}

/// Rows in display order: newest first. Equal timestamps keep arrival order.
pub fn entries(state: &AppState) -> Vec<EntryView> {
    let mut sorted: Vec<&Submission> = state.submissions.iter().collect();
    sorted.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
    sorted
        .into_iter()
        .map(|submission| EntryView {
            address: submission.sender.to_string(),
            timestamp_ms: submission.timestamp_ms,
            message: submission.message.clone(),
            link: link_target(&submission.message),
        })
        .collect()
}

/// Messages with an http(s) scheme link as-is. Scheme-less URLs get
/// `https://` so the browser does not treat them as relative paths.
pub fn link_target(message: &str) -> Option<String> {
    let trimmed = message.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Some(trimmed.to_owned())
    } else if is_url_shaped(trimmed) {
        Some(format!("https://{trimmed}"))
    } else {
        None
    }
}

/// Progress line shown in place of the list while a submission runs.
pub fn status_line(state: &AppState) -> Option<String> {
    state.loading.then(|| state.status.to_string())
}

pub fn cancellation_notice(state: &AppState) -> Option<String> {
    state
        .last_failure()
        .map(|failure| format!("{}: {failure}", state.status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{SubmissionStatus, SubmitFailure};
    use wp_api_types::Address;

    fn submission(message: &str, timestamp_ms: u64) -> Submission {
        Submission {
            sender: Address("0xabc".to_owned()),
            timestamp_ms,
            message: message.to_owned(),
        }
    }

    #[test]
    fn newest_first_with_stable_ties() {
        let state = AppState {
            submissions: vec![
                submission("a.io", 1_000),
                submission("b.io", 3_000),
                submission("c.io", 1_000),
                submission("d.io", 2_000),
            ],
            ..AppState::default()
        };

        let order: Vec<_> = entries(&state).into_iter().map(|e| e.message).collect();

        assert_eq!(order, ["b.io", "d.io", "a.io", "c.io"]);
        assert_eq!(state.submissions[0].message, "a.io");
    }

    #[test]
    fn link_targets() {
        assert_eq!(
            link_target("https://example.com/x").as_deref(),
            Some("https://example.com/x")
        );
        assert_eq!(
            link_target("HTTP://Example.com").as_deref(),
            Some("HTTP://Example.com")
        );
        assert_eq!(
            link_target("www.example.com").as_deref(),
            Some("https://www.example.com")
        );
        assert_eq!(link_target("hello there"), None);
    }

    #[test]
    fn status_line_only_while_loading() {
        let mut state = AppState {
            status: SubmissionStatus::AwaitingConfirmation,
            ..AppState::default()
        };
        assert_eq!(status_line(&state), None);

        state.loading = true;
        assert_eq!(
            status_line(&state).as_deref(),
            Some("Waiting for wallet confirmation")
        );
    }

    #[test]
    fn cancellation_carries_the_reason() {
        let state = AppState {
            status: SubmissionStatus::Cancelled(SubmitFailure::Rejected),
            ..AppState::default()
        };

        assert_eq!(
            cancellation_notice(&state).as_deref(),
            Some("Transaction Cancelled: rejected in the wallet")
        );
    }
}
