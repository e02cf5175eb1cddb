//! WavePortal application core.
//!
//! Owns the view state and runs the page's flows against a wallet provider.
//! Everything that touches the runtime goes through a [`Host`], so the same
//! code drives the browser front end and the tests.

pub mod feed;
pub mod host;
pub mod portal;
pub mod state;
pub mod status;
pub mod validate;
pub mod view;

#[cfg(test)]
mod testing;

pub use feed::{FeedGuard, WaveFeed};
pub use host::Host;
pub use portal::{NO_WALLET_ALERT, Portal, ReadError, ShareOutcome};
pub use state::AppState;
pub use status::{SubmissionStatus, SubmitFailure};
pub use validate::{BLANK_INPUT_ALERT, INVALID_URL_ERROR, is_url_shaped, validate_message};
pub use view::{EntryView, entries, link_target};
