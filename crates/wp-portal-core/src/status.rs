use std::fmt;
use thiserror::Error;
use wp_api_types::TxHash;
use wp_chain_client::ChainError;

/// Lifecycle of one submission:
/// `Idle → AwaitingConfirmation → Pending → Confirmed | Cancelled`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    AwaitingConfirmation,
    Pending(TxHash),
    Confirmed(TxHash),
    Cancelled(SubmitFailure),
}

impl SubmissionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed(_) | Self::Cancelled(_))
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => Ok(()),
            Self::AwaitingConfirmation => f.write_str("Waiting for wallet confirmation"),
            Self::Pending(hash) => write!(f, "Mining... {hash}"),
            Self::Confirmed(hash) => write!(f, "Mined -- {hash}"),
            Self::Cancelled(_) => f.write_str("Transaction Cancelled"),
        }
    }
}

/// Why a submission ended in `Cancelled`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SubmitFailure {
    #[error("no wallet provider is available")]
    NoProvider,
    #[error("no wallet account is connected")]
    NotConnected,
    #[error("rejected in the wallet")]
    Rejected,
    #[error("reverted on-chain in {0}")]
    Reverted(TxHash),
    #[error("network error: {0}")]
    Transport(String),
}

impl From<ChainError> for SubmitFailure {
    fn from(err: ChainError) -> Self {
        if err.is_user_rejection() {
            Self::Rejected
        } else {
            Self::Transport(err.to_string())
        }
    }
}
