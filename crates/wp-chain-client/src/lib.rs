//! Provider boundary and typed access to the WavePortal contract.
//!
//! Everything here talks to the chain through [`Eip1193Provider`], so the same
//! client runs against an injected browser wallet or a JSON-RPC node.

use async_trait::async_trait;
use serde_json::Value;
use std::rc::Rc;
use thiserror::Error;

pub mod abi;
mod client;
mod contract;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use abi::AbiError;
pub use client::{BlockTag, EthClient, LogFilter, RawLog, TransactionRequest};
pub use contract::{
    GET_ALL_WAVES, GET_TOTAL_WAVES, NEW_WAVE_EVENT, WAVE, WavePortalContract,
};

/// EIP-1193 error code for a request the user declined in their wallet.
pub const USER_REJECTED_CODE: i64 = 4001;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("user rejected the request")]
    UserRejected,
    #[error("provider error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    pub fn from_rpc(code: i64, message: impl Into<String>) -> Self {
        if code == USER_REJECTED_CODE {
            Self::UserRejected
        } else {
            Self::Rpc {
                code,
                message: message.into(),
            }
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Abi(#[from] AbiError),
}

impl ChainError {
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, Self::Provider(ProviderError::UserRejected))
    }
}

/// A request-style provider, as in EIP-1193.
///
/// Futures are not `Send`: the browser implementation holds JS handles.
#[async_trait(?Send)]
pub trait Eip1193Provider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;
}

#[async_trait(?Send)]
impl<P: Eip1193Provider + ?Sized> Eip1193Provider for Rc<P> {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        (**self).request(method, params).await
    }
}
