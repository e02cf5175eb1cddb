use serde::{Deserialize, Serialize};
use std::fmt;

pub const WAVE_PORTAL_ADDRESS: &str = "0xEFc26673128cd281F0B170c2028C3a318051C675";
pub const RINKEBY_CHAIN_ID: u64 = 4;
pub const RINKEBY_NETWORK_NAME: &str = "Rinkeby Testnet";
pub const DEFAULT_GAS_LIMIT: u64 = 300_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Address(pub String);

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A wave exactly as the contract stores it. `timestamp` is in unit seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WaveRecord {
    pub waver: Address,
    pub message: String,
    pub timestamp: u64,
}

/// A wave normalised for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Submission {
    pub sender: Address,
    pub timestamp_ms: u64,
    pub message: String,
}

impl From<WaveRecord> for Submission {
    fn from(record: WaveRecord) -> Self {
        Self {
            sender: record.waver,
            timestamp_ms: record.timestamp.saturating_mul(1000),
            message: record.message,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxReceipt {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    /// `1` on success, `0` on revert. Pre-Byzantium receipts carry no status.
    pub status: Option<u64>,
}

impl TxReceipt {
    pub fn succeeded(&self) -> bool {
        self.status != Some(0)
    }
}

/// Deployment the portal talks to, plus the timing knobs of its polling loops.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PortalConfig {
    pub contract_address: String,
    pub chain_id: u64,
    pub network_name: String,
    pub gas_limit: u64,
    pub feed_poll_interval_ms: u64,
    pub receipt_poll_interval_ms: u64,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            contract_address: WAVE_PORTAL_ADDRESS.to_owned(),
            chain_id: RINKEBY_CHAIN_ID,
            network_name: RINKEBY_NETWORK_NAME.to_owned(),
            gas_limit: DEFAULT_GAS_LIMIT,
            feed_poll_interval_ms: 4_000,
            receipt_poll_interval_ms: 1_000,
        }
    }
}

impl PortalConfig {
    /// Overlay `WAVEPORTAL_CONTRACT` and `WAVEPORTAL_CHAIN_ID` onto the defaults.
    /// Unparseable chain ids are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(address) = std::env::var("WAVEPORTAL_CONTRACT") {
            if !address.trim().is_empty() {
                config.contract_address = address.trim().to_owned();
            }
        }
        if let Some(chain_id) = std::env::var("WAVEPORTAL_CHAIN_ID")
            .ok()
            .and_then(|raw| raw.trim().parse().ok())
        {
            config.chain_id = chain_id;
        }
        config
    }

    pub fn network_error(&self) -> String {
        format!("Please connect your wallet to {}", self.network_name)
    }
}
