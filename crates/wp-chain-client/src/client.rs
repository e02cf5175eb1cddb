use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;
use wp_api_types::{Address, TxHash, TxReceipt};

use crate::abi::{decode_hex, encode_hex, parse_quantity, quantity};
use crate::{ChainError, Eip1193Provider, ProviderError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    Latest,
    Number(u64),
}

impl BlockTag {
    fn to_json(self) -> Value {
        match self {
            Self::Latest => Value::String("latest".to_owned()),
            Self::Number(number) => Value::String(quantity(number)),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: String,
    pub to: String,
    pub data: String,
    pub gas: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    pub address: String,
    pub topic0: String,
    pub from_block: u64,
    pub to_block: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawLog {
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub removed: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    transaction_hash: String,
    #[serde(default)]
    block_number: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// Typed wrapper over the JSON-RPC methods the portal needs.
pub struct EthClient<P> {
    provider: P,
}

impl<P: Eip1193Provider> EthClient<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, ChainError> {
        debug!(method, "provider request");
        let value = self.provider.request(method, params).await?;
        serde_json::from_value(value)
            .map_err(|err| ProviderError::InvalidResponse(format!("{method}: {err}")).into())
    }

    /// Accounts the site is already authorized for. Never prompts.
    pub async fn accounts(&self) -> Result<Vec<Address>, ChainError> {
        let accounts: Vec<String> = self.request("eth_accounts", json!([])).await?;
        Ok(accounts.into_iter().map(Address).collect())
    }

    /// Ask the wallet to authorize the site. May prompt the user.
    pub async fn request_accounts(&self) -> Result<Vec<Address>, ChainError> {
        let accounts: Vec<String> = self.request("eth_requestAccounts", json!([])).await?;
        Ok(accounts.into_iter().map(Address).collect())
    }

    pub async fn chain_id(&self) -> Result<u64, ChainError> {
        let raw: String = self.request("eth_chainId", json!([])).await?;
        Ok(parse_quantity(&raw)?)
    }

    pub async fn block_number(&self) -> Result<u64, ChainError> {
        let raw: String = self.request("eth_blockNumber", json!([])).await?;
        Ok(parse_quantity(&raw)?)
    }

    pub async fn call(&self, to: &str, data: &[u8], block: BlockTag) -> Result<Vec<u8>, ChainError> {
        let raw: String = self
            .request(
                "eth_call",
                json!([{ "to": to, "data": encode_hex(data) }, block.to_json()]),
            )
            .await?;
        Ok(decode_hex(&raw)?)
    }

    pub async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash, ChainError> {
        let hash: String = self.request("eth_sendTransaction", json!([tx])).await?;
        Ok(TxHash(hash))
    }

    /// `None` while the transaction is still unmined.
    pub async fn transaction_receipt(&self, hash: &TxHash) -> Result<Option<TxReceipt>, ChainError> {
        let raw: Option<RawReceipt> = self
            .request("eth_getTransactionReceipt", json!([hash.0]))
            .await?;
        let Some(raw) = raw else {
            return Ok(None);
        };

        Ok(Some(TxReceipt {
            transaction_hash: TxHash(raw.transaction_hash),
            block_number: raw.block_number.as_deref().map(parse_quantity).transpose()?,
            status: raw.status.as_deref().map(parse_quantity).transpose()?,
        }))
    }

    pub async fn logs(&self, filter: &LogFilter) -> Result<Vec<RawLog>, ChainError> {
        self.request(
            "eth_getLogs",
            json!([{
                "address": filter.address,
                "topics": [filter.topic0],
                "fromBlock": quantity(filter.from_block),
                "toBlock": quantity(filter.to_block),
            }]),
        )
        .await
    }
}
