use tracing::{debug, warn};
use wp_api_types::{Address, TxHash, WaveRecord};

use crate::abi::{self, decode_hex, encode_hex, quantity};
use crate::client::{BlockTag, EthClient, LogFilter, TransactionRequest};
use crate::{ChainError, Eip1193Provider};

pub const GET_TOTAL_WAVES: &str = "getTotalWaves()";
pub const GET_ALL_WAVES: &str = "getAllWaves()";
pub const WAVE: &str = "wave(string)";
pub const NEW_WAVE_EVENT: &str = "NewWave(address,uint256,string)";

/// Client for a deployed WavePortal contract.
pub struct WavePortalContract<P> {
    client: EthClient<P>,
    address: String,
}

impl<P: Eip1193Provider> WavePortalContract<P> {
    pub fn new(provider: P, address: impl Into<String>) -> Self {
        Self {
            client: EthClient::new(provider),
            address: address.into(),
        }
    }

    pub fn client(&self) -> &EthClient<P> {
        &self.client
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub async fn total_waves(&self, block: BlockTag) -> Result<u64, ChainError> {
        let out = self
            .client
            .call(&self.address, &abi::encode_call(GET_TOTAL_WAVES), block)
            .await?;
        Ok(abi::decode_uint(&out)?)
    }

    pub async fn all_waves(&self, block: BlockTag) -> Result<Vec<WaveRecord>, ChainError> {
        let out = self
            .client
            .call(&self.address, &abi::encode_call(GET_ALL_WAVES), block)
            .await?;
        let waves = abi::decode_waves(&out)?;
        debug!(count = waves.len(), "fetched wave history");
        Ok(waves)
    }

    /// Submit `wave(message)` from `from`, capped at `gas_limit`.
    /// Resolves once the wallet has signed and broadcast; not when mined.
    pub async fn wave(
        &self,
        from: &Address,
        message: &str,
        gas_limit: u64,
    ) -> Result<TxHash, ChainError> {
        let tx = TransactionRequest {
            from: from.0.clone(),
            to: self.address.clone(),
            data: encode_hex(&abi::encode_string_call(WAVE, message)),
            gas: quantity(gas_limit),
        };
        self.client.send_transaction(&tx).await
    }

    /// `NewWave` events mined in `from_block..=to_block`, in chain order.
    /// Logs flagged `removed` by a reorg, and logs that do not decode, are
    /// skipped.
    pub async fn new_waves(&self, from_block: u64, to_block: u64) -> Result<Vec<WaveRecord>, ChainError> {
        let logs = self
            .client
            .logs(&LogFilter {
                address: self.address.clone(),
                topic0: abi::event_topic(NEW_WAVE_EVENT),
                from_block,
                to_block,
            })
            .await?;

        let mut waves = Vec::with_capacity(logs.len());
        for log in logs {
            if log.removed {
                warn!(block = ?log.block_number, "skipping removed NewWave log");
                continue;
            }
            let decoded =
                decode_hex(&log.data).and_then(|data| abi::decode_new_wave(&log.topics, &data));
            match decoded {
                Ok(wave) => waves.push(wave),
                Err(err) => {
                    warn!(block = ?log.block_number, error = %err, "skipping undecodable NewWave log")
                }
            }
        }
        Ok(waves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockProvider, encode_waves, new_wave_log};
    use serde_json::json;

    const PORTAL: &str = "0xEFc26673128cd281F0B170c2028C3a318051C675";

    fn record(message: &str, timestamp: u64) -> WaveRecord {
        WaveRecord {
            waver: Address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".to_owned()),
            message: message.to_owned(),
            timestamp,
        }
    }

    #[tokio::test]
    async fn wave_sends_encoded_call_with_gas_ceiling() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        provider.respond("eth_sendTransaction", json!("0xfeed"));

        let contract = WavePortalContract::new(provider, PORTAL);
        let hash = contract
            .wave(&Address("0xabc".to_owned()), "https://a.io", 300_000)
            .await?;

        assert_eq!(hash, TxHash("0xfeed".to_owned()));
        let calls = contract.client().provider().calls();
        let tx = &calls[0].1[0];
        assert_eq!(tx["from"], "0xabc");
        assert_eq!(tx["to"], PORTAL);
        assert_eq!(tx["gas"], "0x493e0");
        assert_eq!(
            tx["data"],
            encode_hex(&abi::encode_string_call(WAVE, "https://a.io"))
        );
        Ok(())
    }

    #[tokio::test]
    async fn all_waves_decodes_history() -> anyhow::Result<()> {
        let history = vec![record("a.io", 10), record("https://b.io/x", 20)];
        let provider = MockProvider::new();
        provider.respond("eth_call", json!(encode_hex(&encode_waves(&history))));

        let contract = WavePortalContract::new(provider, PORTAL);

        assert_eq!(contract.all_waves(BlockTag::Latest).await?, history);
        Ok(())
    }

    #[tokio::test]
    async fn new_waves_skips_removed_logs() -> anyhow::Result<()> {
        let kept = record("kept.io", 30);
        let mut dropped = new_wave_log(&record("dropped.io", 31), 9);
        dropped["removed"] = json!(true);

        let provider = MockProvider::new();
        provider.respond("eth_getLogs", json!([new_wave_log(&kept, 9), dropped]));

        let contract = WavePortalContract::new(provider, PORTAL);
        let waves = contract.new_waves(9, 9).await?;

        assert_eq!(waves, vec![kept]);
        let filter = &contract.client().provider().calls()[0].1[0];
        assert_eq!(filter["fromBlock"], "0x9");
        assert_eq!(filter["topics"][0], abi::event_topic(NEW_WAVE_EVENT));
        Ok(())
    }

    #[tokio::test]
    async fn new_waves_skips_undecodable_logs() -> anyhow::Result<()> {
        let kept = record("kept.io", 40);
        let mut truncated = new_wave_log(&record("cut.io", 41), 9);
        truncated["data"] = json!("0x00");

        let provider = MockProvider::new();
        provider.respond("eth_getLogs", json!([truncated, new_wave_log(&kept, 9)]));

        let contract = WavePortalContract::new(provider, PORTAL);

        assert_eq!(contract.new_waves(9, 9).await?, vec![kept]);
        Ok(())
    }
}
