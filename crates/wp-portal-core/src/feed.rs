use futures::future::AbortHandle;
use tracing::debug;
use wp_api_types::Submission;
use wp_chain_client::{ChainError, Eip1193Provider, WavePortalContract};

/// Cursor over `NewWave` events. Each poll covers the blocks mined since the
/// previous one, so no event is reported twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveFeed {
    last_block: u64,
}

impl WaveFeed {
    /// Start after `block`; events at or before it are already in the history.
    pub fn after(block: u64) -> Self {
        Self { last_block: block }
    }

    pub fn last_block(&self) -> u64 {
        self.last_block
    }

    pub async fn poll<P: Eip1193Provider>(
        &mut self,
        contract: &WavePortalContract<P>,
    ) -> Result<Vec<Submission>, ChainError> {
        let head = contract.client().block_number().await?;
        if head <= self.last_block {
            return Ok(Vec::new());
        }

        let waves = contract.new_waves(self.last_block + 1, head).await?;
        debug!(from = self.last_block + 1, to = head, count = waves.len(), "polled NewWave logs");
        self.last_block = head;
        Ok(waves.into_iter().map(Submission::from).collect())
    }
}

/// Keeps a feed task alive. Dropping it stops the task.
#[derive(Debug)]
pub struct FeedGuard {
    handle: AbortHandle,
}

impl FeedGuard {
    pub fn new(handle: AbortHandle) -> Self {
        Self { handle }
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_aborted()
    }
}

impl Drop for FeedGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::{Aborted, abortable};
    use serde_json::json;
    use wp_api_types::{Address, WaveRecord};
    use wp_chain_client::abi::{WORD, encode_hex, uint_word};
    use wp_chain_client::testing::{MockProvider, new_wave_log};

    fn contract() -> WavePortalContract<MockProvider> {
        WavePortalContract::new(MockProvider::new(), wp_api_types::WAVE_PORTAL_ADDRESS)
    }

    fn record(message: &str, timestamp: u64) -> WaveRecord {
        WaveRecord {
            waver: Address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".to_owned()),
            message: message.to_owned(),
            timestamp,
        }
    }

    #[tokio::test]
    async fn idle_chain_issues_no_log_query() -> anyhow::Result<()> {
        let contract = contract();
        contract.client().provider().respond("eth_blockNumber", json!("0x10"));

        let mut feed = WaveFeed::after(16);

        assert!(feed.poll(&contract).await?.is_empty());
        assert_eq!(contract.client().provider().calls_to("eth_getLogs"), 0);
        Ok(())
    }

    #[tokio::test]
    async fn poll_covers_new_blocks_once() -> anyhow::Result<()> {
        let contract = contract();
        let provider = contract.client().provider();
        provider.respond("eth_blockNumber", json!("0x12"));
        provider.respond(
            "eth_getLogs",
            json!([new_wave_log(&record("https://a.io", 7), 0x11)]),
        );
        provider.respond("eth_blockNumber", json!("0x12"));

        let mut feed = WaveFeed::after(0x10);
        let first = feed.poll(&contract).await?;
        let second = feed.poll(&contract).await?;

        assert_eq!(first.len(), 1);
        assert_eq!(first[0].timestamp_ms, 7_000);
        assert!(second.is_empty());
        assert_eq!(feed.last_block(), 0x12);

        let (_, filter) = &provider.calls()[1];
        assert_eq!(filter[0]["fromBlock"], json!("0x11"));
        assert_eq!(filter[0]["toBlock"], json!("0x12"));
        Ok(())
    }

    #[tokio::test]
    async fn failed_poll_keeps_the_cursor() {
        let contract = contract();
        contract.client().provider().respond("eth_blockNumber", json!("0x20"));

        let mut feed = WaveFeed::after(0x10);

        assert!(feed.poll(&contract).await.is_err());
        assert_eq!(feed.last_block(), 0x10);
    }

    #[tokio::test]
    async fn malformed_logs_do_not_stall_the_cursor() -> anyhow::Result<()> {
        let mut not_utf8 = new_wave_log(&record("placeholder", 8), 0x11);
        let mut data = Vec::new();
        data.extend(uint_word(8));
        data.extend(uint_word(2 * WORD as u64));
        data.extend(uint_word(2));
        let mut bytes = vec![0xff, 0xfe];
        bytes.resize(WORD, 0);
        data.extend(bytes);
        not_utf8["data"] = json!(encode_hex(&data));

        let mut truncated = new_wave_log(&record("https://cut.io", 9), 0x12);
        truncated["data"] = json!("0x00");

        let contract = contract();
        let provider = contract.client().provider();
        provider.respond("eth_blockNumber", json!("0x12"));
        provider.respond(
            "eth_getLogs",
            json!([not_utf8, truncated, new_wave_log(&record("https://ok.io", 10), 0x12)]),
        );
        provider.respond("eth_blockNumber", json!("0x12"));

        let mut feed = WaveFeed::after(0x10);
        let first = feed.poll(&contract).await?;
        let second = feed.poll(&contract).await?;

        let messages: Vec<_> = first.iter().map(|wave| wave.message.as_str()).collect();
        assert_eq!(messages, ["\u{fffd}\u{fffd}", "https://ok.io"]);
        assert_eq!(feed.last_block(), 0x12);
        assert!(second.is_empty());
        assert_eq!(provider.calls_to("eth_getLogs"), 1);
        Ok(())
    }

    #[tokio::test]
    async fn dropping_the_guard_stops_the_task() {
        let (task, handle) = abortable(futures::future::pending::<()>());
        let guard = FeedGuard::new(handle);
        assert!(!guard.is_released());

        drop(guard);

        assert_eq!(task.await, Err(Aborted));
    }
}
