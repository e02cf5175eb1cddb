//! Scripted provider and ABI fixtures for tests.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use wp_api_types::WaveRecord;

use crate::abi::{self, WORD, encode_hex, push_string, quantity, uint_word};
use crate::{Eip1193Provider, NEW_WAVE_EVENT, ProviderError};

/// Answers each method from a FIFO of scripted replies, falling back to a
/// sticky reply, and records every request it sees.
#[derive(Default)]
pub struct MockProvider {
    queued: RefCell<HashMap<String, VecDeque<Result<Value, ProviderError>>>>,
    sticky: RefCell<HashMap<String, Result<Value, ProviderError>>>,
    calls: RefCell<Vec<(String, Value)>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: &str, value: Value) {
        self.push(method, Ok(value));
    }

    pub fn fail(&self, method: &str, err: ProviderError) {
        self.push(method, Err(err));
    }

    pub fn always(&self, method: &str, value: Value) {
        self.sticky.borrow_mut().insert(method.to_owned(), Ok(value));
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.borrow().clone()
    }

    pub fn calls_to(&self, method: &str) -> usize {
        self.calls.borrow().iter().filter(|(m, _)| m == method).count()
    }

    fn push(&self, method: &str, reply: Result<Value, ProviderError>) {
        self.queued
            .borrow_mut()
            .entry(method.to_owned())
            .or_default()
            .push_back(reply);
    }
}

#[async_trait(?Send)]
impl Eip1193Provider for MockProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        self.calls.borrow_mut().push((method.to_owned(), params));

        let queued = self
            .queued
            .borrow_mut()
            .get_mut(method)
            .and_then(VecDeque::pop_front);
        if let Some(reply) = queued {
            return reply;
        }
        self.sticky
            .borrow()
            .get(method)
            .cloned()
            .unwrap_or_else(|| Err(ProviderError::from_rpc(-32601, format!("no reply scripted for {method}"))))
    }
}

fn address_word(waver: &str) -> Vec<u8> {
    let mut word = vec![0_u8; 12];
    word.extend(abi::decode_hex(waver).unwrap_or_else(|_| vec![0_u8; 20]));
    word
}

/// ABI-encode `records` the way `getAllWaves()` returns them.
pub fn encode_waves(records: &[WaveRecord]) -> Vec<u8> {
    let mut tuples = Vec::new();
    let mut offsets = Vec::new();
    let heads = records.len() * WORD;
    for record in records {
        offsets.extend(uint_word((heads + tuples.len()) as u64));
        tuples.extend(address_word(&record.waver.0));
        tuples.extend(uint_word(3 * WORD as u64));
        tuples.extend(uint_word(record.timestamp));
        push_string(&mut tuples, &record.message);
    }

    let mut out = Vec::new();
    out.extend(uint_word(WORD as u64));
    out.extend(uint_word(records.len() as u64));
    out.extend(offsets);
    out.extend(tuples);
    out
}

/// A JSON-RPC log object for a `NewWave` event with an indexed sender.
pub fn new_wave_log(record: &WaveRecord, block: u64) -> Value {
    let mut data = Vec::new();
    data.extend(uint_word(record.timestamp));
    data.extend(uint_word(2 * WORD as u64));
    push_string(&mut data, &record.message);

    json!({
        "topics": [abi::event_topic(NEW_WAVE_EVENT), encode_hex(&address_word(&record.waver.0))],
        "data": encode_hex(&data),
        "blockNumber": quantity(block),
        "removed": false,
    })
}
