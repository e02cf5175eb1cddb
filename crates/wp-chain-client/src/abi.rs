//! Solidity ABI encoding for the handful of shapes the WavePortal contract uses:
//! no-argument calls, a single `string` argument, `uint256` returns, the
//! `(address,string,uint256)[]` history array and the `NewWave` log.

use sha3::{Digest, Keccak256};
use std::num::IntErrorKind;
use thiserror::Error;
use wp_api_types::{Address, WaveRecord};

pub const WORD: usize = 32;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AbiError {
    #[error("invalid hex data: {0}")]
    Hex(String),
    #[error("abi data truncated: need {needed} bytes at offset {offset}, have {len}")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        len: usize,
    },
    #[error("abi integer does not fit in 64 bits")]
    Overflow,
    #[error("malformed log: {0}")]
    Log(String),
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut out = [0_u8; 32];
    out.copy_from_slice(&Keccak256::digest(data));
    out
}

pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// `topic0` of an event, as the hex string JSON-RPC filters expect.
pub fn event_topic(signature: &str) -> String {
    encode_hex(&keccak256(signature.as_bytes()))
}

pub fn encode_call(signature: &str) -> Vec<u8> {
    selector(signature).to_vec()
}

pub fn encode_string_call(signature: &str, value: &str) -> Vec<u8> {
    let mut out = encode_call(signature);
    out.extend_from_slice(&uint_word(WORD as u64));
    push_string(&mut out, value);
    out
}

pub fn uint_word(value: u64) -> [u8; 32] {
    let mut word = [0_u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

pub(crate) fn push_string(out: &mut Vec<u8>, value: &str) {
    let bytes = value.as_bytes();
    out.extend_from_slice(&uint_word(bytes.len() as u64));
    out.extend_from_slice(bytes);
    out.resize(out.len() + padded_len(bytes.len()) - bytes.len(), 0);
}

pub fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD) * WORD
}

pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

pub fn decode_hex(data: &str) -> Result<Vec<u8>, AbiError> {
    let digits = data
        .strip_prefix("0x")
        .or_else(|| data.strip_prefix("0X"))
        .unwrap_or(data);
    hex::decode(digits).map_err(|err| AbiError::Hex(format!("{data}: {err}")))
}

/// JSON-RPC quantity encoding: minimal hex with a `0x` prefix.
pub fn quantity(value: u64) -> String {
    format!("{value:#x}")
}

pub fn parse_quantity(raw: &str) -> Result<u64, AbiError> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    u64::from_str_radix(digits, 16).map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow => AbiError::Overflow,
        _ => AbiError::Hex(raw.to_owned()),
    })
}

/// EIP-55 mixed-case rendering of a 20-byte address.
pub fn checksum_address(bytes: &[u8; 20]) -> String {
    let lower = hex::encode(bytes);
    let hash = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (index, ch) in lower.chars().enumerate() {
        let shift = if index % 2 == 0 { 4 } else { 0 };
        let nibble = (hash[index / 2] >> shift) & 0x0f;
        if ch.is_ascii_alphabetic() && nibble >= 8 {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Bounds-checked view over ABI-encoded bytes. Offsets are absolute.
struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn slice(&self, offset: usize, needed: usize) -> Result<&'a [u8], AbiError> {
        offset
            .checked_add(needed)
            .filter(|end| *end <= self.data.len())
            .map(|end| &self.data[offset..end])
            .ok_or(AbiError::OutOfBounds {
                offset,
                needed,
                len: self.data.len(),
            })
    }

    fn uint(&self, offset: usize) -> Result<u64, AbiError> {
        let word = self.slice(offset, WORD)?;
        if word[..24].iter().any(|byte| *byte != 0) {
            return Err(AbiError::Overflow);
        }
        let mut low = [0_u8; 8];
        low.copy_from_slice(&word[24..]);
        Ok(u64::from_be_bytes(low))
    }

    fn length(&self, offset: usize) -> Result<usize, AbiError> {
        usize::try_from(self.uint(offset)?).map_err(|_| AbiError::Overflow)
    }

    /// Follow the dynamic-field pointer stored at `head`, relative to `base`.
    fn pointer(&self, base: usize, head: usize) -> Result<usize, AbiError> {
        base.checked_add(self.length(head)?).ok_or(AbiError::Overflow)
    }

    fn address(&self, offset: usize) -> Result<Address, AbiError> {
        let word = self.slice(offset, WORD)?;
        let mut bytes = [0_u8; 20];
        bytes.copy_from_slice(&word[12..]);
        Ok(Address(checksum_address(&bytes)))
    }

    // Anyone can store arbitrary bytes; invalid UTF-8 becomes U+FFFD.
    fn string(&self, offset: usize) -> Result<String, AbiError> {
        let len = self.length(offset)?;
        let bytes = self.slice(field(offset, 1)?, len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

fn field(base: usize, index: usize) -> Result<usize, AbiError> {
    index
        .checked_mul(WORD)
        .and_then(|delta| base.checked_add(delta))
        .ok_or(AbiError::Overflow)
}

pub fn decode_uint(data: &[u8]) -> Result<u64, AbiError> {
    Reader::new(data).uint(0)
}

/// Decode the return value of `getAllWaves()`.
pub fn decode_waves(data: &[u8]) -> Result<Vec<WaveRecord>, AbiError> {
    let reader = Reader::new(data);
    let array = reader.pointer(0, 0)?;
    let count = reader.length(array)?;
    let items = field(array, 1)?;
    // Every element owns one head word; reject counts the payload cannot hold.
    reader.slice(items, count.checked_mul(WORD).ok_or(AbiError::Overflow)?)?;

    (0..count)
        .map(|index| {
            let tuple = reader.pointer(items, field(items, index)?)?;
            Ok(WaveRecord {
                waver: reader.address(tuple)?,
                message: reader.string(reader.pointer(tuple, field(tuple, 1)?)?)?,
                timestamp: reader.uint(field(tuple, 2)?)?,
            })
        })
        .collect()
}

/// Decode a `NewWave` log. `from` is read from `topics[1]` when indexed and
/// from the data otherwise.
pub fn decode_new_wave(topics: &[String], data: &[u8]) -> Result<WaveRecord, AbiError> {
    let reader = Reader::new(data);
    match topics {
        [_, from, ..] => {
            let word = decode_hex(from)?;
            if word.len() != WORD {
                return Err(AbiError::Log(format!(
                    "indexed address topic has {} bytes",
                    word.len()
                )));
            }
            Ok(WaveRecord {
                waver: Reader::new(&word).address(0)?,
                timestamp: reader.uint(0)?,
                message: reader.string(reader.pointer(0, WORD)?)?,
            })
        }
        [_] => Ok(WaveRecord {
            waver: reader.address(0)?,
            timestamp: reader.uint(WORD)?,
            message: reader.string(reader.pointer(0, 2 * WORD)?)?,
        }),
        [] => Err(AbiError::Log("log has no topics".to_owned())),
    }
}
