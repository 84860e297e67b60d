//! Domain value objects produced by the transcoder.

use std::fmt;
use std::str::FromStr;

use crate::error::DecodeError;

pub use bitcoin::Transaction;

// ─── ChainHash ────────────────────────────────────────────────────────────────

/// A 32-byte transaction or block identifier, stored in wire byte order.
///
/// Displayed and parsed in reversed-byte hex, the way block explorers and
/// node RPCs print txids and block hashes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ChainHash([u8; 32]);

impl ChainHash {
    /// Hash length in bytes.
    pub const LEN: usize = 32;

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Build from a byte slice that must be exactly [`Self::LEN`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| DecodeError::InvalidHashLength(bytes.len()))?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl From<[u8; 32]> for ChainHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for ChainHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ChainHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        write!(f, "{}", hex::encode(reversed))
    }
}

impl fmt::Debug for ChainHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainHash({self})")
    }
}

impl FromStr for ChainHash {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = hex::decode(s).map_err(|e| DecodeError::InvalidHex(e.to_string()))?;
        bytes.reverse();
        Self::from_slice(&bytes)
    }
}

// ─── Outpoint ─────────────────────────────────────────────────────────────────

/// Reference to a specific output of a prior transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Outpoint {
    pub hash: ChainHash,
    pub index: u32,
}

impl Outpoint {
    pub fn new(hash: ChainHash, index: u32) -> Self {
        Self { hash, index }
    }
}

impl fmt::Display for Outpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hash, self.index)
    }
}

// ─── Notification payloads ────────────────────────────────────────────────────

/// The spend of a watched output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendDetail {
    pub spent_outpoint: Outpoint,
    pub spender_tx_hash: ChainHash,
    pub spender_input_index: u32,
    pub spending_tx: Transaction,
    pub spending_height: i32,
}

/// A transaction that reached the requested confirmation depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxConfirmation {
    pub block_height: u32,
    pub block_hash: ChainHash,
    pub tx: Transaction,
    /// Position of `tx` within the confirming block.
    pub tx_index: u32,
}
