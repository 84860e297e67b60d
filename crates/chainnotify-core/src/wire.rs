//! Chain notifier wire messages.
//!
//! These mirror the node's streaming notifier contracts field for field.
//! Byte fields carry hashes, scripts and raw transactions exactly as the
//! node sends them; validation happens in [`crate::transcode`].

use serde::{Deserialize, Serialize};

// ─── Block epochs ─────────────────────────────────────────────────────────────

/// A new best-chain block. Also used (empty) as the registration request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEpoch {
    #[serde(default, with = "hex::serde")]
    pub hash: Vec<u8>,
    #[serde(default)]
    pub height: u32,
}

// ─── Outpoints ────────────────────────────────────────────────────────────────

/// Wire form of a transaction outpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcOutpoint {
    #[serde(with = "hex::serde")]
    pub hash: Vec<u8>,
    pub index: u32,
}

// ─── Confirmations ────────────────────────────────────────────────────────────

/// Registration request for a confirmation notification.
///
/// An empty `txid` asks the node to match on `script` alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfRequest {
    #[serde(default, with = "hex::serde")]
    pub txid: Vec<u8>,
    #[serde(default, with = "hex::serde")]
    pub script: Vec<u8>,
    pub num_confs: u32,
    pub height_hint: u32,
}

/// Details of a transaction that reached the requested depth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfDetails {
    #[serde(with = "hex::serde")]
    pub raw_tx: Vec<u8>,
    #[serde(with = "hex::serde")]
    pub block_hash: Vec<u8>,
    pub block_height: u32,
    pub tx_index: u32,
}

/// Chain reorganization marker. Carries no payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reorg {}

/// Variant payloads of a [`ConfEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfEventKind {
    Conf(ConfDetails),
    Reorg(Reorg),
    /// A variant tag this client does not know about.
    Unknown(String),
}

/// One frame of a confirmation stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfEvent {
    #[serde(default)]
    pub event: Option<ConfEventKind>,
}

impl ConfEvent {
    pub fn conf(details: ConfDetails) -> Self {
        Self { event: Some(ConfEventKind::Conf(details)) }
    }

    pub fn reorg() -> Self {
        Self { event: Some(ConfEventKind::Reorg(Reorg {})) }
    }
}

// ─── Spends ───────────────────────────────────────────────────────────────────

/// Registration request for a spend notification.
///
/// With no `outpoint` the node matches any spend of `script`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendRequest {
    #[serde(default)]
    pub outpoint: Option<RpcOutpoint>,
    #[serde(default, with = "hex::serde")]
    pub script: Vec<u8>,
    pub height_hint: u32,
}

/// Details of the transaction that spent the watched output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendDetails {
    #[serde(default)]
    pub spending_outpoint: Option<RpcOutpoint>,
    #[serde(with = "hex::serde")]
    pub raw_spending_tx: Vec<u8>,
    #[serde(with = "hex::serde")]
    pub spending_tx_hash: Vec<u8>,
    pub spending_input_index: u32,
    pub spending_height: u32,
}

/// Variant payloads of a [`SpendEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendEventKind {
    Spend(SpendDetails),
    Reorg(Reorg),
    Unknown(String),
}

/// One frame of a spend stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendEvent {
    #[serde(default)]
    pub event: Option<SpendEventKind>,
}

impl SpendEvent {
    pub fn spend(details: SpendDetails) -> Self {
        Self { event: Some(SpendEventKind::Spend(details)) }
    }

    pub fn reorg() -> Self {
        Self { event: Some(SpendEventKind::Reorg(Reorg {})) }
    }
}
