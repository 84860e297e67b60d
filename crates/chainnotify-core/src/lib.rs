//! chainnotify-core — wire types, transcoder and transport seam for ChainNotify.
//!
//! # Overview
//!
//! ChainNotify turns the server-streamed calls of a node's chain notifier
//! service into async channels. The core crate defines:
//!
//! - [`wire`] — the notifier's request/event messages, exactly as sent
//! - [`types`] — validated domain values ([`ChainHash`], [`Outpoint`], ...)
//! - [`transcode`] — pure wire → domain conversions
//! - [`ChainNotifierService`] — the streaming transport trait
//! - [`CallContext`] / [`Macaroon`] — per-call cancellation and credentials
//! - [`TransportError`] / [`DecodeError`] — structured error types

pub mod auth;
pub mod error;
pub mod transcode;
pub mod transport;
pub mod types;
pub mod wire;

pub use auth::{CallContext, Macaroon, MACAROON_METADATA_KEY};
pub use error::{DecodeError, TransportError};
pub use transport::{ChainNotifierService, EventStream};
pub use types::{ChainHash, Outpoint, SpendDetail, Transaction, TxConfirmation};
