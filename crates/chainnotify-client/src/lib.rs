//! chainnotify-client — chain notifications as async channels.
//!
//! # Features
//! - Block epochs as a cancellable [`BlockEpochStream`]
//! - Confirmation and spend notifications as single-shot [`SingleShot`] handles
//! - Macaroon attachment and setup timeout on every registration
//! - One tracked Tokio task per subscription, joined by
//!   [`ChainNotifier::wait_for_finished`]
//!
//! ```text
//! register_*  →  ChainNotifierService (stream)  →  worker task
//!                                                      │ transcode
//!                                                      ▼
//!                                        BlockEpochStream / SingleShot
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod notifier;
pub mod subscription;
pub mod tracing_setup;
pub mod tracker;

mod worker;

pub use client::ChainNotifierClient;
pub use config::NotifierConfig;
pub use error::NotifierError;
pub use notifier::ChainNotifier;
pub use subscription::{BlockEpochStream, SingleShot};
pub use tracing_setup::{init_tracing, LogConfig};
pub use tracker::WorkerTracker;
