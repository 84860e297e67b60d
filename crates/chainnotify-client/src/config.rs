//! Notifier client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::tracing_setup::LogConfig;

/// Configuration for [`ChainNotifierClient`](crate::ChainNotifierClient).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Upper bound on stream establishment, in milliseconds.
    /// Not applied to the stream once it is open.
    #[serde(default = "default_rpc_timeout_ms")]
    pub rpc_timeout_ms: u64,
    /// Logging setup for binaries embedding the client.
    #[serde(default)]
    pub log: LogConfig,
}

fn default_rpc_timeout_ms() -> u64 { 30_000 }

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
pub(crate) fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            rpc_timeout_ms: default_rpc_timeout_ms(),
            log: LogConfig::default(),
        }
    }
}

impl NotifierConfig {
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms)
    }

    /// Override the setup timeout.
    pub fn with_rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout_ms = duration_ms(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_json() {
        let cfg: NotifierConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.rpc_timeout(), Duration::from_secs(30));
        assert_eq!(cfg.log.level, "info");
        assert!(!cfg.log.json);
    }

    #[test]
    fn overrides() {
        let cfg: NotifierConfig = serde_json::from_str(
            r#"{"rpc_timeout_ms": 2500, "log": {"level": "debug", "json": true}}"#,
        )
        .unwrap();
        assert_eq!(cfg.rpc_timeout(), Duration::from_millis(2500));
        assert_eq!(cfg.log.level, "debug");
        assert!(cfg.log.json);

        let cfg = NotifierConfig::default().with_rpc_timeout(Duration::from_secs(5));
        assert_eq!(cfg.rpc_timeout_ms, 5_000);
    }

    #[test]
    fn oversized_timeout_saturates() {
        assert_eq!(duration_ms(Duration::from_millis(1_500)), 1_500);
        assert_eq!(duration_ms(Duration::MAX), u64::MAX);

        let cfg = NotifierConfig::default().with_rpc_timeout(Duration::MAX);
        assert_eq!(cfg.rpc_timeout_ms, u64::MAX);
    }
}
