//! Sync and reveal settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the order index is rewritten after a create
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexWriteMode {
    /// Read, append, overwrite. Concurrent creates can lose an id.
    #[default]
    Overwrite,

    /// Versioned read and compare-and-set write, retried on conflict
    Conditional,
}

/// Order store settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub index_write: IndexWriteMode,

    /// Extra attempts after a version conflict (conditional mode only)
    #[serde(default = "default_conflict_retries")]
    pub conflict_retries: u32,
}

fn default_conflict_retries() -> u32 {
    3
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            index_write: IndexWriteMode::default(),
            conflict_retries: default_conflict_retries(),
        }
    }
}

/// Reveal flow settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Pause between signature and decode (ms)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Validity window announced in the signed message
    #[serde(default = "default_duration_days")]
    pub duration_days: u32,

    /// Hex digits in the generated public key
    #[serde(default = "default_public_key_hex_len")]
    pub public_key_hex_len: usize,
}

fn default_delay_ms() -> u64 {
    1500
}

fn default_duration_days() -> u32 {
    30
}

fn default_public_key_hex_len() -> usize {
    2000
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            duration_days: default_duration_days(),
            public_key_hex_len: default_public_key_hex_len(),
        }
    }
}

impl RevealConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
