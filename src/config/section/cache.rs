//! `[cache]` and `[timing]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [cache]
//! documents = 10       # parsed documents (large entries)
//! blocks = 8192        # rendered blocks (small entries)
//! titles = 8192
//! bibliographies = 10
//!
//! [timing]
//! cooldown_ms = 300    # pause after each conversion run
//! progress_ms = 300    # status tick interval while a run is in flight
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Capacities of the converter memo tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub documents: usize,
    pub blocks: usize,
    pub titles: usize,
    pub bibliographies: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            documents: 10,
            blocks: 8192,
            titles: 8192,
            bibliographies: 10,
        }
    }
}

impl CacheConfig {
    /// Names of tables configured with zero capacity.
    pub fn empty_tables(&self) -> Vec<&'static str> {
        [
            ("documents", self.documents),
            ("blocks", self.blocks),
            ("titles", self.titles),
            ("bibliographies", self.bibliographies),
        ]
        .into_iter()
        .filter(|(_, cap)| *cap == 0)
        .map(|(name, _)| name)
        .collect()
    }
}

/// Scheduling delays of the ingestion coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub cooldown_ms: u64,
    pub progress_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 300,
            progress_ms: 300,
        }
    }
}

impl TimingConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn progress_interval(&self) -> Duration {
        // tokio intervals panic on a zero period
        Duration::from_millis(self.progress_ms.max(1))
    }
}
