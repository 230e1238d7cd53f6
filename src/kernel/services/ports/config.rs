use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const MAX_DEBOUNCE_MS: u64 = 5_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FindConfig {
    /// Quiet period after a `search` command before the sweep starts.
    pub debounce_ms: u64,
    /// Pages scanned per scheduler tick.
    pub pages_per_tick: usize,
    /// Emit matches-count updates after every page instead of once at the end.
    pub update_matches_count_on_progress: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Default for FindConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 250,
            pages_per_tick: 1,
            update_matches_count_on_progress: true,
            log_dir: None,
        }
    }
}

impl FindConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Clamps out-of-range values instead of rejecting them.
    pub fn sanitized(mut self) -> Self {
        if self.pages_per_tick == 0 {
            self.pages_per_tick = 1;
        }
        self.debounce_ms = self.debounce_ms.min(MAX_DEBOUNCE_MS);
        self
    }
}
