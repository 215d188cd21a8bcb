//! Versioned counter cells with compare-and-swap commits.

use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Snapshot of one counter. `version` is 0 while the counter has never been
/// written and increases by one on every committed write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterCell {
    pub value: Option<u64>,
    pub version: u64,
}

#[derive(Debug, Default)]
pub struct CounterStore {
    cells: Mutex<HashMap<String, CounterCell>>,
}

impl CounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self, key: &str) -> CounterCell {
        let cells = self.cells.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        cells.get(key).copied().unwrap_or_default()
    }

    /// Write `value` only if the cell is still at `expected_version`.
    pub fn compare_and_swap(&self, key: &str, expected_version: u64, value: u64) -> bool {
        let mut cells = self.cells.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let cell = cells.entry(key.to_string()).or_default();
        if cell.version != expected_version {
            tracing::debug!(
                key,
                expected_version,
                actual_version = cell.version,
                "counter write rejected"
            );
            return false;
        }
        cell.value = Some(value);
        cell.version += 1;
        true
    }
}

/// Store shared by every request served by this process.
#[cfg_attr(not(feature = "server"), allow(dead_code))]
pub(crate) fn shared() -> &'static CounterStore {
    static STORE: Lazy<CounterStore> = Lazy::new(CounterStore::new);
    &STORE
}
