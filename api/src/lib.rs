//! Server functions for the shared participant counter.
//!
//! The store only offers read and compare-and-swap; clients build their own
//! optimistic increment on top so conflicting writers retry instead of
//! overwriting each other.

use dioxus::prelude::*;

mod store;
pub use store::{CounterCell, CounterStore};

/// Current state of the counter named `key`.
#[server]
pub async fn read_counter(key: String) -> Result<CounterCell, ServerFnError> {
    Ok(store::shared().read(&key))
}

/// Commit `value` if the counter is still at `expected_version`.
#[server]
pub async fn compare_and_swap_counter(
    key: String,
    expected_version: u64,
    value: u64,
) -> Result<bool, ServerFnError> {
    let committed = store::shared().compare_and_swap(&key, expected_version, value);
    if committed {
        tracing::info!(key, value, "participant counter committed");
    }
    Ok(committed)
}
