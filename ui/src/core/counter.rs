//! Optimistic-concurrency increment of the shared participant counter.
//!
//! Many sessions bump the same counter at once. The storage layer only
//! offers `read` and `compare_and_swap`; [`TransactionalCounter`] retries the
//! whole read-modify-write when another writer commits in between, so no
//! increment is ever lost.

use std::sync::Arc;

use api::{CounterCell, CounterStore};
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CounterError {
    #[error("counter still contended after {attempts} attempt(s)")]
    Contention { attempts: u32 },
    #[error("counter service unavailable: {0}")]
    Transport(String),
    #[error("counter `{0}` cannot be incremented past u64::MAX")]
    Overflow(String),
}

/// Compare-and-swap storage for named counters.
pub trait CounterBackend {
    fn read<'a>(&'a self, key: &'a str) -> LocalBoxFuture<'a, Result<CounterCell, CounterError>>;

    /// `Ok(false)` means another writer committed first.
    fn compare_and_swap<'a>(
        &'a self,
        key: &'a str,
        expected_version: u64,
        value: u64,
    ) -> LocalBoxFuture<'a, Result<bool, CounterError>>;
}

/// Atomic increment capability used by the participation gate.
pub trait AtomicCounter {
    /// Returns the committed post-increment value.
    fn increment<'a>(&'a self, key: &'a str) -> LocalBoxFuture<'a, Result<u64, CounterError>>;
}

#[derive(Debug, Clone)]
pub struct TransactionalCounter<B> {
    backend: B,
    max_attempts: u32,
}

impl<B: CounterBackend> TransactionalCounter<B> {
    pub fn new(backend: B, max_attempts: u32) -> Self {
        Self {
            backend,
            max_attempts,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn run_increment(&self, key: &str) -> Result<u64, CounterError> {
        for attempt in 1..=self.max_attempts {
            let cell = self.backend.read(key).await?;
            let next = cell
                .value
                .unwrap_or(0)
                .checked_add(1)
                .ok_or_else(|| CounterError::Overflow(key.to_string()))?;

            if self
                .backend
                .compare_and_swap(key, cell.version, next)
                .await?
            {
                tracing::info!(key, value = next, attempt, "counter increment committed");
                return Ok(next);
            }
            tracing::debug!(key, attempt, "counter changed mid-transaction; retrying");
        }

        tracing::warn!(key, attempts = self.max_attempts, "counter increment gave up");
        Err(CounterError::Contention {
            attempts: self.max_attempts,
        })
    }
}

impl<B: CounterBackend> AtomicCounter for TransactionalCounter<B> {
    fn increment<'a>(&'a self, key: &'a str) -> LocalBoxFuture<'a, Result<u64, CounterError>> {
        self.run_increment(key).boxed_local()
    }
}

/// In-process store; shared by clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryCounterBackend {
    store: Arc<CounterStore>,
}

impl MemoryCounterBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, key: &str) -> Option<u64> {
        self.store.read(key).value
    }
}

impl CounterBackend for MemoryCounterBackend {
    fn read<'a>(&'a self, key: &'a str) -> LocalBoxFuture<'a, Result<CounterCell, CounterError>> {
        let cell = self.store.read(key);
        async move { Ok(cell) }.boxed_local()
    }

    fn compare_and_swap<'a>(
        &'a self,
        key: &'a str,
        expected_version: u64,
        value: u64,
    ) -> LocalBoxFuture<'a, Result<bool, CounterError>> {
        let committed = self.store.compare_and_swap(key, expected_version, value);
        async move { Ok(committed) }.boxed_local()
    }
}

/// Counter store behind the `api` server functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteCounterBackend;

impl CounterBackend for RemoteCounterBackend {
    fn read<'a>(&'a self, key: &'a str) -> LocalBoxFuture<'a, Result<CounterCell, CounterError>> {
        async move {
            api::read_counter(key.to_string())
                .await
                .map_err(|err| CounterError::Transport(err.to_string()))
        }
        .boxed_local()
    }

    fn compare_and_swap<'a>(
        &'a self,
        key: &'a str,
        expected_version: u64,
        value: u64,
    ) -> LocalBoxFuture<'a, Result<bool, CounterError>> {
        async move {
            api::compare_and_swap_counter(key.to_string(), expected_version, value)
                .await
                .map_err(|err| CounterError::Transport(err.to_string()))
        }
        .boxed_local()
    }
}
