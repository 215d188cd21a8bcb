//! Once-per-session participation counting.
//!
//! The gate has two states, derived from the session store so they survive
//! reloads of the same tab:
//!
//! - `NotCounted`: the next [`ParticipationGate::register_once`] increments
//!   the shared counter.
//! - `Counted`: `register_once` is a no-op until [`ParticipationGate::reset`]
//!   starts a fresh attempt.
//!
//! A failed increment leaves the gate in `NotCounted`; the caller carries on
//! without a participant number.

use std::cell::Cell;
use std::rc::Rc;

use super::counter::{AtomicCounter, CounterError};
use super::storage::SharedSession;

pub const COUNTED_KEY: &str = "yuletype.participation.counted";
pub const ORDINAL_KEY: &str = "yuletype.participation.ordinal";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipationState {
    NotCounted,
    Counted,
}

#[derive(Clone)]
pub struct ParticipationGate {
    counter: Rc<dyn AtomicCounter>,
    session: SharedSession,
    key: String,
    in_flight: Rc<Cell<bool>>,
}

impl ParticipationGate {
    pub fn new(
        counter: Rc<dyn AtomicCounter>,
        session: SharedSession,
        key: impl Into<String>,
    ) -> Self {
        Self {
            counter,
            session,
            key: key.into(),
            in_flight: Rc::new(Cell::new(false)),
        }
    }

    pub fn state(&self) -> ParticipationState {
        match self.session.get(COUNTED_KEY).as_deref() {
            Some("true") => ParticipationState::Counted,
            _ => ParticipationState::NotCounted,
        }
    }

    pub fn is_counted(&self) -> bool {
        self.state() == ParticipationState::Counted
    }

    /// Participant number committed for this session, if any.
    pub fn ordinal(&self) -> Option<u64> {
        self.session.get(ORDINAL_KEY)?.parse().ok()
    }

    /// Increment the shared counter unless this session was already counted.
    ///
    /// Returns `Ok(Some(n))` with the committed value on the first success,
    /// `Ok(None)` when counted already (or another call is mid-flight), and
    /// `Err` when the increment failed; the gate then stays `NotCounted`.
    pub async fn register_once(&self) -> Result<Option<u64>, CounterError> {
        if self.is_counted() {
            tracing::debug!("participation already counted this session");
            return Ok(None);
        }
        let Some(_flight) = InFlight::enter(&self.in_flight) else {
            tracing::debug!("participation increment already in flight");
            return Ok(None);
        };

        match self.counter.increment(&self.key).await {
            Ok(ordinal) => {
                self.session.set(ORDINAL_KEY, &ordinal.to_string());
                self.session.set(COUNTED_KEY, "true");
                Ok(Some(ordinal))
            }
            Err(err) => {
                tracing::warn!(error = %err, "participation not recorded");
                Err(err)
            }
        }
    }

    /// Return to `NotCounted` so the next attempt may increment again.
    pub fn reset(&self) {
        self.session.remove(COUNTED_KEY);
        self.session.remove(ORDINAL_KEY);
    }
}

/// Marks an increment as running; cleared on drop, including when the
/// awaiting future is abandoned.
struct InFlight<'a>(&'a Cell<bool>);

impl<'a> InFlight<'a> {
    fn enter(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}
