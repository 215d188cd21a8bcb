//! The per-tab quiz session shared with every view through context.

use std::rc::Rc;

use dioxus::prelude::*;
use thiserror::Error;
use uuid::Uuid;

use crate::capture::ExportLock;
use crate::core::config::{Settings, SettingsError};
use crate::core::content::{ContentBank, ContentError};
use crate::core::counter::{
    AtomicCounter, MemoryCounterBackend, RemoteCounterBackend, TransactionalCounter,
};
use crate::core::participation::ParticipationGate;
use crate::core::platform::Platform;
use crate::core::storage::{platform_session, SharedSession};
use crate::tasks::quiz::QuizEngine;

const SESSION_ID_KEY: &str = "yuletype.session.id";

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Process-wide read-only data every session shares.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Services {
    pub content: &'static ContentBank,
    pub settings: &'static Settings,
}

impl Services {
    pub fn load() -> Result<Self, StartupError> {
        Ok(Self {
            content: ContentBank::embedded()?,
            settings: Settings::embedded()?,
        })
    }
}

/// Where the participant counter lives for a given launcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterWiring {
    /// Server functions in `api`.
    Remote,
    /// Counter store inside this process.
    InProcess,
}

impl CounterWiring {
    pub fn counter(self, settings: &Settings) -> Rc<dyn AtomicCounter> {
        let attempts = settings.counter.max_attempts;
        match self {
            Self::Remote => Rc::new(TransactionalCounter::new(RemoteCounterBackend, attempts)),
            Self::InProcess => Rc::new(TransactionalCounter::new(
                MemoryCounterBackend::new(),
                attempts,
            )),
        }
    }
}

/// Id of this tab's session, minted on first use. Attached to log events so
/// one visitor's attempt, count and exports can be followed together.
fn session_id(store: &SharedSession) -> String {
    match store.get(SESSION_ID_KEY) {
        Some(id) => id,
        None => {
            let id = Uuid::new_v4().to_string();
            store.set(SESSION_ID_KEY, &id);
            id
        }
    }
}

#[derive(Clone)]
pub struct QuizSession {
    pub id: String,
    pub content: &'static ContentBank,
    pub settings: &'static Settings,
    pub engine: Signal<QuizEngine>,
    /// Participant number shown on the result card, if one was committed.
    pub participant: Signal<Option<u64>>,
    pub gate: ParticipationGate,
    pub export_lock: ExportLock,
}

impl QuizSession {
    /// Must run inside a component scope; the signals belong to it.
    fn open(services: Services, wiring: CounterWiring, store: SharedSession) -> Self {
        let id = session_id(&store);

        let gate = ParticipationGate::new(
            wiring.counter(services.settings),
            store,
            services.settings.counter.key.clone(),
        );
        tracing::info!(
            session = %id,
            platform = Platform::current().as_str(),
            counted = gate.is_counted(),
            ?wiring,
            "quiz session opened"
        );

        Self {
            id,
            content: services.content,
            settings: services.settings,
            engine: Signal::new(QuizEngine::new(services.content.len())),
            participant: Signal::new(gate.ordinal()),
            gate,
            export_lock: ExportLock::new(),
        }
    }
}

pub fn use_quiz_session() -> QuizSession {
    use_context::<QuizSession>()
}

/// Loads content and settings, then provides a [`QuizSession`] to
/// `children`. Startup failures replace the whole app with a notice.
#[component]
pub fn QuizProvider(wiring: CounterWiring, children: Element) -> Element {
    let services = use_hook(|| {
        Services::load().map_err(|err| {
            tracing::error!(error = %err, "quiz content failed to load");
            err.to_string()
        })
    });

    match services {
        Ok(services) => rsx! {
            SessionScope { services, wiring, {children} }
        },
        Err(message) => rsx! {
            section { class: "page page-error",
                h1 { "The quiz could not start" }
                p { class: "page-error__detail", "{message}" }
            }
        },
    }
}

#[component]
fn SessionScope(services: Services, wiring: CounterWiring, children: Element) -> Element {
    use_context_provider(|| QuizSession::open(services, wiring, platform_session()));
    rsx! {
        {children}
    }
}
