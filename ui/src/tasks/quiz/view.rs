use dioxus::prelude::*;

use crate::components::nav;
use crate::core::content::CategoryTag;
use crate::core::format::format_progress;
use crate::session::{use_quiz_session, QuizSession};

use super::engine::AnswerOutcome;

#[component]
pub fn QuizView() -> Element {
    let session = use_quiz_session();
    let engine = session.engine;
    let finishing = use_signal(|| false);

    let (index, outcome) = {
        let engine = engine.read();
        (engine.current_index(), engine.outcome().cloned())
    };

    let Some(index) = index else {
        let tag = outcome.map(|tag| tag.to_string()).unwrap_or_default();
        return rsx! {
            article { class: "quiz quiz--done",
                p { "Every question is answered." }
                button {
                    r#type: "button",
                    class: "button button--primary",
                    onclick: move |_| nav::go_to_outcome(&tag),
                    "See your result"
                }
            }
        };
    };

    let Some(question) = session.content.question(index) else {
        tracing::warn!(index, "question index outside the bank");
        return rsx! {
            p { class: "quiz__error", "This question is unavailable." }
        };
    };

    let total = session.content.len();
    let progress = format_progress(index + 1, total);
    let percent = index * 100 / total.max(1);

    let choices = question.choices.iter().enumerate().map(|(choice_index, choice)| {
        let session = session.clone();
        let category = choice.category.clone();
        rsx! {
            button {
                key: "{index}-{choice_index}",
                r#type: "button",
                class: "quiz__choice",
                disabled: finishing(),
                onclick: move |_| submit_answer(session.clone(), category.clone(), finishing),
                "{choice.label}"
            }
        }
    });

    rsx! {
        article { class: "quiz",
            div { class: "quiz__progress",
                span { class: "quiz__progress-label", "{progress}" }
                div { class: "quiz__bar",
                    div { class: "quiz__bar-fill", style: "width: {percent}%" }
                }
            }
            h2 { class: "quiz__prompt", "{question.prompt}" }
            div { class: "quiz__choices", {choices} }
        }
    }
}

/// Record one answer; on the last one count the participant, then show the
/// result whether or not counting worked.
fn submit_answer(session: QuizSession, category: CategoryTag, mut finishing: Signal<bool>) {
    let mut engine = session.engine;
    let AnswerOutcome::Complete { category } = engine.with_mut(|engine| engine.answer(&category))
    else {
        return;
    };

    finishing.set(true);
    spawn(async move {
        let mut participant = session.participant;
        let ordinal = match session.gate.register_once().await {
            Ok(Some(ordinal)) => Some(ordinal),
            Ok(None) => session.gate.ordinal(),
            Err(_) => None,
        };
        tracing::info!(session = %session.id, %category, ?ordinal, "attempt finished");
        participant.set(ordinal);
        finishing.set(false);
        nav::go_to_outcome(category.as_str());
    });
}
