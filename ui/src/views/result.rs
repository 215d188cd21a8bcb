use dioxus::prelude::*;

use crate::components::nav;
use crate::core::content::ResultCategory;
use crate::results::{build_result_card, settle_card, ResultExportPanel};
use crate::session::{use_quiz_session, QuizSession};

fn retake(session: &QuizSession) {
    let mut engine = session.engine;
    let mut participant = session.participant;
    engine.with_mut(|engine| engine.restart(&session.gate));
    participant.set(None);
    nav::go_to_question();
}

#[component]
pub fn Outcome(tag: String) -> Element {
    let session = use_quiz_session();
    let participant = (session.participant)();

    let Some(result) = session.content.result(&tag).cloned() else {
        tracing::warn!(tag = %tag, "no result entry for tag");
        return rsx! {
            section { class: "page page-result page-result--missing",
                h1 { "We couldn't find that result" }
                p { "The link may be out of date. Take the quiz to get a fresh one." }
                button {
                    r#type: "button",
                    class: "button button--primary",
                    onclick: move |_| retake(&session),
                    "Take the quiz"
                }
            }
        };
    };

    rsx! {
        section { class: "page page-result",
            ResultStage { tag, result, participant }
        }
    }
}

#[component]
fn ResultStage(
    tag: String,
    result: ResultCategory,
    #[props(!optional)] participant: Option<u64>,
) -> Element {
    let session = use_quiz_session();
    let mut document = use_signal(|| build_result_card(&result, participant));
    let video = result.video_id();
    let song = result.song.clone();

    // Props change without a remount when navigating between results.
    use_effect(use_reactive!(|(result, participant)| {
        document.set(build_result_card(&result, participant));
    }));

    let markup = document.read().screen_markup();

    rsx! {
        div {
            class: "result-card-host",
            onanimationend: move |_| document.with_mut(settle_card),
            dangerous_inner_html: "{markup}",
        }

        if let Some(id) = video {
            div { class: "result-song",
                iframe {
                    class: "result-song__player",
                    src: "https://www.youtube.com/embed/{id}",
                    title: "{song}",
                    allow: "encrypted-media",
                }
            }
        }

        ResultExportPanel { document, tag: tag.clone() }

        div { class: "result-actions",
            button {
                r#type: "button",
                class: "button button--ghost",
                onclick: move |_| retake(&session),
                "Take it again"
            }
        }
    }
}
