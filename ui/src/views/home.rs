use dioxus::prelude::*;

use crate::components::nav;
use crate::core::format::format_participant;
use crate::session::use_quiz_session;
use crate::tasks::quiz::AttemptStart;

#[component]
pub fn Home() -> Element {
    let session = use_quiz_session();
    let total = session.content.len();
    let counted = (session.participant)().map(format_participant);

    let start = {
        let session = session.clone();
        move |_| {
            let mut engine = session.engine;
            let mut participant = session.participant;
            if engine.with_mut(|engine| engine.begin_attempt(&session.gate)) == AttemptStart::Fresh {
                participant.set(session.gate.ordinal());
            }
            nav::go_to_question();
        }
    };

    rsx! {
        section { class: "page page-home",
            h1 { "Which Christmas are you?" }
            p { "Answer {total} quick questions and find the holiday spirit that fits you best." }
            p { class: "page-home__cta",
                button {
                    r#type: "button",
                    class: "button button--primary",
                    onclick: start,
                    "Start the quiz"
                }
            }
            if let Some(number) = counted {
                p { class: "page-home__counted", "You already took part as participant {number}." }
            }
        }
    }
}
