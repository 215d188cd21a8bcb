use dioxus::prelude::*;

use crate::tasks::quiz::QuizView;

#[component]
pub fn Question() -> Element {
    rsx! {
        section { class: "page page-quiz",
            QuizView {}
        }
    }
}
