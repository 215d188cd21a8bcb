use dioxus::prelude::*;

use ui::components::{register_nav, AppNavbar, NavBuilder};
use ui::views::{Home, Outcome, Question};
use ui::{CounterWiring, QuizProvider};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(WebShell)]
    #[route("/")]
    Home {},
    #[route("/question")]
    Question {},
    #[route("/result/:tag")]
    Outcome { tag: String },
}

const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

fn nav_home(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Home {},
        "{label}"
    })
}
fn to_question() {
    navigator().push(Route::Question {});
}
fn to_outcome(tag: &str) {
    navigator().push(Route::Outcome {
        tag: tag.to_string(),
    });
}

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    register_nav(NavBuilder {
        home: nav_home,
        to_question,
        to_outcome,
    });

    rsx! {
        document::Style { "{THEME_CSS}" }

        QuizProvider { wiring: CounterWiring::Remote,
            Router::<Route> {}
        }
    }
}

/// Shared navbar around the web-specific `Route` outlet.
#[component]
fn WebShell() -> Element {
    rsx! {
        AppNavbar {}
        main { class: "shell",
            Outlet::<Route> {}
        }
    }
}
