//! Application shell navbar plus the route hooks shared views navigate with.
//!
//! `ui` cannot name the launchers' `Route` enums, so each launcher registers
//! a [`NavBuilder`] of plain functions before rendering its router.

use dioxus::prelude::*;
use once_cell::sync::OnceCell;

pub struct NavBuilder {
    /// Link to the landing page wrapping `label`.
    pub home: fn(label: &str) -> Element,
    pub to_question: fn(),
    pub to_outcome: fn(tag: &str),
}

static NAV_BUILDER: OnceCell<NavBuilder> = OnceCell::new();

/// First registration wins; later calls (re-renders) are ignored.
pub fn register_nav(builder: NavBuilder) {
    let _ = NAV_BUILDER.set(builder);
}

fn with_nav(action: impl FnOnce(&NavBuilder)) {
    match NAV_BUILDER.get() {
        Some(builder) => action(builder),
        None => tracing::warn!("navigation requested before routes were registered"),
    }
}

pub fn go_to_question() {
    with_nav(|nav| (nav.to_question)());
}

pub fn go_to_outcome(tag: &str) {
    with_nav(|nav| (nav.to_outcome)(tag));
}

#[component]
pub fn AppNavbar() -> Element {
    let home = NAV_BUILDER.get().map(|builder| (builder.home)("Home"));

    rsx! {
        header { id: "navbar", class: "navbar",
            div { class: "navbar__inner",
                div { class: "navbar__brand",
                    span { class: "navbar__brand-link",
                        span { class: "navbar__brand-spark", aria_hidden: "true" }
                        span { class: "navbar__brand-mark", "Yuletype" }
                    }
                    span { class: "navbar__brand-subtitle", "Which Christmas are you?" }
                }
                if let Some(home) = home {
                    nav { class: "navbar__links", {home} }
                }
            }
        }
    }
}
