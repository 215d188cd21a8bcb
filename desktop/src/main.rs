#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

#[cfg(feature = "desktop")]
use std::path::PathBuf;

#[cfg(feature = "desktop")]
use dioxus::desktop::{tao::window::WindowBuilder, Config, LogicalSize};
use dioxus::prelude::*;

use ui::components::{register_nav, AppNavbar, NavBuilder};
use ui::views::{Home, Outcome, Question};
use ui::{CounterWiring, QuizProvider};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(DesktopShell)]
    #[route("/")]
    Home {},
    #[route("/question")]
    Question {},
    #[route("/result/:tag")]
    Outcome { tag: String },
}

const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

#[cfg(feature = "desktop")]
fn main() {
    let resource_dir = resolve_resource_dir();

    LaunchBuilder::desktop()
        .with_cfg(
            Config::new()
                .with_window(
                    WindowBuilder::new()
                        .with_title(format!("Yuletype – v{}", env!("CARGO_PKG_VERSION")))
                        .with_inner_size(LogicalSize::new(480.0, 860.0)),
                )
                .with_resource_directory(resource_dir),
        )
        .launch(App);
}

#[cfg(all(feature = "server", not(feature = "desktop")))]
fn main() {
    LaunchBuilder::server().launch(App);
}

fn nav_home(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Home {}, "{label}" })
}
fn to_question() {
    navigator().push(Route::Question {});
}
fn to_outcome(tag: &str) {
    navigator().push(Route::Outcome { tag: tag.to_string() });
}

#[component]
fn App() -> Element {
    register_nav(NavBuilder {
        home: nav_home,
        to_question,
        to_outcome,
    });

    rsx! {
        // Theme is embedded; desktop builds ship no stylesheet files.
        document::Style { "{MAIN_CSS_INLINE}" }

        QuizProvider { wiring: CounterWiring::InProcess,
            Router::<Route> {}
        }
    }
}

#[cfg(feature = "desktop")]
fn resolve_resource_dir() -> PathBuf {
    #[cfg(debug_assertions)]
    {
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"))
    }

    #[cfg(not(debug_assertions))]
    {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("assets")))
            .unwrap_or_else(|| PathBuf::from("assets"))
    }
}

/// Shared navbar around the desktop-specific `Route` outlet.
#[component]
fn DesktopShell() -> Element {
    rsx! {
        AppNavbar {}
        main { class: "shell",
            Outlet::<Route> {}
        }
    }
}
