#![cfg(test)]
/*!
Theme selector lint for the desktop build.

The quiz, result card and export panel reference these classes from Rust
markup. A substring check is enough to catch a selector that was renamed on
one side only.

If you rename a selector, update the component markup and REQUIRED_SELECTORS
together.
*/

const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

const REQUIRED_SELECTORS: &[&str] = &[
    // Global / layout
    ":root",
    "body {",
    ".shell {",
    ".page {",
    ".page-error",
    // Buttons
    ".button {",
    ".button--primary",
    ".button--accent",
    ".button--ghost",
    // Navbar
    ".navbar__inner",
    ".navbar__brand-mark",
    ".navbar__link",
    // Quiz
    ".quiz__progress-label",
    ".quiz__bar-fill",
    ".quiz__prompt",
    ".quiz__choices",
    ".quiz__choice",
    ".quiz--done",
    // Result
    ".result-card-host",
    ".anim-slide-up",
    "@keyframes slide-up",
    ".result-song__player",
    ".result-actions",
    // Export panel
    ".result-export__actions",
    ".result-export__meta--success",
    ".result-export__meta--error",
    // Responsive block
    "@media (max-width: 720px)",
];

#[test]
fn unified_theme_contains_required_selectors() {
    let missing: Vec<&str> = REQUIRED_SELECTORS
        .iter()
        .copied()
        .filter(|sel| !THEME_CSS.contains(sel))
        .collect();

    if !missing.is_empty() {
        panic!(
            "Missing {} required CSS selectors/tokens in unified theme:\n{}",
            missing.len(),
            missing.join("\n")
        );
    }
}

#[test]
fn unified_theme_not_trivially_empty() {
    let non_ws_len = THEME_CSS.chars().filter(|c| !c.is_whitespace()).count();
    assert!(
        non_ws_len > 3_000,
        "Embedded theme appears unexpectedly small ({non_ws_len} non-whitespace chars)"
    );
}

#[test]
fn reduced_motion_disables_card_entrance() {
    let block = THEME_CSS
        .split("@media (prefers-reduced-motion: reduce)")
        .nth(1)
        .expect("reduced-motion block present");
    assert!(block.contains(".anim-slide-up"));
    assert!(block.contains("animation: none"));
}
