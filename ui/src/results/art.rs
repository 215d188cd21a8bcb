//! Artwork bundled for each result, keyed by the path the content refers to.

const ART: &[(&str, &[u8])] = &[
    ("/assets/results/host.png", include_bytes!("../../assets/results/host.png")),
    ("/assets/results/homebody.png", include_bytes!("../../assets/results/homebody.png")),
    ("/assets/results/planner.png", include_bytes!("../../assets/results/planner.png")),
    ("/assets/results/wanderer.png", include_bytes!("../../assets/results/wanderer.png")),
];

/// PNG bytes for `path`, if that artwork ships with the app.
pub fn result_art(path: &str) -> Option<&'static [u8]> {
    let art = ART.iter().find(|(known, _)| *known == path).map(|(_, bytes)| *bytes);
    if art.is_none() {
        tracing::warn!(path, "result artwork is not bundled");
    }
    art
}
