//! Layout of the shareable result card.
//!
//! The card is one [`Document`] used both for the on-screen view and for
//! exports, so what people download is exactly what they saw.

use crate::capture::{Document, Element, Motion};
use crate::core::content::ResultCategory;
use crate::core::format::format_participant;

use super::art::result_art;
use super::fonts::{metrics, wrap_text, FontWeight};

pub const CARD_REGION_ID: &str = "result-card";
pub const MUSIC_CONTROLLER_ID: &str = "music-controller";
/// Animation class applied while the card slides into view.
pub const ENTRANCE_ANIMATION: &str = "slide-up";

const WIDTH: f32 = 360.0;
const PADDING: f32 = 24.0;
const INNER: f32 = WIDTH - PADDING * 2.0;

const CARD_BG: &str = "#fffaf2";
const INK: &str = "#2d3e50";
const MUTED: &str = "#7a8794";
const ACCENT: &str = "#c0392b";
const PINE: &str = "#1e6f50";
const ART_SIZE: f32 = 120.0;
const BOX_BG: &str = "#f3ebe0";

const PLAY_PATH: &str = "M-0.4 -0.6 L0.7 0 L-0.4 0.6 Z";

/// Vertical cursor that stacks text blocks.
struct Column {
    y: f32,
}

impl Column {
    fn text(&mut self, parent: &mut Element, content: &str, size: f32, weight: FontWeight, fill: &str) {
        let m = metrics(size);
        parent.push(Element::text(
            WIDTH / 2.0,
            self.y + m.asc,
            size,
            weight.css(),
            fill,
            content,
        ));
        self.y += m.line_h;
    }

    fn wrapped(
        &mut self,
        parent: &mut Element,
        content: &str,
        size: f32,
        weight: FontWeight,
        fill: &str,
        width: f32,
    ) {
        for line in wrap_text(content, width, size, weight) {
            self.text(parent, &line, size, weight, fill);
        }
    }

    fn gap(&mut self, amount: f32) {
        self.y += amount;
    }
}

pub fn build_result_card(result: &ResultCategory, participant: Option<u64>) -> Document {
    let mut content = Element::group();
    let mut column = Column { y: PADDING };

    column.text(&mut content, "Your Christmas type is", 13.0, FontWeight::Regular, MUTED);
    column.gap(4.0);
    column.wrapped(&mut content, &result.name, 26.0, FontWeight::Bold, INK, INNER);
    column.text(&mut content, &result.keyword, 14.0, FontWeight::SemiBold, ACCENT);
    column.gap(12.0);

    content.push(Element::image(
        (WIDTH - ART_SIZE) / 2.0,
        column.y,
        ART_SIZE,
        ART_SIZE,
        &result.image,
        result_art(&result.image),
    ));
    column.gap(ART_SIZE + 16.0);

    column.wrapped(
        &mut content,
        &format!("\u{201c}{}\u{201d}", result.description),
        14.0,
        FontWeight::Regular,
        INK,
        INNER,
    );
    column.gap(14.0);

    let recommend_top = column.y;
    let mut recommend = Element::group().with_id("recommend");
    let mut inner = Column { y: recommend_top + 12.0 };
    inner.text(&mut recommend, "Try this season", 13.0, FontWeight::Bold, PINE);
    for item in &result.recommend {
        inner.wrapped(
            &mut recommend,
            &format!("\u{2022} {item}"),
            13.0,
            FontWeight::Regular,
            INK,
            INNER - 24.0,
        );
    }
    inner.gap(10.0);
    let mut recommend_box = Element::rect(
        PADDING,
        recommend_top,
        INNER,
        inner.y - recommend_top,
        12.0,
        BOX_BG,
    );
    recommend_box.push(recommend);
    content.push(recommend_box);
    column.y = inner.y + 12.0;

    let song_top = column.y;
    let mut song = Element::group().with_id("song");
    let mut inner = Column { y: song_top + 12.0 };
    inner.text(&mut song, "Soundtrack", 12.0, FontWeight::Bold, PINE);
    inner.wrapped(&mut song, &result.song, 13.0, FontWeight::SemiBold, INK, INNER - 72.0);
    inner.gap(10.0);
    let song_height = (inner.y - song_top).max(56.0);
    if result.video_id().is_some() {
        song.push(music_controller(WIDTH - PADDING - 28.0, song_top + song_height / 2.0));
    }
    let mut song_box = Element::rect(PADDING, song_top, INNER, song_height, 12.0, BOX_BG);
    song_box.push(song);
    content.push(song_box);
    column.y = song_top + song_height + 14.0;

    if let Some(ordinal) = participant {
        column.text(
            &mut content,
            &format!("You are participant {}", format_participant(ordinal)),
            13.0,
            FontWeight::SemiBold,
            MUTED,
        );
    }
    column.gap(PADDING - 8.0);

    let height = column.y.ceil();
    let card = Element::group()
        .with_id(CARD_REGION_ID)
        .with_motion(Motion::entering(ENTRANCE_ANIMATION, 30.0))
        .with_child(Element::rect(0.0, 0.0, WIDTH, height, 20.0, CARD_BG))
        .with_child(content);

    Document::new(WIDTH, height, Element::group().with_child(card))
}

/// Playback button for the linked video; hidden in exports.
fn music_controller(cx: f32, cy: f32) -> Element {
    Element::group()
        .with_id(MUSIC_CONTROLLER_ID)
        .with_child(Element::circle(cx, cy, 18.0, ACCENT))
        .with_child(Element::path(PLAY_PATH, "#ffffff", cx, cy, 12.0))
}

/// Record that the entrance animation has finished on screen.
pub fn settle_card(document: &mut Document) {
    if let Some(card) = document.find_mut(CARD_REGION_ID) {
        card.motion = Motion::settled();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::dom::Shape;
    use crate::capture::{CaptureError, CaptureRegion, Display, SnapshotRenderer, SvgRasterizer};

    fn result() -> ResultCategory {
        ResultCategory {
            name: "The Cocoa Keeper".into(),
            keyword: "Cozy & gentle".into(),
            description: "Blankets, candles and a mug that never goes cold. You make the holidays feel safe and slow.".into(),
            recommend: vec![
                "Bake gingerbread".into(),
                "Watch a classic Christmas film double feature with everyone".into(),
            ],
            song: "Frank Sinatra - Have Yourself a Merry Little Christmas".into(),
            song_url: Some("https://youtu.be/Vvw8-5v2wKo".into()),
            image: "/assets/results/homebody.png".into(),
        }
    }

    #[test]
    fn card_has_capture_region_and_music_controller() {
        let doc = build_result_card(&result(), None);
        let card = doc.find(CARD_REGION_ID).unwrap();
        assert_eq!(card.motion, Motion::entering(ENTRANCE_ANIMATION, 30.0));
        assert_eq!(
            doc.find(MUSIC_CONTROLLER_ID).unwrap().display,
            Display::Shown
        );
        assert!(doc.height > 300.0);
    }

    #[test]
    fn music_controller_needs_a_video() {
        let mut silent = result();
        silent.song_url = None;
        let doc = build_result_card(&silent, None);
        assert!(doc.find(MUSIC_CONTROLLER_ID).is_none());
        assert!(doc.screen_markup().contains("Frank Sinatra"));
    }

    #[test]
    fn card_shows_bundled_result_art() {
        let doc = build_result_card(&result(), None);
        let images = doc.find(CARD_REGION_ID).unwrap().visible_images();
        assert_eq!(images.len(), 1);
        assert!(matches!(
            &images[0].shape,
            Shape::Image { href, data: Some(_), .. } if href == "/assets/results/homebody.png"
        ));
    }

    #[test]
    fn unknown_art_fails_capture() {
        let mut missing = result();
        missing.image = "/assets/results/elsewhere.png".into();
        let mut doc = build_result_card(&missing, None);

        let rasterizer = SvgRasterizer::new(None);
        let err = SnapshotRenderer::new(rasterizer, 0.5)
            .capture(&mut doc, &CaptureRegion::new(CARD_REGION_ID, Vec::new()))
            .unwrap_err();
        assert_eq!(
            err,
            CaptureError::ImageUnavailable("/assets/results/elsewhere.png".into())
        );
    }

    #[test]
    fn participant_line_only_when_counted() {
        let without = build_result_card(&result(), None);
        let with = build_result_card(&result(), Some(1234));

        assert!(!without.screen_markup().contains("participant"));
        assert!(with.screen_markup().contains("You are participant #1,234"));
        assert!(with.height > without.height);
    }

    #[test]
    fn settle_card_clears_entrance_motion() {
        let mut doc = build_result_card(&result(), Some(3));
        settle_card(&mut doc);
        assert!(doc.find(CARD_REGION_ID).unwrap().motion.is_settled());
    }

    #[test]
    fn text_is_escaped_in_markup() {
        let markup = build_result_card(&result(), None).screen_markup();
        assert!(markup.contains("Cozy &amp; gentle"));
    }
}
