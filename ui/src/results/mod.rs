//! The result card and its export panel.

mod art;
pub use art::result_art;

pub mod card;
pub use card::{build_result_card, settle_card, CARD_REGION_ID, MUSIC_CONTROLLER_ID};

mod export;
pub use export::{capture_card, gif_artifact, png_artifact, ResultExportPanel};

mod fonts;

mod utils;
pub(crate) use utils::*;
