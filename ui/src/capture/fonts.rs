//! Typefaces bundled with the binary.
//!
//! Exports must not depend on what the host has installed: usvg silently
//! drops `<text>` whose family it cannot resolve, and wasm builds see no
//! system fonts at all.

pub const FAMILY: &str = "DejaVu Sans";

const REGULAR: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
const BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// Registers the bundled faces and routes the generic `sans-serif` to them.
pub fn load_into(db: &mut usvg::fontdb::Database) {
    db.load_font_data(REGULAR.to_vec());
    db.load_font_data(BOLD.to_vec());
    db.set_sans_serif_family(FAMILY);
}
