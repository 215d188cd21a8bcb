//! Still captures of a document region.
//!
//! [`SnapshotRenderer::capture`] hides transient controls, settles any
//! running transition inside the region, rasterizes it, and puts every
//! element back exactly as it was, whether rasterizing succeeds, fails, or
//! panics.

use tiny_skia::{Color, Pixmap, Transform};

use super::dom::{Display, Document, Element, Motion, Shape};
use super::{fonts, CaptureError, ExportError};

/// Region to capture plus the element ids to keep out of the picture.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRegion {
    pub id: String,
    pub suppress: Vec<String>,
}

impl CaptureRegion {
    pub fn new(id: impl Into<String>, suppress: impl IntoIterator<Item = String>) -> Self {
        Self {
            id: id.into(),
            suppress: suppress.into_iter().collect(),
        }
    }
}

/// Premultiplied RGBA pixels plus the scale they were captured at.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pixmap: Pixmap,
    scale: f32,
}

impl Raster {
    pub fn new(pixmap: Pixmap, scale: f32) -> Self {
        Self { pixmap, scale }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn to_png(&self) -> Result<Vec<u8>, ExportError> {
        let mut buffer = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buffer, self.width(), self.height());
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            encoder
                .write_header()
                .map_err(|err| ExportError::Encode(err.to_string()))?
                .write_image_data(&straight_rgba(&self.pixmap))
                .map_err(|err| ExportError::Encode(err.to_string()))?;
        }
        Ok(buffer)
    }
}

/// Pixel data with alpha un-premultiplied, as image encoders expect.
pub(crate) fn straight_rgba(pixmap: &Pixmap) -> Vec<u8> {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        data.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }
    data
}

/// Turns a document region into pixels.
pub trait Rasterizer {
    fn rasterize(
        &self,
        document: &Document,
        region_id: &str,
        scale: f32,
    ) -> Result<Raster, CaptureError>;
}

/// Renders region markup with `usvg` + `resvg`, using the bundled fonts.
pub struct SvgRasterizer {
    options: usvg::Options<'static>,
    background: Option<Color>,
}

impl SvgRasterizer {
    pub fn new(background: Option<&str>) -> Self {
        let mut options = usvg::Options::default();
        fonts::load_into(options.fontdb_mut());

        let background = background.and_then(|hex| {
            let parsed = parse_hex_color(hex);
            if parsed.is_none() {
                tracing::warn!(hex, "ignoring unparseable capture background");
            }
            parsed
        });

        Self {
            options,
            background,
        }
    }
}

impl Rasterizer for SvgRasterizer {
    fn rasterize(
        &self,
        document: &Document,
        region_id: &str,
        scale: f32,
    ) -> Result<Raster, CaptureError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(CaptureError::InvalidScale(scale));
        }
        let region = document
            .find(region_id)
            .ok_or_else(|| CaptureError::RegionNotFound(region_id.to_string()))?;
        if !region.has_drawable() {
            return Err(CaptureError::EmptyRegion(region_id.to_string()));
        }
        check_images(region)?;
        let markup = document
            .region_markup(region_id)
            .ok_or_else(|| CaptureError::RegionNotFound(region_id.to_string()))?;

        let tree = usvg::Tree::from_str(&markup, &self.options)
            .map_err(|err| CaptureError::Markup(err.to_string()))?;
        let size = tree.size();
        let width = (size.width() * scale).ceil() as u32;
        let height = (size.height() * scale).ceil() as u32;
        let mut pixmap =
            Pixmap::new(width, height).ok_or(CaptureError::Surface { width, height })?;

        if let Some(background) = self.background {
            pixmap.fill(background);
        }
        resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

        Ok(Raster::new(pixmap, scale))
    }
}

/// resvg skips images it cannot decode, so a broken one is caught up front
/// rather than leaving a hole in the capture.
fn check_images(region: &Element) -> Result<(), CaptureError> {
    for element in region.visible_images() {
        let Shape::Image { href, data, .. } = &element.shape else {
            continue;
        };
        let decodes = data.is_some_and(|bytes| png::Decoder::new(bytes).read_info().is_ok());
        if !decodes {
            return Err(CaptureError::ImageUnavailable(href.clone()));
        }
    }
    Ok(())
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some(Color::from_rgba8(
        channel(0..2)?,
        channel(2..4)?,
        channel(4..6)?,
        255,
    ))
}

pub struct SnapshotRenderer<R> {
    rasterizer: R,
    scale: f32,
}

impl<R: Rasterizer> SnapshotRenderer<R> {
    pub fn new(rasterizer: R, scale: f32) -> Self {
        Self { rasterizer, scale }
    }

    pub fn capture(
        &self,
        document: &mut Document,
        region: &CaptureRegion,
    ) -> Result<Raster, CaptureError> {
        tracing::debug!(region = %region.id, scale = self.scale, "capturing snapshot");
        let scope = CaptureScope::enter(document, region)?;
        let result = self
            .rasterizer
            .rasterize(scope.document(), &region.id, self.scale);
        drop(scope);

        if let Err(err) = &result {
            tracing::warn!(region = %region.id, error = %err, "snapshot capture failed");
        }
        result
    }
}

/// Temporary capture state applied to a document; undone on drop.
struct CaptureScope<'a> {
    document: &'a mut Document,
    region_id: String,
    hidden: Vec<(String, Display)>,
    motions: Vec<Motion>,
}

impl<'a> CaptureScope<'a> {
    fn enter(document: &'a mut Document, region: &CaptureRegion) -> Result<Self, CaptureError> {
        let root = document
            .find_mut(&region.id)
            .ok_or_else(|| CaptureError::RegionNotFound(region.id.clone()))?;

        // Only controls inside the region are hidden.
        let mut hidden = Vec::with_capacity(region.suppress.len());
        for id in &region.suppress {
            match root.find_mut(id) {
                Some(element) => {
                    hidden.push((id.clone(), element.display));
                    element.display = Display::Hidden;
                }
                None => tracing::debug!(id = %id, "suppressed element not in capture region"),
            }
        }

        let mut motions = Vec::new();
        root.walk_mut(&mut |element| {
            motions.push(std::mem::replace(&mut element.motion, Motion::settled()));
        });

        Ok(Self {
            document,
            region_id: region.id.clone(),
            hidden,
            motions,
        })
    }

    fn document(&self) -> &Document {
        self.document
    }
}

impl Drop for CaptureScope<'_> {
    fn drop(&mut self) {
        let Some(root) = self.document.find_mut(&self.region_id) else {
            return;
        };

        let mut saved = std::mem::take(&mut self.motions).into_iter();
        root.walk_mut(&mut |element| {
            if let Some(motion) = saved.next() {
                element.motion = motion;
            }
        });

        // Reverse order so a repeated id ends on its first recorded state.
        for (id, display) in self.hidden.drain(..).rev() {
            if let Some(element) = root.find_mut(&id) {
                element.display = display;
            }
        }
    }
}
