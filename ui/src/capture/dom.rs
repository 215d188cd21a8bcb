//! In-memory element tree for capturable views.
//!
//! The same tree is serialized twice: as inline SVG for the screen (motion
//! left to CSS) and as standalone SVG for rasterization (motion written into
//! `transform`/`opacity` so a half-finished transition would be visible).

use std::fmt::Write as _;

use base64::Engine as _;

use super::fonts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Shown,
    Hidden,
}

/// Transition state of an element as last reported by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Motion {
    pub translate_y: f32,
    pub opacity: f32,
    pub animation: Option<String>,
}

impl Motion {
    pub fn settled() -> Self {
        Self {
            translate_y: 0.0,
            opacity: 1.0,
            animation: None,
        }
    }

    /// Start of an entrance animation: shifted down and fully transparent.
    pub fn entering(animation: &str, offset_y: f32) -> Self {
        Self {
            translate_y: offset_y,
            opacity: 0.0,
            animation: Some(animation.to_string()),
        }
    }

    pub fn is_settled(&self) -> bool {
        self.translate_y == 0.0 && self.opacity >= 1.0 && self.animation.is_none()
    }
}

impl Default for Motion {
    fn default() -> Self {
        Self::settled()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Group,
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        fill: String,
    },
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        fill: String,
    },
    Text {
        x: f32,
        y: f32,
        size: f32,
        weight: u16,
        fill: String,
        content: String,
    },
    /// Raster artwork. `data` holds the PNG bytes when the artwork is bundled;
    /// without it only `href` is known and the image cannot be captured.
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        href: String,
        data: Option<&'static [u8]>,
    },
    /// Path data drawn at `(x, y)` scaled by `scale`.
    Path {
        d: String,
        fill: String,
        x: f32,
        y: f32,
        scale: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: Option<String>,
    pub shape: Shape,
    pub display: Display,
    pub motion: Motion,
    pub children: Vec<Element>,
}

impl Element {
    fn new(shape: Shape) -> Self {
        Self {
            id: None,
            shape,
            display: Display::Shown,
            motion: Motion::settled(),
            children: Vec::new(),
        }
    }

    pub fn group() -> Self {
        Self::new(Shape::Group)
    }

    pub fn rect(x: f32, y: f32, width: f32, height: f32, radius: f32, fill: &str) -> Self {
        Self::new(Shape::Rect {
            x,
            y,
            width,
            height,
            radius,
            fill: fill.to_string(),
        })
    }

    pub fn circle(cx: f32, cy: f32, r: f32, fill: &str) -> Self {
        Self::new(Shape::Circle {
            cx,
            cy,
            r,
            fill: fill.to_string(),
        })
    }

    pub fn text(x: f32, y: f32, size: f32, weight: u16, fill: &str, content: &str) -> Self {
        Self::new(Shape::Text {
            x,
            y,
            size,
            weight,
            fill: fill.to_string(),
            content: content.to_string(),
        })
    }

    pub fn image(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        href: &str,
        data: Option<&'static [u8]>,
    ) -> Self {
        Self::new(Shape::Image {
            x,
            y,
            width,
            height,
            href: href.to_string(),
            data,
        })
    }

    pub fn path(d: &str, fill: &str, x: f32, y: f32, scale: f32) -> Self {
        Self::new(Shape::Path {
            d: d.to_string(),
            fill: fill.to_string(),
            x,
            y,
            scale,
        })
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = motion;
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn find(&self, id: &str) -> Option<&Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Whether anything in this subtree would paint.
    pub fn has_drawable(&self) -> bool {
        if self.display == Display::Hidden {
            return false;
        }
        !matches!(self.shape, Shape::Group) || self.children.iter().any(Element::has_drawable)
    }

    /// Images that would paint, in document order.
    pub fn visible_images(&self) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_images(&mut found);
        found
    }

    fn collect_images<'a>(&'a self, found: &mut Vec<&'a Element>) {
        if self.display == Display::Hidden {
            return;
        }
        if matches!(self.shape, Shape::Image { .. }) {
            found.push(self);
        }
        for child in &self.children {
            child.collect_images(found);
        }
    }

    /// Depth-first walk over this subtree.
    pub fn walk_mut(&mut self, visit: &mut dyn FnMut(&mut Element)) {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }

    fn write_svg(&self, out: &mut String, with_motion: bool) {
        let mut attrs = String::new();
        if let Some(id) = &self.id {
            let _ = write!(attrs, " id=\"{}\"", escape_xml(id));
        }
        if self.display == Display::Hidden {
            attrs.push_str(" display=\"none\"");
        }
        if let Some(animation) = &self.motion.animation {
            let _ = write!(attrs, " class=\"anim-{}\"", escape_xml(animation));
        }
        if with_motion {
            if self.motion.translate_y != 0.0 {
                let _ = write!(attrs, " transform=\"translate(0 {})\"", self.motion.translate_y);
            }
            if self.motion.opacity < 1.0 {
                let _ = write!(attrs, " opacity=\"{}\"", self.motion.opacity.max(0.0));
            }
        }

        match &self.shape {
            Shape::Group => {
                let _ = write!(out, "<g{attrs}>");
                for child in &self.children {
                    child.write_svg(out, with_motion);
                }
                out.push_str("</g>");
                return;
            }
            Shape::Rect {
                x,
                y,
                width,
                height,
                radius,
                fill,
            } => {
                let _ = write!(
                    out,
                    "<rect{attrs} x=\"{x}\" y=\"{y}\" width=\"{width}\" height=\"{height}\" rx=\"{radius}\" fill=\"{}\"/>",
                    escape_xml(fill)
                );
            }
            Shape::Circle { cx, cy, r, fill } => {
                let _ = write!(
                    out,
                    "<circle{attrs} cx=\"{cx}\" cy=\"{cy}\" r=\"{r}\" fill=\"{}\"/>",
                    escape_xml(fill)
                );
            }
            Shape::Text {
                x,
                y,
                size,
                weight,
                fill,
                content,
            } => {
                let _ = write!(
                    out,
                    "<text{attrs} x=\"{x}\" y=\"{y}\" font-family=\"{}, sans-serif\" font-size=\"{size}\" font-weight=\"{weight}\" fill=\"{}\" text-anchor=\"middle\">{}</text>",
                    fonts::FAMILY,
                    escape_xml(fill),
                    escape_xml(content)
                );
            }
            Shape::Image {
                x,
                y,
                width,
                height,
                href,
                data,
            } => {
                let source = match data {
                    Some(bytes) => format!(
                        "data:image/png;base64,{}",
                        base64::engine::general_purpose::STANDARD.encode(bytes)
                    ),
                    None => href.clone(),
                };
                let _ = write!(
                    out,
                    "<image{attrs} x=\"{x}\" y=\"{y}\" width=\"{width}\" height=\"{height}\" xlink:href=\"{}\"/>",
                    escape_xml(&source)
                );
            }
            Shape::Path {
                d,
                fill,
                x,
                y,
                scale,
            } => {
                let _ = write!(
                    out,
                    "<g transform=\"translate({x} {y}) scale({scale})\"><path{attrs} d=\"{}\" fill=\"{}\"/></g>",
                    escape_xml(d),
                    escape_xml(fill)
                );
            }
        }

        // Non-group shapes may still carry decorations drawn on top.
        for child in &self.children {
            child.write_svg(out, with_motion);
        }
    }
}

/// A capturable view: a fixed-size canvas holding one element tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub width: f32,
    pub height: f32,
    pub root: Element,
}

impl Document {
    pub fn new(width: f32, height: f32, root: Element) -> Self {
        Self {
            width,
            height,
            root,
        }
    }

    pub fn find(&self, id: &str) -> Option<&Element> {
        self.root.find(id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.root.find_mut(id)
    }

    /// Inline markup for the screen; transitions are driven by CSS classes.
    pub fn screen_markup(&self) -> String {
        let mut out = self.open_svg();
        self.root.write_svg(&mut out, false);
        out.push_str("</svg>");
        out
    }

    /// Standalone markup of the subtree `region_id`, motion included.
    pub fn region_markup(&self, region_id: &str) -> Option<String> {
        let region = self.find(region_id)?;
        let mut out = self.open_svg();
        region.write_svg(&mut out, true);
        out.push_str("</svg>");
        Some(out)
    }

    fn open_svg(&self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = self.width,
            h = self.height
        )
    }
}

fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
