//! Text measurement for laying out the result card.
//!
//! The card is laid out before any font is loaded (and the same layout must
//! hold on screen and in the rasterizer), so measurements are heuristic:
//! per-glyph advance ratios tuned for the bundled DejaVu Sans faces.
//! Wide scripts (Hangul, CJK, emoji) count as a full em.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    SemiBold,
    Bold,
}

impl FontWeight {
    /// Numeric CSS weight.
    pub fn css(self) -> u16 {
        match self {
            FontWeight::Regular => 400,
            FontWeight::SemiBold => 600,
            FontWeight::Bold => 700,
        }
    }

    /// Only regular and bold faces ship, so 600 renders with the bold face.
    fn width_factor(self) -> f32 {
        match self {
            FontWeight::Regular => 1.0,
            FontWeight::SemiBold | FontWeight::Bold => 1.12,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    /// Vertical distance between consecutive baselines.
    pub line_h: f32,
    /// Ascender above the baseline.
    pub asc: f32,
}

pub fn metrics(size_px: f32) -> TextMetrics {
    let line_h = (size_px * 1.4).round();
    let asc = (size_px * 0.92).round();
    TextMetrics { line_h, asc }
}

fn glyph_ratio(ch: char) -> f32 {
    match ch {
        ' ' => 0.32,
        'i' | 'l' | 'j' | '\'' | '.' | ',' | ':' | ';' | '!' | '|' => 0.30,
        'f' | 't' | 'r' | 'I' | '(' | ')' | '-' => 0.40,
        'm' | 'w' | 'M' | 'W' => 0.92,
        c if c.is_ascii_uppercase() || c.is_ascii_digit() => 0.70,
        c if c.is_ascii() => 0.62,
        c if c.len_utf8() >= 3 => 1.0,
        _ => 0.6,
    }
}

/// Approximate advance width of `text` in pixels.
pub fn advance_width(text: &str, size_px: f32, weight: FontWeight) -> f32 {
    text.chars().map(glyph_ratio).sum::<f32>() * size_px * weight.width_factor()
}

/// Greedy word wrap. Words wider than a whole line are split per character.
pub fn wrap_text(text: &str, max_width: f32, size_px: f32, weight: FontWeight) -> Vec<String> {
    let fits = |line: &str| advance_width(line, size_px, weight) <= max_width;
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if fits(&candidate) {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if fits(word) {
            current = word.to_string();
            continue;
        }
        for ch in word.chars() {
            current.push(ch);
            if !fits(&current) && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::replace(&mut current, ch.to_string()));
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
