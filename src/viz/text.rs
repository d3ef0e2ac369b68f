//! Text measurement. Label layout needs rendered widths; this module is the
//! seam between the layout engine and whatever surface draws the text.

/// Measures rendered text widths in pixels.
pub trait TextMetrics {
    fn text_width(&self, text: &str, font_px: f64) -> f64;
}

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring).
pub fn estimate_text_width_px(text: &str, font_px: f64) -> f64 {
    ((text.chars().count() as f64) * font_px * 0.60).ceil()
}

/// Character-count based metrics, used for SVG export and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedMetrics;

impl TextMetrics for EstimatedMetrics {
    fn text_width(&self, text: &str, font_px: f64) -> f64 {
        estimate_text_width_px(text, font_px)
    }
}

/// Fixed width per label regardless of text; handy for deterministic layouts.
#[derive(Debug, Clone, Copy)]
pub struct FixedMetrics(pub f64);

impl TextMetrics for FixedMetrics {
    fn text_width(&self, _text: &str, _font_px: f64) -> f64 {
        self.0
    }
}
