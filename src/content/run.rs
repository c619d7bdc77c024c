//! The text run: the unit the content interpreter emits and the layout
//! pipeline consumes.

/// A single run of text positioned in page space.
///
/// Exactly one `TextRun` is emitted per glyph-showing operator (`Tj`, `'`,
/// `"`), except `TJ`, which accumulates its whole array into a single merged
/// run. Coordinates are in page space: `x` grows rightward, `y` grows
/// downward from the top of the page (`y = page_height - text_space_y`), so
/// runs can be sorted top-to-bottom, left-to-right without a sign flip.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Left edge of the run, in points from the page's left edge.
    pub x: f32,
    /// Top edge of the run, in points from the page's top edge.
    pub y: f32,
    /// Estimated width of the run, in points.
    pub width: f32,
    /// Height of the run, in points (approximately the font size).
    pub height: f32,
    /// Decoded text content.
    pub text: String,
    /// Base font name as it appeared in the page's `/Font` resources,
    /// e.g. `"Helvetica-Bold"`. `None` if the font could not be resolved.
    pub font: Option<String>,
    /// Font size in points, as set by the most recent `Tf`.
    pub font_size: f32,
}

impl TextRun {
    /// Build a run, clamping a NaN/negative width down to zero so downstream
    /// sorting and gap arithmetic never has to special-case it.
    pub fn new(x: f32, y: f32, width: f32, height: f32, text: String, font: Option<String>, font_size: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height,
            text,
            font,
            font_size,
        }
    }

    /// Right edge of the run.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge of the run.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Whether the font name suggests bold weight (matches the teacher's
    /// `-Bold`/`,Bold` naming convention used across Type1/TrueType base
    /// fonts).
    pub fn is_bold(&self) -> bool {
        self.font
            .as_deref()
            .map(|f| {
                let lower = f.to_lowercase();
                lower.contains("bold") || lower.contains("black") || lower.contains("heavy")
            })
            .unwrap_or(false)
    }

    /// Whether the font name suggests italic/oblique style.
    pub fn is_italic(&self) -> bool {
        self.font
            .as_deref()
            .map(|f| {
                let lower = f.to_lowercase();
                lower.contains("italic") || lower.contains("oblique")
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_right_and_bottom() {
        let run = TextRun::new(10.0, 20.0, 30.0, 12.0, "hi".to_string(), None, 12.0);
        assert_eq!(run.right(), 40.0);
        assert_eq!(run.bottom(), 32.0);
    }

    #[test]
    fn test_negative_width_is_clamped() {
        let run = TextRun::new(0.0, 0.0, -5.0, 12.0, "x".to_string(), None, 12.0);
        assert_eq!(run.width, 0.0);
    }

    #[test]
    fn test_is_bold_from_font_name() {
        let run = TextRun::new(0.0, 0.0, 1.0, 1.0, "x".to_string(), Some("Arial-BoldMT".to_string()), 12.0);
        assert!(run.is_bold());
        assert!(!run.is_italic());
    }

    #[test]
    fn test_is_italic_from_font_name() {
        let run = TextRun::new(0.0, 0.0, 1.0, 1.0, "x".to_string(), Some("TimesNewRomanPS-ItalicMT".to_string()), 12.0);
        assert!(run.is_italic());
    }

    #[test]
    fn test_no_font_is_neither_bold_nor_italic() {
        let run = TextRun::new(0.0, 0.0, 1.0, 1.0, "x".to_string(), None, 12.0);
        assert!(!run.is_bold());
        assert!(!run.is_italic());
    }
}
