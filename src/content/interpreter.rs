//! Content stream interpreter: walks the operator stream produced by
//! [`crate::content::parser::parse_content_stream`] against the graphics
//! state machine and emits [`TextRun`]s in page space.

use std::collections::HashMap;

use crate::content::graphics_state::{GraphicsStateStack, Matrix};
use crate::content::operators::{Operator, TextElement};
use crate::content::parser::parse_content_stream;
use crate::content::run::TextRun;
use crate::fonts::FontInfo;

/// A page's `/Font` and `/XObject` resources, keyed by the name used in the
/// content stream (e.g. `"F1"`, `"Im0"`).
#[derive(Debug, Clone, Default)]
pub struct PageResources {
    /// Fonts declared in this page's (or form's) `/Resources /Font` dict.
    pub fonts: HashMap<String, FontInfo>,
    /// Form XObjects declared in `/Resources /XObject`, pre-decoded to their
    /// content stream bytes plus their own resource dictionary. Image
    /// XObjects are not represented here — they are extracted separately by
    /// [`crate::images`] and never feed the text interpreter.
    pub forms: HashMap<String, FormXObject>,
}

/// A decoded Form XObject: its content stream and its own resource scope,
/// which per ISO 32000-1:2008 §8.10.2 may reuse or shadow the page's.
#[derive(Debug, Clone)]
pub struct FormXObject {
    /// Decoded (filter-applied) content stream bytes.
    pub content: Vec<u8>,
    /// The form's own `/Resources`, already resolved.
    pub resources: PageResources,
    /// The form's `/Matrix`, applied before the CTM in effect at the `Do`
    /// call site.
    pub matrix: Matrix,
}

const MAX_FORM_DEPTH: u32 = 16;

/// Execute a page's content stream and return the text runs it produced, in
/// page space (`y` measured down from the top of the page).
///
/// Per the failure discipline in ISO 32000-1:2008 and this crate's error
/// handling design: a malformed content stream never aborts the whole
/// conversion. `parse_content_stream` already recovers from bad tokens
/// byte-by-byte; this function additionally never panics on out-of-range
/// arithmetic, so a single bad page degrades to partial or empty output
/// rather than failing the document.
pub fn run_content_stream(content: &[u8], resources: &PageResources, page_height: f32) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let operators = match parse_content_stream(content) {
        Ok(ops) => ops,
        Err(_) => return runs,
    };
    let mut state = GraphicsStateStack::new();
    execute(&operators, resources, page_height, &mut state, &mut runs, 0);
    runs
}

fn execute(
    operators: &[Operator],
    resources: &PageResources,
    page_height: f32,
    state: &mut GraphicsStateStack,
    runs: &mut Vec<TextRun>,
    depth: u32,
) {
    for op in operators {
        match op {
            Operator::SaveState => state.save(),
            Operator::RestoreState => state.restore(),
            Operator::Cm { a, b, c, d, e, f } => {
                let m = Matrix { a: *a, b: *b, c: *c, d: *d, e: *e, f: *f };
                let gs = state.current_mut();
                gs.ctm = gs.ctm.multiply(&m);
            },
            Operator::Other { name, .. } if name == "BT" => {
                let gs = state.current_mut();
                gs.text_matrix = Matrix::identity();
                gs.text_line_matrix = Matrix::identity();
            },
            Operator::Other { name, .. } if name == "ET" => {},
            Operator::Tf { font, size } => {
                let gs = state.current_mut();
                gs.font_name = Some(font.clone());
                gs.font_size = *size;
            },
            Operator::Tc { char_space } => state.current_mut().char_space = *char_space,
            Operator::Tw { word_space } => state.current_mut().word_space = *word_space,
            Operator::Tz { scale } => state.current_mut().horizontal_scaling = *scale,
            Operator::TL { leading } => state.current_mut().leading = *leading,
            Operator::Tr { render } => state.current_mut().render_mode = *render,
            Operator::Ts { rise } => state.current_mut().text_rise = *rise,
            Operator::Td { tx, ty } => move_text_line(state, *tx, *ty),
            Operator::TD { tx, ty } => {
                state.current_mut().leading = -*ty;
                move_text_line(state, *tx, *ty);
            },
            Operator::TStar => {
                let leading = state.current().leading;
                move_text_line(state, 0.0, -leading);
            },
            Operator::Tm { a, b, c, d, e, f } => {
                let m = Matrix { a: *a, b: *b, c: *c, d: *d, e: *e, f: *f };
                let gs = state.current_mut();
                gs.text_matrix = m;
                gs.text_line_matrix = m;
            },
            Operator::Tj { text } => {
                if let Some(run) = emit_run(text, state, resources, page_height) {
                    advance_by_run_width(state, &run, page_height);
                    runs.push(run);
                }
            },
            Operator::Quote { text } => {
                let leading = state.current().leading;
                move_text_line(state, 0.0, -leading);
                if let Some(run) = emit_run(text, state, resources, page_height) {
                    advance_by_run_width(state, &run, page_height);
                    runs.push(run);
                }
            },
            Operator::DoubleQuote { word_space, char_space, text } => {
                state.current_mut().word_space = *word_space;
                state.current_mut().char_space = *char_space;
                let leading = state.current().leading;
                move_text_line(state, 0.0, -leading);
                if let Some(run) = emit_run(text, state, resources, page_height) {
                    advance_by_run_width(state, &run, page_height);
                    runs.push(run);
                }
            },
            Operator::TJ { array } => {
                if let Some(run) = emit_tj_run(array, state, resources, page_height) {
                    runs.push(run);
                }
            },
            Operator::Do { name } => {
                if depth < MAX_FORM_DEPTH {
                    if let Some(form) = resources.forms.get(name) {
                        state.save();
                        let gs = state.current_mut();
                        gs.ctm = gs.ctm.multiply(&form.matrix);
                        if let Ok(sub_ops) = parse_content_stream(&form.content) {
                            execute(&sub_ops, &form.resources, page_height, state, runs, depth + 1);
                        }
                        state.restore();
                    }
                }
            },
            _ => {},
        }
    }
}

fn move_text_line(state: &mut GraphicsStateStack, tx: f32, ty: f32) {
    let gs = state.current_mut();
    let translation = Matrix::translation(tx, ty);
    let new_line_matrix = translation.multiply(&gs.text_line_matrix);
    gs.text_line_matrix = new_line_matrix;
    gs.text_matrix = new_line_matrix;
}

/// Width of a decoded string in unscaled text space units (thousandths of
/// em), using the font's width table when available and a flat per-glyph
/// estimate otherwise (§4.6 width estimation fallback).
fn estimate_width_1000(text: &str, font: Option<&FontInfo>) -> f32 {
    match font {
        Some(f) => text
            .chars()
            .map(|_| f.default_width.max(1.0))
            .sum::<f32>(),
        None => text.chars().count() as f32 * 500.0,
    }
}

fn decode_text(bytes: &[u8], font: Option<&FontInfo>) -> String {
    crate::fonts::decode_font_string(bytes, font)
}

fn emit_run(
    bytes: &[u8],
    state: &GraphicsStateStack,
    resources: &PageResources,
    page_height: f32,
) -> Option<TextRun> {
    let gs = state.current();
    let font = gs.font_name.as_deref().and_then(|n| resources.fonts.get(n));
    let text = decode_text(bytes, font);
    if text.is_empty() {
        return None;
    }
    build_run(&text, estimate_width_1000(&text, font), state, resources, page_height)
}

fn emit_tj_run(
    array: &[TextElement],
    state: &mut GraphicsStateStack,
    resources: &PageResources,
    page_height: f32,
) -> Option<TextRun> {
    let gs = state.current();
    let font_name = gs.font_name.clone();
    let font = font_name.as_deref().and_then(|n| resources.fonts.get(n));
    let font_size = gs.font_size;
    let horiz_scale = gs.horizontal_scaling / 100.0;

    let start_x;
    let start_y;
    {
        let gs = state.current();
        let p = gs.ctm.multiply(&gs.text_matrix).transform_point(0.0, gs.text_rise);
        start_x = p.x;
        start_y = page_height - p.y;
    }

    let mut text = String::new();
    for el in array {
        match el {
            TextElement::String(bytes) => {
                let decoded = decode_text(bytes, font);
                // Explicit numeric spacing thresholds handle the common
                // case where no space glyph is present in the string; a
                // genuine space character already does the job.
                text.push_str(&decoded);
                let w = estimate_width_1000(&decoded, font) / 1000.0 * font_size * horiz_scale;
                let char_count = decoded.chars().count() as f32;
                let extra = gs.char_space * char_count.max(1.0)
                    + if decoded.contains(' ') { gs.word_space } else { 0.0 };
                move_text_line(state, w + extra, 0.0);
            },
            TextElement::Offset(v) => {
                if v.abs() > 300.0 {
                    text.push(' ');
                }
                let advance = -v / 1000.0 * font_size * horiz_scale;
                move_text_line(state, advance, 0.0);
            },
        }
    }
    if text.trim().is_empty() {
        return None;
    }
    let width = (estimate_width_1000(&text, font) / 1000.0) * font_size * horiz_scale;
    let height = font_size.max(1.0);
    Some(TextRun::new(start_x, start_y, width.max(0.0), height, text, font.map(|f| f.base_font.clone()), font_size))
}

fn advance_by_run_width(state: &mut GraphicsStateStack, run: &TextRun, _page_height: f32) {
    let gs = state.current();
    let horiz_scale = gs.horizontal_scaling / 100.0;
    let char_count = run.text.chars().count() as f32;
    let word_count = run.text.matches(' ').count() as f32;
    let advance = run.width / horiz_scale.max(0.0001)
        + gs.char_space * char_count
        + gs.word_space * word_count;
    move_text_line(state, advance, 0.0);
}

fn build_run(
    text: &str,
    width_1000: f32,
    state: &GraphicsStateStack,
    _resources: &PageResources,
    page_height: f32,
) -> Option<TextRun> {
    let gs = state.current();
    let p = gs.ctm.multiply(&gs.text_matrix).transform_point(0.0, gs.text_rise);
    let x = p.x;
    let y = page_height - p.y;
    let horiz_scale = gs.horizontal_scaling / 100.0;
    let width = (width_1000 / 1000.0) * gs.font_size * horiz_scale;
    let height = gs.font_size.max(1.0);
    Some(TextRun::new(
        x,
        y,
        width.max(0.0),
        height,
        text.to_string(),
        gs.font_name.clone(),
        gs.font_size,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_resources_with_font(name: &str) -> PageResources {
        let mut fonts = HashMap::new();
        fonts.insert(
            name.to_string(),
            FontInfo {
                base_font: "Helvetica".to_string(),
                subtype: "Type1".to_string(),
                encoding: crate::fonts::font_dict::Encoding::Standard("WinAnsiEncoding".to_string()),
                to_unicode: None,
                font_weight: None,
                flags: None,
                stem_v: None,
                embedded_font_data: None,
                cid_to_gid_map: None,
                cid_system_info: None,
                cid_font_type: None,
                widths: None,
                first_char: None,
                last_char: None,
                default_width: 500.0,
                cid_widths: None,
                cid_default_width: 1000.0,
            },
        );
        PageResources { fonts, forms: HashMap::new() }
    }

    #[test]
    fn test_simple_tj_emits_one_run() {
        let resources = page_resources_with_font("F1");
        let content = b"BT /F1 12 Tf 100 700 Td (Hello) Tj ET";
        let runs = run_content_stream(content, &resources, 792.0);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Hello");
        assert_eq!(runs[0].y, 92.0);
        assert_eq!(runs[0].font.as_deref(), Some("Helvetica"));
    }

    #[test]
    fn test_tj_array_merges_into_one_run_with_space() {
        let resources = page_resources_with_font("F1");
        let content = b"BT /F1 12 Tf 0 0 Td [(Hello)-350(World)] TJ ET";
        let runs = run_content_stream(content, &resources, 100.0);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Hello World");
    }

    #[test]
    fn test_malformed_stream_does_not_panic() {
        let resources = PageResources::default();
        let runs = run_content_stream(b"\xff\xfe garbage (unterminated", &resources, 100.0);
        assert!(runs.is_empty());
    }

    #[test]
    fn test_form_xobject_recursion_depth_cap_does_not_hang() {
        // Fa and Fb invoke each other via /Do, forming a genuine cycle by
        // name lookup. Without the depth cap this would recurse forever.
        let mut inner = HashMap::new();
        inner.insert(
            "Fa".to_string(),
            FormXObject { content: b"/Fb Do".to_vec(), resources: PageResources::default(), matrix: Matrix::identity() },
        );
        inner.insert(
            "Fb".to_string(),
            FormXObject { content: b"/Fa Do".to_vec(), resources: PageResources::default(), matrix: Matrix::identity() },
        );
        let cyclic = PageResources { fonts: HashMap::new(), forms: inner.clone() };
        for form in inner.values_mut() {
            form.resources = cyclic.clone();
        }
        let cyclic = PageResources { fonts: HashMap::new(), forms: inner };
        let runs = run_content_stream(b"/Fa Do", &cyclic, 100.0);
        assert!(runs.is_empty());
    }

    #[test]
    fn test_missing_font_still_emits_run_with_estimated_width() {
        let resources = PageResources::default();
        let content = b"BT /NoSuchFont 10 Tf 0 0 Td (abc) Tj ET";
        let runs = run_content_stream(content, &resources, 100.0);
        assert_eq!(runs.len(), 1);
        assert!(runs[0].width > 0.0);
        assert!(runs[0].font.is_none());
    }
}
