//! Pass (v): heading detection.

use super::constants::MIN_HEIGHT_FOR_HEADINGS;
use super::page::{BlockType, Line, Page, PageItem};
use super::stats::{round_height, Globals};

/// Tag heading lines in place. Runs at `max_height` become H1; runs
/// strictly between `most_used_height` and the H1 band become H2; the
/// remaining distinct heights above the modal height are assigned
/// descending levels 2..6 in order. Finally, modal-height lines set in a
/// non-modal font and written fully uppercase are promoted one level
/// below the smallest level already assigned, provided they open a new
/// section (the preceding line sits above them) and don't end a sentence.
pub fn detect_headings(pages: &mut [Page], globals: &Globals) {
    if globals.most_used_height < 8 {
        return;
    }
    let h2_band = globals.most_used_height as f32 + (globals.max_height - globals.most_used_height as f32) / 4.0;

    // Collect distinct heights above the modal height, across the whole
    // document, to assign levels 2..6 in descending order.
    let mut heights_above: Vec<i32> = Vec::new();
    for page in pages.iter() {
        for line in page.lines() {
            let h = round_height(line.height);
            if h as f32 > globals.most_used_height as f32 && !heights_above.contains(&h) {
                heights_above.push(h);
            }
        }
    }
    heights_above.sort_unstable_by(|a, b| b.cmp(a));

    let mut smallest_level_assigned: u8 = 6;

    for page in pages.iter_mut() {
        let mut prev_end_y: Option<f32> = None;
        let mut line_indices: Vec<usize> =
            page.items.iter().enumerate().filter_map(|(i, it)| matches!(it, PageItem::Line(_)).then_some(i)).collect();
        line_indices.sort_by(|&a, &b| line_y(&page.items, a).partial_cmp(&line_y(&page.items, b)).unwrap());

        for &idx in &line_indices {
            let line = match &mut page.items[idx] {
                PageItem::Line(l) => l,
                _ => continue,
            };
            let h = round_height(line.height);
            let is_max = line.height >= globals.max_height - 0.01;

            if is_max {
                line.block_type = Some(BlockType::heading(1));
                smallest_level_assigned = smallest_level_assigned.min(1);
            } else if h as f32 > h2_band {
                line.block_type = Some(BlockType::heading(2));
                smallest_level_assigned = smallest_level_assigned.min(2);
            } else if let Some(pos) = heights_above.iter().position(|x| *x == h) {
                let level = ((pos + 2) as u8).min(6);
                line.block_type = Some(BlockType::heading(level));
                smallest_level_assigned = smallest_level_assigned.min(level);
            }
            prev_end_y = Some(line.y);
        }

        // Uppercase-promotion pass, now that block types are assigned.
        let mut prev_y: Option<f32> = None;
        for &idx in &line_indices {
            let (is_candidate, y) = {
                let line = match &page.items[idx] {
                    PageItem::Line(l) => l,
                    _ => continue,
                };
                let text = line.text();
                let candidate = line.block_type.is_none()
                    && round_height(line.height) == globals.most_used_height
                    && globals.most_used_font.as_deref() != line.font.as_deref()
                    && !text.trim().is_empty()
                    && text.chars().filter(|c| c.is_alphabetic()).all(|c| c.is_uppercase())
                    && !ends_with_sentence_punctuation(&text)
                    && prev_y.map(|py| py < line.y).unwrap_or(false);
                (candidate, line.y)
            };
            if is_candidate {
                let level = (smallest_level_assigned + 1).min(6);
                if let PageItem::Line(line) = &mut page.items[idx] {
                    line.block_type = Some(BlockType::heading(level));
                }
            }
            prev_y = Some(y);
        }
        let _ = prev_end_y;
    }
}

fn line_y(items: &[super::page::PageItem], idx: usize) -> f32 {
    match &items[idx] {
        PageItem::Line(l) => l.y,
        _ => 0.0,
    }
}

fn ends_with_sentence_punctuation(text: &str) -> bool {
    matches!(text.trim().chars().last(), Some('.') | Some('!') | Some('?'))
}

#[allow(dead_code)]
fn assert_min_height(h: f32) -> bool {
    h >= MIN_HEIGHT_FOR_HEADINGS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::page::Word;

    fn line(height: f32, font: Option<&str>, text: &str, y: f32) -> Line {
        let mut l = Line::new(40.0, y, 100.0, height, font.map(|s| s.to_string()));
        l.words = text.split_whitespace().map(Word::plain).collect();
        l
    }

    #[test]
    fn test_max_height_line_becomes_h1() {
        let mut page = Page::new(0, 612.0, 792.0);
        page.items.push(PageItem::Line(line(24.0, Some("F1"), "Title", 50.0)));
        page.items.push(PageItem::Line(line(10.0, Some("F2"), "body text", 80.0)));
        let mut pages = vec![page];
        let globals = Globals { most_used_height: 10, most_used_font: Some("F2".into()), max_height: 24.0, ..Default::default() };
        detect_headings(&mut pages, &globals);
        let PageItem::Line(l0) = &pages[0].items[0] else { panic!() };
        assert_eq!(l0.block_type, Some(BlockType::heading(1)));
    }

    #[test]
    fn test_low_confidence_heights_skip_detection() {
        let mut page = Page::new(0, 612.0, 792.0);
        page.items.push(PageItem::Line(line(7.0, Some("F1"), "Tiny", 50.0)));
        let mut pages = vec![page];
        let globals = Globals { most_used_height: 6, max_height: 7.0, ..Default::default() };
        detect_headings(&mut pages, &globals);
        let PageItem::Line(l0) = &pages[0].items[0] else { panic!() };
        assert_eq!(l0.block_type, None);
    }
}
