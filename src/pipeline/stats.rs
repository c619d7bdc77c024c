//! Pass (i): document-wide statistics computed once and read by every
//! later pass (`Globals` in the data model).

use std::collections::HashMap;

use super::constants::DEFAULT_MOST_USED_DISTANCE;
use super::page::{Page, WordFormat};

#[derive(Debug, Clone, Default)]
pub struct Globals {
    pub most_used_height: i32,
    pub most_used_font: Option<String>,
    pub most_used_distance: f32,
    pub max_height: f32,
    pub max_height_font: Option<String>,
    pub font_format: HashMap<String, WordFormat>,
}

/// Heading bands are computed on integer-rounded heights. Standard
/// round-half-away-from-zero: 13.49 rounds to 13, 13.51 rounds to 14 —
/// runs straddling a `.5` boundary land on opposite sides, by design.
pub fn round_height(h: f32) -> i32 {
    h.round() as i32
}

pub fn calculate_global_stats(pages: &[Page]) -> Globals {
    let mut height_counts: HashMap<i32, usize> = HashMap::new();
    let mut font_counts: HashMap<String, usize> = HashMap::new();
    let mut max_height = 0.0f32;
    let mut max_height_font: Option<String> = None;
    let mut distance_counts: HashMap<i32, usize> = HashMap::new();

    for page in pages {
        let mut prev_modal: Option<(f32, i32)> = None;
        let runs: Vec<_> = page.runs().collect();
        for run in &runs {
            let rh = round_height(run.height);
            *height_counts.entry(rh).or_default() += 1;
            if let Some(font) = &run.font {
                *font_counts.entry(font.clone()).or_default() += 1;
            }
            if run.height > max_height {
                max_height = run.height;
                max_height_font = run.font.clone();
            }
        }

        // Distance histogram only between consecutive runs at the
        // soon-to-be modal height (computed in a second pass once global
        // mode is known would be circular; approximate using the running
        // per-page modal height among runs seen so far this page).
        let page_modal_height = {
            let mut counts: HashMap<i32, usize> = HashMap::new();
            for run in &runs {
                *counts.entry(round_height(run.height)).or_default() += 1;
            }
            counts.into_iter().max_by_key(|(_, c)| *c).map(|(h, _)| h)
        };
        if let Some(modal) = page_modal_height {
            for run in &runs {
                if run.text.trim().is_empty() {
                    continue;
                }
                if round_height(run.height) != modal {
                    prev_modal = None;
                    continue;
                }
                if let Some((prev_y, _)) = prev_modal {
                    let gap = prev_y - run.y;
                    if gap > 0.0 {
                        *distance_counts.entry(gap.round() as i32).or_default() += 1;
                    }
                }
                prev_modal = Some((run.y, modal));
            }
        }
    }

    let most_used_height = height_counts.into_iter().max_by_key(|(_, c)| *c).map(|(h, _)| h).unwrap_or(0);
    let most_used_font = font_counts.into_iter().max_by_key(|(_, c)| *c).map(|(f, _)| f);
    let most_used_distance = distance_counts
        .into_iter()
        .max_by_key(|(_, c)| *c)
        .map(|(d, _)| d as f32)
        .unwrap_or(DEFAULT_MOST_USED_DISTANCE);

    let mut font_format = HashMap::new();
    for page in pages {
        for run in page.runs() {
            let Some(font) = &run.font else { continue };
            if font_format.contains_key(font) {
                continue;
            }
            let lower = font.to_lowercase();
            let has_bold = lower.contains("bold");
            let has_italic = lower.contains("oblique") || lower.contains("italic");
            let fmt = match (has_bold, has_italic) {
                (true, true) => Some(WordFormat::BoldItalic),
                (true, false) => Some(WordFormat::Bold),
                (false, true) => Some(WordFormat::Italic),
                (false, false) => None,
            };
            if let Some(fmt) = fmt {
                font_format.insert(font.clone(), fmt);
            }
        }
    }
    if let Some(max_font) = &max_height_font {
        if Some(max_font) != most_used_font.as_ref() {
            font_format.entry(max_font.clone()).or_insert(WordFormat::Bold);
        }
    }

    Globals { most_used_height, most_used_font, most_used_distance, max_height, max_height_font, font_format }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::TextRun;
    use crate::pipeline::page::PageItem;

    fn page_with(runs: Vec<TextRun>) -> Page {
        let mut page = Page::new(0, 612.0, 792.0);
        page.items = runs.into_iter().map(PageItem::Run).collect();
        page
    }

    #[test]
    fn test_round_height_boundary() {
        assert_eq!(round_height(13.49), 13);
        assert_eq!(round_height(13.51), 14);
    }

    #[test]
    fn test_most_used_height_is_mode() {
        let runs = vec![
            TextRun::new(10.0, 100.0, 20.0, 10.0, "a".into(), Some("F1".into()), 10.0),
            TextRun::new(10.0, 90.0, 20.0, 10.0, "b".into(), Some("F1".into()), 10.0),
            TextRun::new(10.0, 80.0, 20.0, 20.0, "c".into(), Some("F1".into()), 20.0),
        ];
        let globals = calculate_global_stats(&[page_with(runs)]);
        assert_eq!(globals.most_used_height, 10);
    }

    #[test]
    fn test_default_distance_when_no_histogram_data() {
        let globals = calculate_global_stats(&[page_with(vec![])]);
        assert_eq!(globals.most_used_distance, DEFAULT_MOST_USED_DISTANCE);
    }
}
