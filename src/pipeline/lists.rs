//! Pass (vi): list detection.

use lazy_static::lazy_static;
use regex::Regex;

use super::constants::{BULLET_CHARS, LIST_INDENT_STEP, LIST_LEVEL_MAX};
use super::page::{BlockType, Page, PageItem};

lazy_static! {
    static ref ORDERED_DECIMAL: Regex = Regex::new(r"^\s*\d+\.\s").unwrap();
    static ref ORDERED_ALPHA_LOWER: Regex = Regex::new(r"^\s*[a-z]\.\s").unwrap();
    static ref ORDERED_ALPHA_UPPER: Regex = Regex::new(r"^\s*[A-Z]\)\s").unwrap();
    static ref ORDERED_ROMAN: Regex = Regex::new(r"(?i)^\s*[ivx]+\.\s").unwrap();
}

fn is_bullet_start(text: &str) -> bool {
    text.trim_start().chars().next().map(|c| BULLET_CHARS.contains(&c)).unwrap_or(false)
}

fn is_ordered_start(text: &str) -> bool {
    ORDERED_DECIMAL.is_match(text)
        || ORDERED_ALPHA_LOWER.is_match(text)
        || ORDERED_ALPHA_UPPER.is_match(text)
        || ORDERED_ROMAN.is_match(text)
}

/// Tag candidate lines as `List`, rewriting non-`-` bullets to `-` and
/// computing `list_level` from indent relative to the page's leftmost
/// list item.
pub fn detect_lists(pages: &mut [Page]) {
    for page in pages.iter_mut() {
        let candidate_indices: Vec<usize> = page
            .items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| match item {
                PageItem::Line(l) => {
                    let text = l.text();
                    (is_bullet_start(&text) || is_ordered_start(&text)).then_some(i)
                }
                _ => None,
            })
            .collect();
        if candidate_indices.is_empty() {
            continue;
        }
        let min_x = candidate_indices
            .iter()
            .filter_map(|&i| match &page.items[i] {
                PageItem::Line(l) => Some(l.x),
                _ => None,
            })
            .fold(f32::MAX, f32::min);

        for &i in &candidate_indices {
            if let PageItem::Line(line) = &mut page.items[i] {
                let level = ((line.x - min_x) / LIST_INDENT_STEP).floor().clamp(0.0, LIST_LEVEL_MAX as f32) as u8;
                line.list_level = level;
                line.block_type = Some(BlockType::List);
                if is_bullet_start(&line.text()) {
                    rewrite_bullet_to_dash(line);
                }
            }
        }
    }
}

fn rewrite_bullet_to_dash(line: &mut super::page::Line) {
    if let Some(first) = line.words.first_mut() {
        if let Some(c) = first.text.chars().next() {
            if BULLET_CHARS.contains(&c) && c != '-' {
                first.text = format!("-{}", &first.text[c.len_utf8()..]);
            }
        } else {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::page::{Line, Word};

    fn bullet_line(x: f32, y: f32, bullet: char, text: &str) -> Line {
        let mut l = Line::new(x, y, 100.0, 12.0, None);
        l.words.push(Word::plain(format!("{bullet}")));
        for w in text.split_whitespace() {
            l.words.push(Word::plain(w));
        }
        l
    }

    #[test]
    fn test_bullet_rewrite_with_indent() {
        let mut page = Page::new(0, 612.0, 792.0);
        page.items.push(PageItem::Line(bullet_line(72.0, 10.0, '\u{2022}', "Foo")));
        page.items.push(PageItem::Line(bullet_line(108.0, 30.0, '\u{2022}', "Bar")));
        let mut pages = vec![page];
        detect_lists(&mut pages);
        let PageItem::Line(first) = &pages[0].items[0] else { panic!() };
        let PageItem::Line(second) = &pages[0].items[1] else { panic!() };
        assert_eq!(first.list_level, 0);
        assert_eq!(first.words[0].text, "-");
        assert_eq!(second.list_level, 1);
        assert_eq!(second.words[0].text, "-");
    }
}
