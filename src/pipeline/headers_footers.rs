//! Pass (iii): repetitive header/footer removal.

use std::collections::HashMap;

use super::constants::repetition_threshold;
use super::page::{Line, Page, PageItem};

/// Hash the topmost/bottommost line of each page, ignoring spaces and
/// digits, and strike any hash that recurs on enough pages to be a
/// running header or footer rather than page content.
pub fn strip_headers_footers(pages: &mut [Page]) {
    if pages.len() < 3 {
        return;
    }

    fn normalize(text: &str) -> String {
        text.chars().filter(|c| !c.is_whitespace() && !c.is_ascii_digit()).collect::<String>().to_lowercase()
    }

    fn edge_lines(page: &Page) -> (Option<usize>, Option<usize>) {
        let mut indices: Vec<usize> = Vec::new();
        for (i, item) in page.items.iter().enumerate() {
            if matches!(item, PageItem::Line(_)) {
                indices.push(i);
            }
        }
        if indices.is_empty() {
            return (None, None);
        }
        let top = *indices
            .iter()
            .min_by(|&&a, &&b| line_y(page, a).partial_cmp(&line_y(page, b)).unwrap())
            .unwrap();
        let bottom = *indices
            .iter()
            .max_by(|&&a, &&b| line_y(page, a).partial_cmp(&line_y(page, b)).unwrap())
            .unwrap();
        (Some(top), Some(bottom))
    }

    fn line_y(page: &Page, idx: usize) -> f32 {
        match &page.items[idx] {
            PageItem::Line(l) => l.y,
            _ => 0.0,
        }
    }

    fn line_text(page: &Page, idx: usize) -> String {
        match &page.items[idx] {
            PageItem::Line(l) => l.text(),
            _ => String::new(),
        }
    }

    let mut hash_pages: HashMap<String, usize> = HashMap::new();
    let mut edges: Vec<(Option<usize>, Option<usize>)> = Vec::with_capacity(pages.len());
    for page in pages.iter() {
        let (top, bottom) = edge_lines(page);
        if let Some(i) = top {
            *hash_pages.entry(normalize(&line_text(page, i))).or_default() += 1;
        }
        if let Some(i) = bottom {
            *hash_pages.entry(normalize(&line_text(page, i))).or_default() += 1;
        }
        edges.push((top, bottom));
    }

    let threshold = repetition_threshold(pages.len());
    let repeated: std::collections::HashSet<String> =
        hash_pages.into_iter().filter(|(_, count)| *count >= threshold).map(|(k, _)| k).collect();
    if repeated.is_empty() {
        return;
    }

    for (page, (top, bottom)) in pages.iter_mut().zip(edges) {
        let mut to_remove = Vec::new();
        if let Some(i) = top {
            if repeated.contains(&normalize(&line_text(page, i))) {
                to_remove.push(i);
            }
        }
        if let Some(i) = bottom {
            if repeated.contains(&normalize(&line_text(page, i))) {
                to_remove.push(i);
            }
        }
        to_remove.sort_unstable();
        to_remove.dedup();
        for i in to_remove.into_iter().rev() {
            page.items.remove(i);
        }
    }
}

#[allow(dead_code)]
fn line_at<'a>(items: &'a [PageItem], idx: usize) -> Option<&'a Line> {
    match &items[idx] {
        PageItem::Line(l) => Some(l),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::page::Line;

    fn page_with_lines(idx: usize, texts: &[&str]) -> Page {
        let mut page = Page::new(idx, 612.0, 792.0);
        for (i, t) in texts.iter().enumerate() {
            let mut line = Line::new(40.0, i as f32 * 20.0, 100.0, 12.0, None);
            line.words = t.split_whitespace().map(crate::pipeline::page::Word::plain).collect();
            page.items.push(PageItem::Line(line));
        }
        page
    }

    #[test]
    fn test_repeated_footer_removed_across_pages() {
        let mut pages = vec![
            page_with_lines(0, &["Title One", "Confidential Draft"]),
            page_with_lines(1, &["Title Two", "Confidential Draft"]),
            page_with_lines(2, &["Title Three", "Confidential Draft"]),
        ];
        strip_headers_footers(&mut pages);
        for page in &pages {
            assert!(page.items.iter().all(|item| match item {
                PageItem::Line(l) => l.text() != "Confidential Draft",
                _ => true,
            }));
        }
    }

    #[test]
    fn test_unique_content_not_removed() {
        let mut pages =
            vec![page_with_lines(0, &["Unique A"]), page_with_lines(1, &["Unique B"]), page_with_lines(2, &["Unique C"])];
        strip_headers_footers(&mut pages);
        assert_eq!(pages[0].items.len(), 1);
    }
}
