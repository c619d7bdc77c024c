//! Pass (viii): blank-page filtering.

use super::page::{Page, PageItem};

/// A page is blank if it isn't scanned and has fewer than two meaningful
/// lines across all of its blocks.
fn is_blank(page: &Page) -> bool {
    if page.is_scanned {
        return false;
    }
    let meaningful = page
        .items
        .iter()
        .filter_map(|item| match item {
            PageItem::Block(b) => Some(b),
            _ => None,
        })
        .flat_map(|b| b.lines.iter())
        .filter(|l| !l.text().trim().is_empty())
        .count();
    meaningful < 2
}

pub fn filter_blank_pages(pages: Vec<Page>) -> Vec<Page> {
    pages.into_iter().filter(|p| !is_blank(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::page::{Block, Line, Word};

    #[test]
    fn test_blank_page_removed() {
        let page = Page::new(0, 612.0, 792.0);
        let pages = filter_blank_pages(vec![page]);
        assert!(pages.is_empty());
    }

    #[test]
    fn test_page_with_content_kept() {
        let mut page = Page::new(0, 612.0, 792.0);
        let mut block = Block::new(None);
        let mut l1 = Line::new(0.0, 0.0, 10.0, 10.0, None);
        l1.words = vec![Word::plain("a")];
        let mut l2 = Line::new(0.0, 20.0, 10.0, 10.0, None);
        l2.words = vec![Word::plain("b")];
        block.lines.push(l1);
        block.lines.push(l2);
        page.items.push(PageItem::Block(block));
        let pages = filter_blank_pages(vec![page]);
        assert_eq!(pages.len(), 1);
    }
}
