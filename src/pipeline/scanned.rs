//! Section 4.8: scanned-page detection.

use super::constants::{SCANNED_PAGE_IMAGE_FRACTION, SCANNED_PAGE_IMAGE_MIN_PX, SCANNED_PAGE_MAX_TEXT_LEN};
use super::page::{Page, PageItem};

/// An image XObject on a page, enough to judge whether the page is a
/// scan rather than digitally-authored text.
#[derive(Debug, Clone)]
pub struct PageImage {
    pub id: String,
    pub width_px: u32,
    pub height_px: u32,
}

/// Mark `page` scanned when its non-whitespace text is short and some
/// image is large relative to the page (or large in absolute pixels).
/// On a scanned page the text items are dropped and a `![id]`
/// placeholder for the largest image takes their place.
pub fn detect_scanned_page(page: &mut Page, images: &[PageImage]) {
    let text_len: usize = page
        .runs()
        .map(|r| r.text.chars().filter(|c| !c.is_whitespace()).count())
        .sum();
    if text_len >= SCANNED_PAGE_MAX_TEXT_LEN {
        return;
    }

    let largest = images.iter().max_by_key(|img| img.width_px as u64 * img.height_px as u64);
    let Some(largest) = largest else { return };

    let width_fraction = largest.width_px as f32 / page.width.max(1.0);
    let height_fraction = largest.height_px as f32 / page.height.max(1.0);
    let is_scanned = width_fraction > SCANNED_PAGE_IMAGE_FRACTION
        || height_fraction > SCANNED_PAGE_IMAGE_FRACTION
        || (largest.width_px >= SCANNED_PAGE_IMAGE_MIN_PX && largest.height_px >= SCANNED_PAGE_IMAGE_MIN_PX);

    if !is_scanned {
        return;
    }

    page.is_scanned = true;
    page.scanned_image_id = Some(largest.id.clone());
    page.items.retain(|item| !matches!(item, PageItem::Run(_) | PageItem::Line(_) | PageItem::Block(_)));
    page.items.push(PageItem::Text(format!("![{}]", largest.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::TextRun;

    #[test]
    fn test_large_image_on_sparse_text_page_marks_scanned() {
        let mut page = Page::new(0, 612.0, 792.0);
        page.items.push(PageItem::Run(TextRun::new(10.0, 10.0, 5.0, 5.0, "ok".into(), None, 5.0)));
        let images = vec![PageImage { id: "page_001".into(), width_px: 600, height_px: 800 }];
        detect_scanned_page(&mut page, &images);
        assert!(page.is_scanned);
        assert_eq!(page.scanned_image_id, Some("page_001".to_string()));
    }

    #[test]
    fn test_text_heavy_page_not_scanned() {
        let mut page = Page::new(0, 612.0, 792.0);
        let long_text = "word ".repeat(50);
        page.items.push(PageItem::Run(TextRun::new(10.0, 10.0, 5.0, 5.0, long_text, None, 5.0)));
        let images = vec![PageImage { id: "page_001".into(), width_px: 600, height_px: 800 }];
        detect_scanned_page(&mut page, &images);
        assert!(!page.is_scanned);
    }
}
