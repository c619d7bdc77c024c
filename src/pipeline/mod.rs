//! The layout reconstruction pipeline: a fixed sequence of passes that
//! turn per-page positioned text runs into a Markdown document.
//!
//! `ParseResult { pages, globals, messages }` is threaded explicitly
//! through every pass; there is no ambient state. `Globals` is computed
//! once, by the first pass, and is read-only afterwards.

pub mod blank_pages;
pub mod block;
pub mod constants;
pub mod headers_footers;
pub mod headings;
pub mod line;
pub mod lists;
pub mod page;
pub mod render;
pub mod scanned;
pub mod stats;

pub use page::{Annotation, Block, BlockType, Line, Page, PageItem, ParsedElements, Word, WordFormat, WordType};
pub use scanned::PageImage;
pub use stats::{calculate_global_stats, Globals};

use crate::content::TextRun;

#[derive(Debug, Clone)]
pub struct Message {
    pub page_index: Option<usize>,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub pages: Vec<Page>,
    pub globals: Globals,
    pub messages: Vec<Message>,
}

/// The subset of `ConvertOptions` (see `crate::config`) this pipeline
/// consumes. `strip_page_numbers` and `strip_toc` are accepted but are
/// no-ops, per an explicit open design decision: the upstream toggles
/// never grew a real implementation and a caller-supplied filter is the
/// only way to get that behavior today.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub strip_headers_footers: bool,
    pub strip_page_numbers: bool,
    pub strip_toc: bool,
    pub strip_footnotes: bool,
    pub strip_blank_pages: bool,
    pub detect_lists: bool,
    pub detect_headings: bool,
    pub preserve_formatting: bool,
    pub scan_mode: bool,
    pub page_separator: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            strip_headers_footers: true,
            strip_page_numbers: false,
            strip_toc: false,
            strip_footnotes: false,
            strip_blank_pages: true,
            detect_lists: true,
            detect_headings: true,
            preserve_formatting: true,
            scan_mode: true,
            page_separator: "\n".to_string(),
        }
    }
}

/// One page's worth of input to the pipeline: its raw positioned runs
/// plus whatever image XObjects were extracted from it (used only for
/// scanned-page detection).
pub struct PageInput {
    pub index: usize,
    pub width: f32,
    pub height: f32,
    pub runs: Vec<TextRun>,
    pub images: Vec<PageImage>,
}

/// Run every pipeline pass, in the fixed order the spec prescribes, and
/// return the final markdown alongside accumulated diagnostics.
pub fn run(inputs: Vec<PageInput>, options: &PipelineOptions) -> (String, ParseResult) {
    let mut pages: Vec<Page> = Vec::with_capacity(inputs.len());
    let mut page_images: Vec<Vec<PageImage>> = Vec::with_capacity(inputs.len());
    for input in inputs {
        let mut page = Page::new(input.index, input.width, input.height);
        page.items = input.runs.into_iter().map(PageItem::Run).collect();
        pages.push(page);
        page_images.push(input.images);
    }

    let mut messages = Vec::new();

    // (i) global statistics
    let globals = calculate_global_stats(&pages);

    // 4.8: scanned-page detection, run before text grouping.
    if options.scan_mode {
        for (page, images) in pages.iter_mut().zip(page_images.iter()) {
            scanned::detect_scanned_page(page, images);
            if page.is_scanned {
                messages.push(Message { page_index: Some(page.index), text: "page classified as scanned".into() });
            }
        }
    }

    // (ii) line compaction + table detection
    for page in pages.iter_mut() {
        if page.is_scanned {
            continue;
        }
        let runs: Vec<TextRun> = page
            .items
            .drain(..)
            .filter_map(|item| match item {
                PageItem::Run(r) => Some(r),
                _ => None,
            })
            .collect();
        let lines = line::compact_lines(runs, &globals);
        page.items = lines.into_iter().map(PageItem::Line).collect();
    }

    // (iii) repetitive header/footer removal
    if options.strip_headers_footers {
        headers_footers::strip_headers_footers(&mut pages);
    }

    // (iv) TOC detection — no-op per an explicit open design decision.

    // (v) heading detection
    if options.detect_headings {
        headings::detect_headings(&mut pages, &globals);
    }

    // (vi) list detection
    if options.detect_lists {
        lists::detect_lists(&mut pages);
    }

    // (vii) block gathering
    block::gather_blocks(&mut pages, &globals);

    // (viii) blank-page filtering
    if options.strip_blank_pages {
        pages = blank_pages::filter_blank_pages(pages);
    }

    let markdown = render::assemble_markdown(&pages, &options.page_separator);

    (markdown, ParseResult { pages, globals, messages })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_yields_empty_markdown() {
        let (markdown, result) = run(vec![], &PipelineOptions::default());
        assert!(markdown.is_empty());
        assert!(result.pages.is_empty());
    }

    #[test]
    fn test_single_page_simple_paragraph() {
        let input = PageInput {
            index: 0,
            width: 612.0,
            height: 792.0,
            runs: vec![TextRun::new(40.0, 100.0, 60.0, 12.0, "Hello world".into(), Some("F1".into()), 12.0)],
            images: vec![],
        };
        let (markdown, _) = run(vec![input], &PipelineOptions::default());
        assert_eq!(markdown.trim(), "Hello world");
    }
}
