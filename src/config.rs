//! Conversion options, progress hooks and the output shape of [`crate::convert`].

use std::fmt;

/// Image container format as it was stored in the PDF. Images are passed
/// through untouched — this crate never re-encodes pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// DCTDecode stream, i.e. a JPEG baked straight into the PDF.
    Jpeg,
    /// A FlateDecode-compressed raw raster re-packed as PNG.
    Png,
    /// JPXDecode (JPEG2000) stream, carried through as-is.
    Jp2,
    /// Filter this crate does not know how to label; raw bytes are kept.
    Bin,
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
            ImageFormat::Jp2 => "jp2",
            ImageFormat::Bin => "bin",
        };
        f.write_str(s)
    }
}

/// An image recovered from a page's `/XObject` resources.
#[derive(Debug, Clone)]
pub struct ExtractedImage {
    /// Stable identifier referenced by `![id]` placeholders in the markdown
    /// output. Callers substitute these for real paths/URLs themselves.
    pub id: String,
    /// Container format of `raw_bytes`.
    pub format: ImageFormat,
    /// Raw, un-reencoded image bytes.
    pub raw_bytes: Vec<u8>,
    /// Alt text, when the PDF's structure tree or `/Alt` entry supplied one.
    pub alt_text: Option<String>,
    /// Zero-based index of the page the image appeared on.
    pub page_index: usize,
    /// Pixel width, from the image XObject's `/Width`.
    pub width_px: u32,
    /// Pixel height, from the image XObject's `/Height`.
    pub height_px: u32,
}

/// Result of a successful [`crate::convert`] call.
#[derive(Debug, Clone, Default)]
pub struct ConversionOutput {
    /// The reconstructed Markdown document.
    pub markdown: String,
    /// Images extracted from the document, in page order.
    pub images: Vec<ExtractedImage>,
    /// Non-fatal problems encountered along the way (skipped pages, unknown
    /// filters, font-less glyphs), in the order they occurred.
    pub warnings: Vec<String>,
}

/// Options controlling how a document is converted.
///
/// All fields have sensible defaults reflecting what most callers want;
/// `ConvertOptions::default()` is the common case.
#[derive(Clone)]
pub struct ConvertOptions {
    /// Detect and drop text that repeats on most pages at the same Y
    /// position (running headers/footers). On by default.
    pub strip_headers_footers: bool,
    /// Intended to drop standalone page-number lines. No caller-supplied
    /// filter is plugged in yet, so this is currently a documented no-op;
    /// callers who need this should post-filter `ConversionOutput::markdown`.
    pub strip_page_numbers: bool,
    /// Intended to drop a detected table of contents. Like
    /// `strip_page_numbers`, this has no effect until a filter is supplied
    /// and is kept only so the option table matches the public contract.
    pub strip_toc: bool,
    /// Drop footnote markers and the trailing `## Footnotes` block.
    pub strip_footnotes: bool,
    /// Drop pages that contribute fewer than two meaningful layout items
    /// and are not themselves scanned-image pages.
    pub strip_blank_pages: bool,
    /// Recognize bulleted and ordered lists and render them as Markdown
    /// lists instead of plain paragraphs.
    pub detect_lists: bool,
    /// Recognize headings by font size/height and render them as `#`..`######`.
    pub detect_headings: bool,
    /// Preserve bold/italic emphasis recovered from font names.
    pub preserve_formatting: bool,
    /// Extract embedded raster images as [`ExtractedImage`] entries with
    /// `![id]` placeholders in the markdown.
    pub extract_images: bool,
    /// Detect pages that are just a scanned image (little or no extractable
    /// text, one image covering most of the page) and emit a placeholder
    /// instead of garbage OCR-free text.
    pub scan_mode: bool,
    /// String inserted between pages in the assembled markdown.
    pub page_separator: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            strip_headers_footers: true,
            strip_page_numbers: false,
            strip_toc: false,
            strip_footnotes: false,
            strip_blank_pages: true,
            detect_lists: true,
            detect_headings: true,
            preserve_formatting: true,
            extract_images: true,
            scan_mode: true,
            page_separator: "\n".to_string(),
        }
    }
}

impl fmt::Debug for ConvertOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertOptions")
            .field("strip_headers_footers", &self.strip_headers_footers)
            .field("strip_page_numbers", &self.strip_page_numbers)
            .field("strip_toc", &self.strip_toc)
            .field("strip_footnotes", &self.strip_footnotes)
            .field("strip_blank_pages", &self.strip_blank_pages)
            .field("detect_lists", &self.detect_lists)
            .field("detect_headings", &self.detect_headings)
            .field("preserve_formatting", &self.preserve_formatting)
            .field("extract_images", &self.extract_images)
            .field("scan_mode", &self.scan_mode)
            .field("page_separator", &self.page_separator)
            .finish()
    }
}

/// Opt-in progress callbacks invoked during conversion. All fields default
/// to no-ops; set the ones you care about.
#[derive(Default)]
pub struct ProgressHooks {
    /// Called after page `index` of `total` pages has been parsed.
    pub on_page_parsed: Option<Box<dyn FnMut(usize, usize)>>,
    /// Called the first time a font with the given base name is loaded.
    pub on_font_parsed: Option<Box<dyn FnMut(&str)>>,
    /// Called when a page is skipped entirely, with a human-readable reason.
    pub on_page_skipped: Option<Box<dyn FnMut(usize, &str)>>,
    /// Called once after the whole document has been converted.
    pub on_conversion_complete: Option<Box<dyn FnMut()>>,
}

impl fmt::Debug for ProgressHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressHooks")
            .field("on_page_parsed", &self.on_page_parsed.is_some())
            .field("on_font_parsed", &self.on_font_parsed.is_some())
            .field("on_page_skipped", &self.on_page_skipped.is_some())
            .field("on_conversion_complete", &self.on_conversion_complete.is_some())
            .finish()
    }
}

impl ProgressHooks {
    /// A set of hooks that do nothing. Equivalent to `Default::default()`.
    pub fn none() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_match_spec_table() {
        let opts = ConvertOptions::default();
        assert!(opts.strip_headers_footers);
        assert!(!opts.strip_page_numbers);
        assert!(!opts.strip_toc);
        assert!(!opts.strip_footnotes);
        assert!(opts.strip_blank_pages);
        assert!(opts.detect_lists);
        assert!(opts.detect_headings);
        assert!(opts.preserve_formatting);
        assert!(opts.extract_images);
        assert!(opts.scan_mode);
        assert_eq!(opts.page_separator, "\n");
    }

    #[test]
    fn test_image_format_display() {
        assert_eq!(ImageFormat::Jpeg.to_string(), "jpeg");
        assert_eq!(ImageFormat::Png.to_string(), "png");
        assert_eq!(ImageFormat::Jp2.to_string(), "jp2");
        assert_eq!(ImageFormat::Bin.to_string(), "bin");
    }

    #[test]
    fn test_progress_hooks_default_is_silent() {
        let hooks = ProgressHooks::none();
        assert!(hooks.on_page_parsed.is_none());
        assert!(hooks.on_conversion_complete.is_none());
    }
}
