//! Named thresholds used throughout the layout pipeline.
//!
//! These numbers are load-bearing: tests assert on them directly, and
//! tuning one without a corpus regression run is how layout heuristics
//! quietly break. Collected here instead of inlined so a future maintainer
//! has one place to look.

/// Minimum number of items in a Y bucket to be considered a table header row.
pub const TABLE_HEADER_MIN_ITEMS: usize = 2;
/// Maximum number of items in a Y bucket to be considered a table header row.
pub const TABLE_HEADER_MAX_ITEMS: usize = 6;
/// Header cell text longer than this many characters disqualifies the row.
pub const TABLE_HEADER_MAX_CELL_LEN: usize = 30;
/// Minimum horizontal gap between header-row items, in points.
pub const TABLE_HEADER_MIN_GAP: f32 = 40.0;
/// Column-alignment tolerance, in points.
pub const TABLE_COLUMN_TOLERANCE: f32 = 20.0;

/// Minimum length of a `[XXX]` reference-style token.
pub const REFERENCE_TOKEN_MIN_LEN: usize = 3;
/// Maximum length of a `[XXX]` reference-style token.
pub const REFERENCE_TOKEN_MAX_LEN: usize = 10;
/// Minimum count of reference-style tokens to declare a two-column table.
pub const REFERENCE_TABLE_MIN_ITEMS: usize = 3;
/// Fraction of reference tokens that must share a column X.
pub const REFERENCE_TABLE_MIN_ALIGNMENT_FRACTION: f32 = 0.8;
/// Minimum horizontal gap from the reference column to the description column.
pub const REFERENCE_TABLE_MIN_DESC_GAP: f32 = 30.0;

/// Minimum horizontal gap between items in an aligned-run candidate row.
pub const ALIGNED_RUN_MIN_GAP: f32 = 40.0;
/// Column-alignment tolerance across aligned-run rows, in points.
pub const ALIGNED_RUN_COLUMN_TOLERANCE: f32 = 40.0;
/// Minimum number of consecutive aligned rows to declare a table region.
pub const ALIGNED_RUN_MIN_ROWS: usize = 3;
/// Reject an aligned-run candidate whose average items-per-row, divided by
/// column count, exceeds this (paragraph text masquerading as a table).
pub const ALIGNED_RUN_MAX_DENSITY: f32 = 2.5;

/// Fraction of right-column items starting lowercase/attaching punctuation
/// above which a candidate two-column region is treated as page layout,
/// not a table.
pub const PAGE_LAYOUT_LOWERCASE_FRACTION: f32 = 0.3;

/// Default modal inter-line distance when no histogram data is available.
pub const DEFAULT_MOST_USED_DISTANCE: f32 = 12.0;

/// Vertical tolerance for "same visual line" when compacting table rows.
pub fn table_row_y_tolerance(most_used_distance: f32) -> f32 {
    (3.0 * most_used_distance).max(35.0)
}
/// Y-gap threshold for starting a new non-table line.
pub fn line_break_threshold(most_used_distance: f32) -> f32 {
    most_used_distance / 2.0
}

/// Dynamic word-space gap threshold, scaled by font size.
pub const WORD_SPACE_FONT_SIZE_MULTIPLIER: f32 = 3.0;
/// Gap threshold between alphanumeric and punctuation runs, in points.
pub const ALNUM_PUNCT_GAP: f32 = 30.0;
/// Gap threshold at a symbol boundary, in points.
pub const SYMBOL_GAP: f32 = 10.0;

/// TJ numeric spacing magnitude (thousandths of em) above which a space is
/// inserted between accumulated text fragments.
pub const TJ_SPACE_THRESHOLD: f32 = 300.0;

/// List indent step, in points, per `list_level` increment.
pub const LIST_INDENT_STEP: f32 = 20.0;
/// Maximum `list_level`.
pub const LIST_LEVEL_MAX: u8 = 6;

/// Block flush threshold for untyped lines, added to `most_used_distance`.
pub const BLOCK_FLUSH_EXTRA_GAP: f32 = 1.0;
/// Block flush multiplier when both lines are indented past the page minimum X.
pub const BLOCK_FLUSH_INDENTED_MULTIPLIER: f32 = 1.5;

/// Minimum repeated-page fraction for header/footer removal:
/// `max(3, ceil(2 * page_count / 3))`.
pub fn repetition_threshold(page_count: usize) -> usize {
    3.max(page_count.div_ceil(3) * 2 / 2).max((2 * page_count).div_ceil(3))
}

/// Minimum font height for heading detection to be considered trustworthy.
pub const MIN_HEIGHT_FOR_HEADINGS: f32 = 8.0;

/// Known non-bullet/non-footnote short words that never force a word split
/// when they appear as a short lowercase fragment glued to a prior word.
pub const SHORT_STANDALONE_WORDS: &[&str] = &["a", "an", "to", "of", "in", "on", "at", "is", "it"];

/// Bullet glyphs recognized as unordered-list markers.
pub const BULLET_CHARS: &[char] =
    &['-', '\u{2022}', '\u{2013}', '\u{2014}', '\u{25E6}', '\u{25CB}', '\u{25CF}', '\u{25AA}', '\u{25A0}', '\u{25A1}', '\u{25B8}'];

/// Known man-page-style identifiers that must never be promoted from a
/// trailing `(n)` suffix into a footnote reference `prefix[^n]`. Preserved
/// verbatim rather than expanded or narrowed without a corpus study.
pub const FOOTNOTE_PROMOTION_BLACKLIST: &[&str] =
    &["time", "printf", "read", "write", "open", "close", "man", "ls", "cd", "sh"];

/// Fixed header strings recognized to accept continuation tables with fewer
/// aligned rows than the usual `2 * column_count` requirement.
pub const KNOWN_TABLE_HEADERS: &[&str] = &["Version Date Description", "Version | Date | Description"];

/// Scanned-page detection: total non-whitespace text length below which a
/// page is a scanned-page candidate.
pub const SCANNED_PAGE_MAX_TEXT_LEN: usize = 100;
/// Scanned-page detection: image width/height fraction of the page above
/// which the page is considered scanned.
pub const SCANNED_PAGE_IMAGE_FRACTION: f32 = 0.5;
/// Scanned-page detection: image dimension (px) above which the page is
/// considered scanned regardless of fraction.
pub const SCANNED_PAGE_IMAGE_MIN_PX: u32 = 500;
