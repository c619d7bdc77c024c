//! The data model the layout pipeline threads through its passes:
//! `TextRun -> Line -> Block -> String`.

use crate::content::TextRun;

/// Heading level 1-6, or one of the other structural line types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Heading(u8),
    List,
    Toc,
    Footnotes,
    Code,
    Paragraph,
}

impl BlockType {
    pub fn heading(level: u8) -> Self {
        BlockType::Heading(level.clamp(1, 6))
    }

    pub fn as_heading_level(&self) -> Option<u8> {
        match self {
            BlockType::Heading(n) => Some(*n),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    Added,
    Removed,
    Detected,
    Modified,
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordType {
    Link,
    FootnoteRef,
    Footnote,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordFormat {
    Bold,
    Italic,
    BoldItalic,
}

#[derive(Debug, Clone, Default)]
pub struct Word {
    pub text: String,
    pub word_type: Option<WordType>,
    pub format: Option<WordFormat>,
}

impl Word {
    pub fn plain(text: impl Into<String>) -> Self {
        Word { text: text.into(), word_type: None, format: None }
    }
}

/// Per-line footnote/link bookkeeping, populated during compaction.
#[derive(Debug, Clone, Default)]
pub struct ParsedElements {
    pub has_footnote_link: bool,
    pub is_link_line: bool,
    pub formatted_word_count: usize,
}

#[derive(Debug, Clone)]
pub struct Line {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub font: Option<String>,
    pub words: Vec<Word>,
    pub block_type: Option<BlockType>,
    pub annotation: Option<Annotation>,
    pub parsed: Option<ParsedElements>,
    pub is_table_row: bool,
    pub is_table_header: bool,
    pub table_columns: Vec<String>,
    pub list_level: u8,
}

impl Line {
    pub fn new(x: f32, y: f32, width: f32, height: f32, font: Option<String>) -> Self {
        Line {
            x,
            y,
            width,
            height,
            font,
            words: Vec::new(),
            block_type: None,
            annotation: None,
            parsed: None,
            is_table_row: false,
            is_table_header: false,
            table_columns: Vec::new(),
            list_level: 0,
        }
    }

    pub fn text(&self) -> String {
        self.words.iter().map(|w| w.text.as_str()).collect::<Vec<_>>().join(" ")
    }

    pub fn is_empty_row(&self) -> bool {
        self.is_table_row && self.table_columns.iter().all(|c| c.trim().is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct Block {
    pub lines: Vec<Line>,
    pub block_type: Option<BlockType>,
    pub parsed: Option<ParsedElements>,
}

impl Block {
    pub fn new(block_type: Option<BlockType>) -> Self {
        Block { lines: Vec::new(), block_type, parsed: None }
    }

    /// Whether `other` may be appended to this block without violating the
    /// one-type-per-block invariant.
    pub fn accepts(&self, other: Option<BlockType>) -> bool {
        match (self.block_type, other) {
            (None, _) => true,
            (Some(_), None) => true,
            (Some(a), Some(b)) => a == b,
        }
    }
}

#[derive(Debug, Clone)]
pub enum PageItem {
    Run(TextRun),
    Line(Line),
    Block(Block),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Page {
    pub index: usize,
    pub width: f32,
    pub height: f32,
    pub is_scanned: bool,
    pub scanned_image_id: Option<String>,
    pub items: Vec<PageItem>,
}

impl Page {
    pub fn new(index: usize, width: f32, height: f32) -> Self {
        Page { index, width, height, is_scanned: false, scanned_image_id: None, items: Vec::new() }
    }

    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.items.iter().filter_map(|item| match item {
            PageItem::Run(r) => Some(r),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.items.iter().filter_map(|item| match item {
            PageItem::Line(l) => Some(l),
            _ => None,
        })
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.items.iter().filter_map(|item| match item {
            PageItem::Block(b) => Some(b),
            _ => None,
        })
    }
}
