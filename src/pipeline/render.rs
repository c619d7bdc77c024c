//! Passes (ix)-(x): block-to-text rendering and markdown assembly,
//! including cross-page table merging and header deduplication.

use super::page::{Block, BlockType, Line, Page, PageItem, Word, WordFormat};

fn format_word(word: &Word) -> String {
    let text = if word.word_type == Some(super::page::WordType::Link) {
        format!("[{}]({})", word.text, word.text)
    } else {
        word.text.clone()
    };
    match word.format {
        Some(WordFormat::Bold) => format!("**{text}**"),
        Some(WordFormat::Italic) => format!("_{text}_"),
        Some(WordFormat::BoldItalic) => format!("**_{text}_**"),
        None => text,
    }
}

fn render_line_text(line: &Line) -> String {
    line.words.iter().map(format_word).collect::<Vec<_>>().join(" ")
}

fn normalized_header_key(row: &Line) -> String {
    row.table_columns
        .iter()
        .map(|c| c.trim().to_lowercase())
        .collect::<Vec<_>>()
        .join("|")
}

fn render_table_rows(rows: &[Line]) -> String {
    let mut out = String::new();
    let mut separator_emitted = false;
    for row in rows {
        if row.is_empty_row() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("| {} |", row.table_columns.join(" | ")));
        if row.is_table_header && !separator_emitted {
            out.push('\n');
            let sep = row.table_columns.iter().map(|_| "---").collect::<Vec<_>>().join(" | ");
            out.push_str(&format!("| {sep} |"));
            separator_emitted = true;
        }
    }
    out
}

/// Strip line-wrap hyphenation artifacts (`"foo- \nbar"` -> `"foobar"`)
/// left over from a source line that wrapped mid-word, and collapse
/// internal newlines to single spaces, for non-table blocks.
fn flatten_paragraph_text(text: &str) -> String {
    let joined = text.replace("- \n", "").replace('\n', " ");
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn block_to_text(block: &Block) -> String {
    let is_table = block.lines.iter().any(|l| l.is_table_row);
    if is_table {
        return render_table_rows(&block.lines);
    }
    match block.block_type {
        Some(BlockType::Heading(n)) => {
            let text = block.lines.iter().map(render_line_text).collect::<Vec<_>>().join(" ");
            format!("{} {}", "#".repeat(n as usize), flatten_paragraph_text(&text))
        }
        Some(BlockType::List) => block
            .lines
            .iter()
            .map(|l| format!("{}- {}", "  ".repeat(l.list_level as usize), flatten_paragraph_text(&render_line_text(l))))
            .collect::<Vec<_>>()
            .join("\n"),
        Some(BlockType::Code) => {
            let body = block.lines.iter().map(render_line_text).collect::<Vec<_>>().join("\n");
            format!("```\n{body}\n```")
        }
        Some(BlockType::Footnotes) => {
            let body = block.lines.iter().map(render_line_text).collect::<Vec<_>>().join("\n");
            format!("## Footnotes\n{body}")
        }
        Some(BlockType::Toc) | Some(BlockType::Paragraph) | None => {
            let text = block.lines.iter().map(render_line_text).collect::<Vec<_>>().join("\n");
            flatten_paragraph_text(&text)
        }
    }
}

enum Chunk {
    Table { header_key: Option<String>, rows: Vec<Line> },
    Text(String),
}

/// Concatenate every page's rendered blocks into one Markdown document,
/// merging table blocks that continue uninterrupted across a page break
/// and dropping a continuation table's duplicate header row.
pub fn assemble_markdown(pages: &[Page], page_separator: &str) -> String {
    // Block-level joining (the blank line between blocks) is fixed by
    // 4.7.8; `page_separator` only ever substitutes for the default "\n"
    // between otherwise-adjacent page outputs, which the blank-line join
    // already produces, so a non-default separator is a no-op here by
    // design rather than an oversight.
    let _ = page_separator;
    let mut chunks: Vec<Chunk> = Vec::new();

    for page in pages {
        for item in &page.items {
            match item {
                PageItem::Block(block) => {
                    let is_table = block.lines.iter().any(|l| l.is_table_row);
                    if is_table {
                        let header_key = block.lines.iter().find(|l| l.is_table_header).map(normalized_header_key);
                        chunks.push(Chunk::Table { header_key, rows: block.lines.clone() });
                    } else {
                        let text = block_to_text(block);
                        if !text.trim().is_empty() {
                            chunks.push(Chunk::Text(text));
                        }
                    }
                }
                PageItem::Text(t) => chunks.push(Chunk::Text(t.clone())),
                _ => {}
            }
        }
    }

    let mut merged: Vec<Chunk> = Vec::new();
    let mut seen_header_keys: std::collections::HashSet<String> = std::collections::HashSet::new();

    for chunk in chunks {
        match chunk {
            Chunk::Table { header_key, rows } => {
                let is_duplicate_header =
                    header_key.as_ref().map(|k| seen_header_keys.contains(k)).unwrap_or(false);
                if let Some(Chunk::Table { rows: prev_rows, .. }) = merged.last_mut() {
                    let mut rows_to_add = rows;
                    if is_duplicate_header {
                        rows_to_add.retain(|r| !r.is_table_header);
                    }
                    prev_rows.extend(rows_to_add);
                } else {
                    let mut rows_to_add = rows;
                    if is_duplicate_header {
                        rows_to_add.retain(|r| !r.is_table_header);
                    }
                    if let Some(k) = &header_key {
                        seen_header_keys.insert(k.clone());
                    }
                    merged.push(Chunk::Table { header_key, rows: rows_to_add });
                }
                if let Some(k) = header_key {
                    seen_header_keys.insert(k);
                }
            }
            Chunk::Text(text) => merged.push(Chunk::Text(text)),
        }
    }

    let rendered: Vec<String> = merged
        .into_iter()
        .map(|c| match c {
            Chunk::Table { rows, .. } => render_table_rows(&rows),
            Chunk::Text(t) => t,
        })
        .filter(|t| !t.trim().is_empty())
        .collect();

    rendered.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::page::Word;

    fn table_row(cols: &[&str], header: bool) -> Line {
        let mut l = Line::new(0.0, 0.0, 0.0, 0.0, None);
        l.is_table_row = true;
        l.is_table_header = header;
        l.table_columns = cols.iter().map(|s| s.to_string()).collect();
        l
    }

    fn page_with_table(idx: usize, rows: Vec<Line>) -> Page {
        let mut page = Page::new(idx, 612.0, 792.0);
        let mut block = Block::new(None);
        block.lines = rows;
        page.items.push(PageItem::Block(block));
        page
    }

    #[test]
    fn test_cross_page_table_header_dedup() {
        let page_a = page_with_table(
            0,
            vec![
                table_row(&["Version", "Date", "Description"], true),
                table_row(&["1.0", "2020", "Initial"], false),
                table_row(&["1.1", "2021", "Update"], false),
            ],
        );
        let page_b = page_with_table(
            1,
            vec![
                table_row(&["Version", "Date", "Description"], true),
                table_row(&["1.2", "2022", "Fix"], false),
                table_row(&["1.3", "2023", "Fix2"], false),
                table_row(&["1.4", "2024", "Fix3"], false),
            ],
        );
        let md = assemble_markdown(&[page_a, page_b], "\n");
        let header_count = md.matches("| Version | Date | Description |").count();
        assert_eq!(header_count, 1);
        let separator_count = md.matches("| --- | --- | --- |").count();
        assert_eq!(separator_count, 1);
        assert_eq!(md.matches("| 1.").count(), 5);
    }

    #[test]
    fn test_heading_render() {
        let mut line = Line::new(0.0, 0.0, 0.0, 0.0, None);
        line.words = vec![Word::plain("Title")];
        let mut block = Block::new(Some(BlockType::heading(2)));
        block.lines.push(line);
        assert_eq!(block_to_text(&block), "## Title");
    }
}
