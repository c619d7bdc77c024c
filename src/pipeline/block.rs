//! Pass (vii): block gathering.

use super::page::{Block, BlockType, Page, PageItem};
use super::stats::Globals;

/// Walk a page's Lines, grouping them into Blocks. A new block starts on
/// a table/non-table transition, a block-type change that the open
/// block can't absorb, or a large enough Y gap between untyped lines.
pub fn gather_blocks(pages: &mut [Page], globals: &Globals) {
    for page in pages.iter_mut() {
        if page.is_scanned {
            continue;
        }
        let lines: Vec<_> = page
            .items
            .drain(..)
            .filter_map(|item| match item {
                PageItem::Line(l) => Some(l),
                _ => None,
            })
            .collect();

        let min_x = lines.iter().map(|l| l.x).fold(f32::MAX, f32::min);
        let mut blocks: Vec<Block> = Vec::new();
        let mut prev: Option<&super::page::Line> = None;

        for line in &lines {
            let is_table = line.is_table_row;
            let should_flush = match (blocks.last(), prev) {
                (Some(block), Some(p)) => {
                    let table_transition = block.lines.last().map(|l| l.is_table_row).unwrap_or(is_table) != is_table;
                    let type_rejected = !is_table && !block.accepts(line.block_type);
                    let gap = line.y - p.y;
                    let both_indented = p.x > min_x + 1.0 && line.x > min_x + 1.0;
                    let flush_gap = if both_indented {
                        globals.most_used_distance * super::constants::BLOCK_FLUSH_INDENTED_MULTIPLIER
                    } else {
                        globals.most_used_distance + super::constants::BLOCK_FLUSH_EXTRA_GAP
                    };
                    let big_gap = !is_table && gap > flush_gap;
                    let negative_gap = !is_table && gap < -(globals.most_used_distance / 2.0);
                    table_transition || type_rejected || big_gap || negative_gap
                }
                _ => false,
            };

            if should_flush || blocks.is_empty() {
                blocks.push(Block::new(if is_table { None } else { line.block_type }));
            }
            let block = blocks.last_mut().unwrap();
            if block.block_type.is_none() && !is_table {
                block.block_type = line.block_type;
            }
            block.lines.push(line.clone());
            prev = Some(line);
        }

        page.items = blocks.into_iter().map(PageItem::Block).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::page::{Line, Word};

    fn plain_line(y: f32, text: &str) -> Line {
        let mut l = Line::new(40.0, y, 100.0, 12.0, None);
        l.words = text.split_whitespace().map(Word::plain).collect();
        l
    }

    #[test]
    fn test_paragraph_lines_merge_into_one_block() {
        let mut page = Page::new(0, 612.0, 792.0);
        page.items.push(PageItem::Line(plain_line(10.0, "line one")));
        page.items.push(PageItem::Line(plain_line(22.0, "line two")));
        let mut pages = vec![page];
        let globals = Globals { most_used_distance: 12.0, ..Default::default() };
        gather_blocks(&mut pages, &globals);
        assert_eq!(pages[0].items.len(), 1);
    }

    #[test]
    fn test_large_gap_starts_new_block() {
        let mut page = Page::new(0, 612.0, 792.0);
        page.items.push(PageItem::Line(plain_line(10.0, "line one")));
        page.items.push(PageItem::Line(plain_line(200.0, "line two")));
        let mut pages = vec![page];
        let globals = Globals { most_used_distance: 12.0, ..Default::default() };
        gather_blocks(&mut pages, &globals);
        assert_eq!(pages[0].items.len(), 2);
    }

    #[test]
    fn test_block_type_change_forces_new_block() {
        let mut page = Page::new(0, 612.0, 792.0);
        let mut heading = plain_line(10.0, "Heading");
        heading.block_type = Some(BlockType::heading(1));
        let paragraph = plain_line(22.0, "Body text");
        page.items.push(PageItem::Line(heading));
        page.items.push(PageItem::Line(paragraph));
        let mut pages = vec![page];
        let globals = Globals { most_used_distance: 12.0, ..Default::default() };
        gather_blocks(&mut pages, &globals);
        assert_eq!(pages[0].items.len(), 2);
    }
}
