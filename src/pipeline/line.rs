//! Pass (ii): line compaction with table-region detection.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::content::TextRun;

use super::constants::*;
use super::page::{Line, ParsedElements, Word, WordType};
use super::stats::Globals;

lazy_static! {
    static ref REFERENCE_TOKEN: Regex = Regex::new(r"^\[[^\[\]]{3,10}\]$").unwrap();
    static ref ORDINAL_NUMBER: Regex = Regex::new(r"^\d+\.?$").unwrap();
    static ref PAREN_FOOTNOTE: Regex = Regex::new(r"^(.*[A-Za-z0-9])\((\d{1,2})\)$").unwrap();
    static ref SENTENCE_END: Regex = Regex::new(r"[.!?]$").unwrap();
}

/// A detected rectangular table region on a page, in the header-based /
/// aligned-run / reference-style sense: a Y span plus the X position of
/// each of its columns.
#[derive(Debug, Clone)]
struct TableRegion {
    min_y: f32,
    max_y: f32,
    columns: Vec<f32>,
    header_y: Option<f32>,
}

impl TableRegion {
    fn contains_y(&self, y: f32) -> bool {
        y >= self.min_y - 1.0 && y <= self.max_y + 1.0
    }

    fn column_index(&self, x: f32) -> usize {
        let mut best = 0;
        let mut best_dist = f32::MAX;
        for (i, col_x) in self.columns.iter().enumerate() {
            let d = (x - col_x).abs();
            if d < best_dist {
                best_dist = d;
                best = i;
            }
        }
        best
    }
}

/// Remove runs with negative X and those that form a repetitive
/// 1-4 word watermark/metadata phrase recurring more than five times.
fn filter_noise(runs: Vec<TextRun>) -> Vec<TextRun> {
    let mut phrase_counts: HashMap<String, usize> = HashMap::new();
    for run in &runs {
        let words: Vec<&str> = run.text.split_whitespace().collect();
        if words.is_empty() || words.len() > 4 {
            continue;
        }
        let key = words.join(" ").to_lowercase();
        *phrase_counts.entry(key).or_default() += 1;
    }
    runs.into_iter()
        .filter(|r| {
            if r.x < 0.0 {
                return false;
            }
            let words: Vec<&str> = r.text.split_whitespace().collect();
            if words.is_empty() || words.len() > 4 {
                return true;
            }
            let key = words.join(" ").to_lowercase();
            phrase_counts.get(&key).copied().unwrap_or(0) <= 5
        })
        .collect()
}

/// Bucket runs by rounded Y into candidate "rows".
fn bucket_by_y<'a>(runs: &[&'a TextRun]) -> Vec<(f32, Vec<&'a TextRun>)> {
    let mut buckets: Vec<(f32, Vec<&TextRun>)> = Vec::new();
    for run in runs {
        if let Some(bucket) = buckets.iter_mut().find(|(y, _)| (*y - run.y).abs() < 3.0) {
            bucket.1.push(run);
        } else {
            buckets.push((run.y, vec![run]));
        }
    }
    buckets.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    buckets
}

/// Strategy 2: `[XXX]`-style reference tokens in a left column paired with
/// a description column to their right.
fn detect_reference_style_table(runs: &[&TextRun]) -> Option<TableRegion> {
    let tokens: Vec<&&TextRun> = runs.iter().filter(|r| REFERENCE_TOKEN.is_match(r.text.trim())).collect();
    if tokens.len() < REFERENCE_TABLE_MIN_ITEMS {
        return None;
    }
    let mut x_counts: HashMap<i32, usize> = HashMap::new();
    for t in &tokens {
        *x_counts.entry(t.x.round() as i32).or_default() += 1;
    }
    let (ref_x, ref_count) = x_counts.into_iter().max_by_key(|(_, c)| *c)?;
    let fraction = ref_count as f32 / tokens.len() as f32;
    if fraction < REFERENCE_TABLE_MIN_ALIGNMENT_FRACTION {
        return None;
    }
    let ref_x = ref_x as f32;
    let aligned: Vec<&&TextRun> = tokens.into_iter().filter(|t| (t.x - ref_x).abs() <= TABLE_COLUMN_TOLERANCE).collect();

    let mut desc_x = f32::MAX;
    for t in &aligned {
        for c in runs.iter().filter(|r| (r.y - t.y).abs() < 3.0 && r.x > ref_x + REFERENCE_TABLE_MIN_DESC_GAP) {
            if c.x < desc_x {
                desc_x = c.x;
            }
        }
    }
    if desc_x == f32::MAX {
        return None;
    }

    let min_y = aligned.iter().map(|t| t.y).fold(f32::MAX, f32::min);
    let max_y = aligned.iter().map(|t| t.y).fold(f32::MIN, f32::max);
    Some(TableRegion { min_y, max_y, columns: vec![ref_x, desc_x], header_y: None })
}

/// Strategy 1: a header row of 2-6 short, widely-spaced items, with at
/// least `2 * columns` other items aligned to those columns.
fn detect_header_style_table(runs: &[&TextRun]) -> Option<TableRegion> {
    let buckets = bucket_by_y(runs);
    let mut best: Option<(f32, Vec<f32>)> = None;
    let mut best_score = f32::MIN;
    for (y, items) in &buckets {
        if items.len() < TABLE_HEADER_MIN_ITEMS || items.len() > TABLE_HEADER_MAX_ITEMS {
            continue;
        }
        if items.iter().any(|i| i.text.trim().len() > TABLE_HEADER_MAX_CELL_LEN) {
            continue;
        }
        let mut xs: Vec<f32> = items.iter().map(|i| i.x).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let spaced = xs.windows(2).all(|w| w[1] - w[0] >= TABLE_HEADER_MIN_GAP);
        if !spaced {
            continue;
        }
        let score = xs.len() as f32 * 100.0 - y / 10.0;
        if score > best_score {
            best_score = score;
            best = Some((*y, xs));
        }
    }
    let (header_y, columns) = best?;
    let known_header = runs
        .iter()
        .filter(|r| (r.y - header_y).abs() < 3.0)
        .map(|r| r.text.trim())
        .collect::<Vec<_>>()
        .join(" ");
    let is_known = KNOWN_TABLE_HEADERS.iter().any(|h| known_header.contains(h));

    let aligned_rows: Vec<f32> = buckets
        .iter()
        .filter(|(y, _)| (*y - header_y).abs() > 3.0)
        .filter(|(_, items)| {
            items.iter().any(|item| columns.iter().any(|c| (item.x - c).abs() <= TABLE_COLUMN_TOLERANCE))
        })
        .map(|(y, _)| *y)
        .collect();

    let required = if is_known { 1 } else { 2 * columns.len() };
    if aligned_rows.len() < required {
        return None;
    }

    let min_y = header_y.min(aligned_rows.iter().cloned().fold(f32::MAX, f32::min));
    let max_y = header_y.max(aligned_rows.iter().cloned().fold(f32::MIN, f32::max));
    Some(TableRegion { min_y, max_y, columns, header_y: Some(header_y) })
}

/// Strategy 3: 3+ consecutive Y-buckets, each with 2+ widely-spaced items,
/// whose column X positions line up across rows.
fn detect_aligned_run_table(runs: &[&TextRun]) -> Option<TableRegion> {
    let buckets = bucket_by_y(runs);
    let mut candidate_rows: Vec<(f32, Vec<f32>)> = Vec::new();
    for (y, items) in &buckets {
        let mut xs: Vec<f32> = items.iter().map(|i| i.x).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        if xs.len() < 2 {
            continue;
        }
        let spaced = xs.windows(2).all(|w| w[1] - w[0] >= ALIGNED_RUN_MIN_GAP);
        if spaced {
            candidate_rows.push((*y, xs));
        }
    }
    if candidate_rows.len() < ALIGNED_RUN_MIN_ROWS {
        return None;
    }

    let mut best_run: Option<Vec<(f32, Vec<f32>)>> = None;
    let mut i = 0;
    while i < candidate_rows.len() {
        let mut run = vec![candidate_rows[i].clone()];
        let mut j = i + 1;
        while j < candidate_rows.len() {
            let aligns = run.last().unwrap().1.len() == candidate_rows[j].1.len()
                && run
                    .last()
                    .unwrap()
                    .1
                    .iter()
                    .zip(candidate_rows[j].1.iter())
                    .all(|(a, b)| (a - b).abs() <= ALIGNED_RUN_COLUMN_TOLERANCE);
            if !aligns {
                break;
            }
            run.push(candidate_rows[j].clone());
            j += 1;
        }
        if run.len() >= ALIGNED_RUN_MIN_ROWS && best_run.as_ref().map(|b| run.len() > b.len()).unwrap_or(true) {
            best_run = Some(run.clone());
        }
        i = j.max(i + 1);
    }

    let run = best_run?;
    let columns = run[0].1.clone();
    let total_items: usize = run.iter().map(|(_, xs)| xs.len()).sum();
    let density = (total_items as f32 / run.len() as f32) / columns.len() as f32;
    if density > ALIGNED_RUN_MAX_DENSITY {
        return None;
    }
    let min_y = run.iter().map(|(y, _)| *y).fold(f32::MAX, f32::min);
    let max_y = run.iter().map(|(y, _)| *y).fold(f32::MIN, f32::max);
    Some(TableRegion { min_y, max_y, columns, header_y: None })
}

/// Reject a two-column candidate that is actually multi-column page
/// layout: prose wrapping into a second visual column reads with a high
/// fraction of lowercase/attaching-punctuation starts in the right column.
fn looks_like_page_layout(runs: &[&TextRun], region: &TableRegion) -> bool {
    if region.columns.len() != 2 {
        return false;
    }
    let right_col = region.columns[1];
    let right_items: Vec<&&TextRun> = runs
        .iter()
        .filter(|r| region.contains_y(r.y) && (r.x - right_col).abs() <= TABLE_COLUMN_TOLERANCE)
        .collect();
    if right_items.is_empty() {
        return false;
    }
    let lowercase_like = right_items
        .iter()
        .filter(|r| {
            r.text
                .trim()
                .chars()
                .next()
                .map(|c| c.is_lowercase() || ",.;:)".contains(c))
                .unwrap_or(false)
        })
        .count();
    (lowercase_like as f32 / right_items.len() as f32) > PAGE_LAYOUT_LOWERCASE_FRACTION
}

fn detect_table_regions(runs: &[&TextRun]) -> Vec<TableRegion> {
    let mut regions = Vec::new();
    for region in [detect_header_style_table(runs), detect_reference_style_table(runs), detect_aligned_run_table(runs)]
        .into_iter()
        .flatten()
    {
        if looks_like_page_layout(runs, &region) {
            continue;
        }
        let overlaps = regions
            .iter()
            .any(|r: &TableRegion| region.min_y <= r.max_y && r.min_y <= region.max_y);
        if !overlaps {
            regions.push(region);
        }
    }
    regions
}

/// Join two text fragments from the same Line/cell per the spacing rules
/// in the line-compaction pass. `prev` is the text/metrics already
/// accumulated; `next` is the incoming run.
fn join_fragment(acc: &mut String, prev_run: &TextRun, next_run: &TextRun) {
    let prev_text = prev_run.text.trim_end();
    let next_text = next_run.text.trim_start();
    if next_text.is_empty() {
        return;
    }

    let same_visual_line = (prev_run.y - next_run.y).abs() < 10.0 && prev_run.y != next_run.y;
    let hyphen_continuation = prev_text.ends_with('-') || prev_text.ends_with('\u{2013}');
    let short_fragment_glued = next_text.len() <= 3
        && next_text.chars().next().map(|c| c.is_lowercase()).unwrap_or(false)
        && prev_text.chars().last().map(|c| c.is_alphanumeric()).unwrap_or(false)
        && !SHORT_STANDALONE_WORDS.contains(&next_text.to_lowercase().as_str());

    if hyphen_continuation {
        acc.pop();
        acc.push_str(next_text);
        return;
    }
    if same_visual_line || short_fragment_glued {
        acc.push_str(next_text);
        return;
    }

    let gap = next_run.x - prev_run.right();
    let effective_width = if prev_run.width < prev_text.len() as f32 * prev_run.font_size * 0.3 {
        prev_text.len() as f32 * prev_run.font_size * 0.5
    } else {
        prev_run.width
    };
    let real_gap = next_run.x - (prev_run.x + effective_width);

    let prev_alnum = prev_text.chars().last().map(|c| c.is_alphanumeric()).unwrap_or(false);
    let next_alnum = next_text.chars().next().map(|c| c.is_alphanumeric()).unwrap_or(false);
    let prev_sentence_end = SENTENCE_END.is_match(prev_text);
    let prev_apostrophe_s =
        prev_text.ends_with('s') && (prev_text.ends_with("'s") || prev_text.ends_with('\u{2019}'));
    let next_upper = next_text.chars().next().map(|c| c.is_uppercase()).unwrap_or(false);

    let mut add_space = if prev_sentence_end && next_alnum {
        true
    } else if prev_apostrophe_s && next_upper {
        true
    } else if prev_alnum && next_alnum {
        let threshold = prev_run.font_size.max(next_run.font_size) * WORD_SPACE_FONT_SIZE_MULTIPLIER;
        real_gap > threshold || ends_with_short_word(prev_text)
    } else if prev_alnum != next_alnum {
        gap > ALNUM_PUNCT_GAP
    } else {
        gap > SYMBOL_GAP
    };
    // Hyphens/dashes leading the next fragment never introduce a space.
    if next_text.starts_with('-') || next_text.starts_with('\u{2013}') || next_text.starts_with('\u{2014}') {
        add_space = false;
    }

    if add_space {
        acc.push(' ');
    }
    acc.push_str(next_text);
}

fn ends_with_short_word(text: &str) -> bool {
    let lower = text.to_lowercase();
    [" a", " an", " the"].iter().any(|w| lower.ends_with(w))
}

/// Turn a sequence of runs, already decided to belong to one Line/cell,
/// into its combined text.
fn compact_runs_to_text(runs: &[&TextRun]) -> String {
    let mut acc = String::new();
    let mut prev: Option<&TextRun> = None;
    for run in runs {
        if run.text.trim().is_empty() && prev.is_none() {
            continue;
        }
        match prev {
            None => acc.push_str(run.text.trim_start()),
            Some(p) => join_fragment(&mut acc, p, run),
        }
        prev = Some(run);
    }
    acc
}

fn split_into_words(text: &str) -> Vec<Word> {
    text.split_whitespace()
        .map(|tok| {
            let mut word = Word::plain(tok);
            if tok.starts_with("http://") || tok.starts_with("https://") {
                word.word_type = Some(WordType::Link);
            } else if let Some(stripped) = tok.strip_prefix("www.") {
                word.text = format!("http://www.{stripped}");
                word.word_type = Some(WordType::Link);
            }
            word
        })
        .collect()
}

/// Rewrite `prefix(n)` into `prefix[^n]` unless the prefix is a known
/// false-positive identifier (man-page style command names).
fn promote_parenthesised_footnotes(words: &mut [Word]) -> bool {
    let mut promoted = false;
    for word in words.iter_mut() {
        if let Some(caps) = PAREN_FOOTNOTE.captures(&word.text) {
            let prefix = caps.get(1).unwrap().as_str();
            let n: u32 = caps.get(2).unwrap().as_str().parse().unwrap_or(0);
            if n == 0 || n > 99 {
                continue;
            }
            let prefix_lower = prefix.to_lowercase();
            if FOOTNOTE_PROMOTION_BLACKLIST.contains(&prefix_lower.as_str()) {
                continue;
            }
            word.text = format!("{prefix}[^{n}]");
            word.word_type = Some(WordType::FootnoteRef);
            promoted = true;
        }
    }
    promoted
}

/// Mark numeric tokens that sit visually above the line's own baseline as
/// footnote-link superscripts.
fn mark_superscripts(words: &mut [Word], word_ys: &[f32], line_y: f32) {
    for (word, y) in words.iter_mut().zip(word_ys) {
        if ORDINAL_NUMBER.is_match(&word.text) && *y < line_y - 0.5 {
            word.word_type = Some(WordType::FootnoteRef);
        }
    }
}

/// Build one Line (or table row) from a contiguous run group.
fn build_line(runs: Vec<&TextRun>, table_region: Option<&TableRegion>, is_header: bool) -> Line {
    let first = runs[0];
    let x = runs.iter().map(|r| r.x).fold(f32::MAX, f32::min);
    let y = runs.iter().map(|r| r.y).fold(f32::MAX, f32::min);
    let width = runs.iter().map(|r| r.right()).fold(f32::MIN, f32::max) - x;
    let height = runs.iter().map(|r| r.height).fold(0.0, f32::max);
    let mut line = Line::new(x, y, width.max(0.0), height, first.font.clone());

    if let Some(region) = table_region {
        let mut cells: Vec<Vec<&TextRun>> = vec![Vec::new(); region.columns.len()];
        for r in &runs {
            cells[region.column_index(r.x)].push(r);
        }
        for cell in cells.iter_mut() {
            cell.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap().then(a.x.partial_cmp(&b.x).unwrap()));
        }
        line.is_table_row = true;
        line.is_table_header = is_header;
        line.table_columns = cells.iter().map(|c| compact_runs_to_text(c)).collect();
        return line;
    }

    let mut sorted = runs;
    sorted.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap());
    let text = compact_runs_to_text(&sorted);
    let word_ys: Vec<f32> = {
        // approximate per-word Y using the run each word's start offset falls in
        let mut ys = Vec::new();
        for r in &sorted {
            for _ in r.text.split_whitespace() {
                ys.push(r.y);
            }
        }
        ys
    };
    let mut words = split_into_words(&text);
    mark_superscripts(&mut words, &word_ys, y);
    let promoted = promote_parenthesised_footnotes(&mut words);
    let has_link = words.iter().any(|w| w.word_type == Some(WordType::Link));
    line.words = words;
    line.parsed = Some(ParsedElements {
        has_footnote_link: promoted,
        is_link_line: has_link,
        formatted_word_count: 0,
    });
    line
}

/// Group a page's TextRuns into Lines, detecting table regions first.
pub fn compact_lines(runs: Vec<TextRun>, globals: &Globals) -> Vec<Line> {
    let filtered = filter_noise(runs);
    let refs: Vec<&TextRun> = filtered.iter().collect();
    let regions = detect_table_regions(&refs);

    let (table_runs, plain_runs): (Vec<&TextRun>, Vec<&TextRun>) =
        refs.iter().partition(|r| regions.iter().any(|reg| reg.contains_y(r.y)));

    let mut lines = Vec::new();

    for region in &regions {
        let mut region_runs: Vec<&TextRun> =
            table_runs.iter().filter(|r| region.contains_y(r.y)).cloned().collect();
        region_runs.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap());

        let row_tol = table_row_y_tolerance(globals.most_used_distance);
        let mut rows: Vec<Vec<&TextRun>> = Vec::new();
        for run in region_runs {
            if let Some(row) = rows.last_mut() {
                let row_y = row[0].y;
                if (run.y - row_y).abs() <= row_tol {
                    row.push(run);
                    continue;
                }
            }
            rows.push(vec![run]);
        }
        for row in rows {
            let is_header = region.header_y.map(|hy| (row[0].y - hy).abs() < 3.0).unwrap_or(false);
            lines.push(build_line(row, Some(region), is_header));
        }
    }

    let mut plain_sorted = plain_runs;
    plain_sorted.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap());
    let break_threshold = line_break_threshold(globals.most_used_distance);
    let mut groups: Vec<Vec<&TextRun>> = Vec::new();
    for run in plain_sorted {
        if let Some(group) = groups.last_mut() {
            if (run.y - group[0].y).abs() < break_threshold {
                group.push(run);
                continue;
            }
        }
        groups.push(vec![run]);
    }
    for group in groups {
        lines.push(build_line(group, None, false));
    }

    lines.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap());
    lines
}
