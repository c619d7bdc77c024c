//! The six literal boundary scenarios from the layout pipeline's design
//! notes. Scenarios 3-6 (reference tables, bullet indent rewriting,
//! cross-page table dedup, hyphenated line continuation) are exercised as
//! unit tests alongside the pipeline passes that implement them
//! (`src/pipeline/block.rs`, `src/pipeline/lists.rs`,
//! `src/pipeline/line.rs`, `src/pipeline/render.rs`); the two that need a
//! whole document or font context live here.

use std::io::Cursor;

use pdfmd::fonts::parse_tounicode_cmap;
use pdfmd::xref::find_xref_offset;

/// Scenario 1: a linearised PDF carries two `startxref` tokens — an early
/// one pointing at the linearisation dictionary's own (non-authoritative)
/// xref, and a second, later one pointing at the classic xref table that
/// actually describes the file. The authoritative offset is always the
/// last `startxref` in the file, never the first.
#[test]
fn linearised_pdf_uses_last_startxref_as_authoritative() {
    let pdf = b"%PDF-1.7\n\
        1 0 obj\n<< /Linearized 1 >>\nendobj\n\
        xref\n0 1\n0000000000 65535 f \n\
        trailer\n<< /Size 1 >>\n\
        startxref\n9\n\
        %%EOF\n\
        2 0 obj\n<< /Type /Catalog >>\nendobj\n\
        xref\n0 1\n0000000000 65535 f \n\
        trailer\n<< /Size 1 /Root 2 0 R >>\n\
        startxref\n123\n\
        %%EOF";
    let mut cursor = Cursor::new(pdf.as_slice());
    let offset = find_xref_offset(&mut cursor).unwrap();
    assert_eq!(offset, 123, "must resolve to the second (authoritative) startxref, not the first");
}

/// Scenario 2: a `bfrange` entry `<0041> <0043> <0061>` maps codes
/// 0x41, 0x42, 0x43 to "a", "b", "c"; decoding the two-code string
/// `[0x41, 0x42]` must yield `"ab"`.
#[test]
fn cmap_bfrange_decodes_contiguous_codes() {
    let data = b"beginbfrange\n<0041> <0043> <0061>\nendbfrange";
    let cmap = parse_tounicode_cmap(data).unwrap();
    assert_eq!(cmap.get(&0x41), Some(&"a".to_string()));
    assert_eq!(cmap.get(&0x42), Some(&"b".to_string()));
    assert_eq!(cmap.get(&0x43), Some(&"c".to_string()));
    assert_eq!(cmap.decode_string(&[0x41, 0x42]), "ab");
}
