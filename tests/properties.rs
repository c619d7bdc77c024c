//! Quantified invariants from the layout pipeline's design notes, checked
//! against randomly generated inputs rather than single fixed examples.

use proptest::prelude::*;

use pdfmd::content::TextRun;
use pdfmd::fonts::parse_tounicode_cmap;
use pdfmd::pipeline::line::compact_lines;
use pdfmd::pipeline::Globals;

proptest! {
    /// After `CompactLines`, for any two adjacent Lines `a, b` on the same
    /// page, `a.y <= b.y` — the pass always finishes with a single global
    /// sort by `y`, regardless of how runs were grouped into rows.
    #[test]
    fn compact_lines_output_is_y_monotonic(
        ys in prop::collection::vec(-500.0f32..2000.0, 0..40),
    ) {
        let runs: Vec<TextRun> = ys
            .iter()
            .enumerate()
            .map(|(i, &y)| TextRun::new(40.0 + (i as f32 % 3.0) * 5.0, y, 50.0, 12.0, format!("word{i}"), Some("F1".into()), 12.0))
            .collect();
        let globals = Globals { most_used_distance: 14.0, ..Globals::default() };
        let lines = compact_lines(runs, &globals);
        for pair in lines.windows(2) {
            prop_assert!(pair[0].y <= pair[1].y + f32::EPSILON);
        }
    }

    /// `DecodeString(CMap, encode(s)) == s` for any contiguous run of codes
    /// covered by a single `bfrange` entry.
    #[test]
    fn cmap_bfrange_round_trips_over_its_range(offset in 0u32..26) {
        let data = b"beginbfrange\n<0041> <005A> <0061>\nendbfrange";
        let cmap = parse_tounicode_cmap(data).unwrap();
        let code = 0x41 + offset;
        let expected = char::from_u32(0x61 + offset).unwrap().to_string();
        prop_assert_eq!(cmap.get(&code), Some(&expected));
        prop_assert_eq!(cmap.decode_string(&[code as u8]), expected);
    }
}
