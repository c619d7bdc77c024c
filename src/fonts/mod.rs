//! Font handling and encoding.
//!
//! This module provides font dictionary parsing, encoding handling,
//! and ToUnicode CMap parsing for accurate text extraction.

pub mod cmap;
/// Character-code-to-Unicode decoding for simple fonts (WinAnsi/MacRoman/Symbol/ToUnicode).
pub mod decode;
pub mod font_dict;

pub use cmap::{parse_tounicode_cmap, CMap, LazyCMap};
pub use decode::decode_font_string;
pub use font_dict::{CIDSystemInfo, CIDToGIDMap, Encoding, FontInfo};
