//! Character-code-to-Unicode decoding for simple (non-CID) fonts.
//!
//! Implements the priority chain used when a font's ToUnicode CMap is
//! missing or incomplete: ToUnicode -> WinAnsi -> MacRoman -> Symbol ->
//! UTF-16BE-with-BOM. Each step only fires if the previous one left the
//! string empty or the font's declared encoding calls for it directly.

use super::font_dict::{Encoding, FontInfo};

/// Decode a raw content-stream string shown against `font` (or `None` if the
/// font name could not be resolved in the page's resources) to Unicode text.
///
/// Never panics and never returns an error: an unmapped byte is silently
/// dropped rather than aborting the run, matching the "silent/per-item"
/// failure tier in this crate's error handling design.
pub fn decode_font_string(bytes: &[u8], font: Option<&FontInfo>) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        return decode_utf16be(&bytes[2..]);
    }

    if let Some(font) = font {
        if let Some(lazy) = &font.to_unicode {
            if let Some(cmap) = lazy.get() {
                let decoded = cmap.decode_string(bytes);
                if !decoded.is_empty() {
                    return decoded;
                }
            }
        }

        match &font.encoding {
            Encoding::Custom(map) => {
                return bytes.iter().filter_map(|b| map.get(b)).collect();
            },
            Encoding::Standard(name) if name.eq_ignore_ascii_case("MacRomanEncoding") => {
                return bytes.iter().map(|b| mac_roman_to_unicode(*b)).collect();
            },
            Encoding::Standard(name) if name.eq_ignore_ascii_case("Symbol") => {
                return bytes.iter().map(|b| symbol_to_unicode(*b)).collect();
            },
            _ => {},
        }
    }

    // Default: WinAnsi (CP-1252), the encoding the overwhelming majority of
    // simple Latin-text fonts use whether declared or not.
    bytes.iter().map(|b| win_ansi_to_unicode(*b)).collect()
}

fn decode_utf16be(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

/// Windows-1252 byte to Unicode codepoint. 0x00-0x7F and 0xA0-0xFF map
/// directly onto Latin-1; 0x80-0x9F carry the CP-1252-specific characters.
pub fn win_ansi_to_unicode(byte: u8) -> char {
    match byte {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        0x81 | 0x8D | 0x8F | 0x90 | 0x9D => '\u{FFFD}',
        other => other as char,
    }
}

/// MacRomanEncoding byte to Unicode (0x00-0x7F is ASCII; 0x80-0xFF is the
/// Mac OS Roman upper half, here covering the characters likely to appear
/// in body text — 0xA5 is notably bullet, not yen, unlike Latin-1).
pub fn mac_roman_to_unicode(byte: u8) -> char {
    if byte < 0x80 {
        return byte as char;
    }
    match byte {
        0xA5 => '\u{2022}', // bullet
        0xD0 => '\u{2013}', // en dash
        0xD1 => '\u{2014}', // em dash
        0xD2 => '\u{201C}',
        0xD3 => '\u{201D}',
        0xD4 => '\u{2018}',
        0xD5 => '\u{2019}',
        0xC7 => '\u{00AE}',
        0xA9 => '\u{00B4}',
        0xAA => '\u{00A8}',
        0xE5 => '\u{00C2}',
        _ => char::from_u32(0xF000 + byte as u32 - 0x80).unwrap_or('\u{FFFD}'),
    }
}

/// Symbol font byte to Unicode. Only the printable ASCII range maps onto
/// meaningfully different glyphs (Greek letters, math operators); bytes
/// outside the table fall back to the Private Use Area the way the PDF
/// spec's Symbol encoding table effectively does for unhandled glyphs.
pub fn symbol_to_unicode(byte: u8) -> char {
    match byte {
        0x61 => '\u{03B1}', // alpha
        0x62 => '\u{03B2}', // beta
        0x67 => '\u{03B3}', // gamma
        0x64 => '\u{03B4}', // delta
        0x70 => '\u{03C0}', // pi
        0x6C => '\u{03BB}', // lambda
        0x53 => '\u{03A3}', // Sigma
        0xB1 => '\u{00B1}', // plus-minus
        0xB0 => '\u{2218}', // ring operator
        0xA5 => '\u{221E}', // infinity
        b if b < 0x80 => b as char,
        _ => '\u{FFFD}',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_ansi_euro_and_quotes() {
        assert_eq!(win_ansi_to_unicode(0x80), '\u{20AC}');
        assert_eq!(win_ansi_to_unicode(0x93), '\u{201C}');
        assert_eq!(win_ansi_to_unicode(0x41), 'A');
    }

    #[test]
    fn test_mac_roman_bullet() {
        assert_eq!(mac_roman_to_unicode(0xA5), '\u{2022}');
        assert_eq!(mac_roman_to_unicode(0x41), 'A');
    }

    #[test]
    fn test_symbol_greek() {
        assert_eq!(symbol_to_unicode(0x61), '\u{03B1}');
    }

    #[test]
    fn test_decode_font_string_no_font_falls_back_to_winansi() {
        let decoded = decode_font_string(b"Caf\x82", None);
        assert_eq!(decoded, "Caf\u{201A}");
    }

    #[test]
    fn test_decode_font_string_utf16be_bom() {
        let bytes = [0xFE, 0xFF, 0x00, 0x41, 0x00, 0x42];
        assert_eq!(decode_font_string(&bytes, None), "AB");
    }
}
