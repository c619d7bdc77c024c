//! Font dictionary parsing.
//!
//! Extracts the subset of a PDF `/Font` dictionary this crate's text
//! interpreter and layout pipeline actually need: the base name (for
//! bold/italic detection and markdown emphasis), the encoding, width tables
//! for run-width estimation, and a lazily-parsed ToUnicode CMap.

use std::collections::HashMap;
use std::sync::Arc;

use crate::fonts::cmap::LazyCMap;
use crate::object::Object;

/// Font information extracted from a PDF font dictionary.
#[derive(Debug, Clone)]
pub struct FontInfo {
    /// Base font name (e.g., "Times-Roman", "Helvetica-Bold")
    pub base_font: String,
    /// Font subtype (e.g., "Type1", "TrueType", "Type0")
    pub subtype: String,
    /// Encoding information
    pub encoding: Encoding,
    /// ToUnicode CMap (character code to Unicode mapping), parsed lazily.
    pub to_unicode: Option<LazyCMap>,
    /// Font weight from FontDescriptor (400 = normal, 700 = bold), when present.
    pub font_weight: Option<i32>,
    /// Font descriptor flags (ISO 32000-1:2008 Table 123).
    pub flags: Option<i32>,
    /// Stem thickness (vertical) from FontDescriptor, used as a weight hint
    /// when `/FontWeight` is absent.
    pub stem_v: Option<f32>,
    /// Embedded font program bytes, if this font carries one. Unused by the
    /// markdown pipeline today but kept since width/CID lookups may need it.
    pub embedded_font_data: Option<Arc<Vec<u8>>>,
    /// CID to GID mapping (Type0 fonts only).
    pub cid_to_gid_map: Option<CIDToGIDMap>,
    /// CIDFont character collection info (Type0 fonts only).
    pub cid_system_info: Option<CIDSystemInfo>,
    /// CIDFont subtype ("CIDFontType0" or "CIDFontType2").
    pub cid_font_type: Option<String>,
    /// Character widths in 1000ths of em, indexed by `char_code - first_char`.
    pub widths: Option<Vec<f32>>,
    /// First character code covered by `widths`.
    pub first_char: Option<u32>,
    /// Last character code covered by `widths`.
    pub last_char: Option<u32>,
    /// Default width for characters not in `widths`, in 1000ths of em.
    pub default_width: f32,
    /// CID to width mapping for Type0 (CIDFont) fonts, in 1000ths of em.
    pub cid_widths: Option<HashMap<u16, f32>>,
    /// Default width for CIDs not in `cid_widths`. PDF default is 1000.
    pub cid_default_width: f32,
}

/// Font encoding types.
#[derive(Debug, Clone)]
pub enum Encoding {
    /// Standard PDF encoding (WinAnsiEncoding, MacRomanEncoding, Symbol, ...).
    Standard(String),
    /// Custom encoding with explicit character mappings (`/Differences`).
    Custom(HashMap<u8, char>),
    /// Identity encoding, typically used for CID fonts.
    Identity,
}

/// CID to GID mapping for Type 2 CIDFonts (TrueType-based), ISO
/// 32000-1:2008 §9.7.4.2.
#[derive(Debug, Clone)]
pub enum CIDToGIDMap {
    /// CID == GID (default, most common).
    Identity,
    /// Explicit mapping: GID at bytes `[2*CID, 2*CID+1]`, big-endian.
    Explicit(Vec<u16>),
}

impl CIDToGIDMap {
    /// Convert a Character ID to a Glyph ID using this mapping.
    pub fn get_gid(&self, cid: u16) -> u16 {
        match self {
            CIDToGIDMap::Identity => cid,
            CIDToGIDMap::Explicit(gid_array) => {
                gid_array.get(cid as usize).copied().unwrap_or(cid)
            },
        }
    }
}

/// CIDFont character collection identifier (e.g. Adobe-Japan1).
#[derive(Debug, Clone)]
pub struct CIDSystemInfo {
    /// Registry name (typically "Adobe").
    pub registry: String,
    /// Ordering string (e.g., "Japan1", "GB1").
    pub ordering: String,
    /// Supplement number.
    pub supplement: i64,
}

impl FontInfo {
    /// Parse a `/Font` dictionary. `resolve` dereferences an indirect
    /// reference to its target object (returning the decoded stream object
    /// for things like `/ToUnicode`); it is a closure rather than a concrete
    /// document type so this module stays independent of how the caller
    /// stores its object graph.
    pub fn from_dict(dict: &HashMap<String, Object>, resolve: &mut dyn FnMut(&Object) -> Option<Object>) -> Self {
        let raw_base_font = dict.get("BaseFont").and_then(|o| o.as_name()).unwrap_or("Unknown");
        let base_font = strip_subset_tag(raw_base_font);
        let subtype = dict
            .get("Subtype")
            .and_then(|o| o.as_name())
            .unwrap_or("Type1")
            .to_string();

        let encoding = parse_encoding(dict, resolve);

        let to_unicode = dict
            .get("ToUnicode")
            .and_then(|o| resolve(o))
            .and_then(|o| stream_bytes(&o))
            .map(LazyCMap::new);

        let (flags, stem_v, font_weight) = parse_descriptor(dict, resolve);

        let first_char = dict.get("FirstChar").and_then(|o| o.as_integer()).map(|v| v as u32);
        let last_char = dict.get("LastChar").and_then(|o| o.as_integer()).map(|v| v as u32);
        let widths = dict
            .get("Widths")
            .and_then(|o| resolve(o).or_else(|| Some(o.clone())))
            .and_then(|o| {
                o.as_array()
                    .map(|arr| arr.iter().map(|w| w.as_integer().map(|i| i as f32).unwrap_or(0.0)).collect::<Vec<f32>>())
            });

        let is_type0 = subtype == "Type0";
        let (cid_widths, cid_default_width, cid_to_gid_map, cid_system_info, cid_font_type) = if is_type0 {
            parse_descendant_cid_font(dict, resolve)
        } else {
            (None, 1000.0, None, None, None)
        };

        FontInfo {
            base_font,
            subtype,
            encoding,
            to_unicode,
            font_weight,
            flags,
            stem_v,
            embedded_font_data: None,
            cid_to_gid_map,
            cid_system_info,
            cid_font_type,
            widths,
            first_char,
            last_char,
            default_width: 500.0,
            cid_widths,
            cid_default_width,
        }
    }

    /// Width of a single simple-font character code, in 1000ths of em.
    pub fn glyph_width(&self, char_code: u32) -> f32 {
        if let (Some(widths), Some(first)) = (&self.widths, self.first_char) {
            if char_code >= first {
                let idx = (char_code - first) as usize;
                if let Some(w) = widths.get(idx) {
                    if *w > 0.0 {
                        return *w;
                    }
                }
            }
        }
        self.default_width
    }

    /// Width of a single CID, in 1000ths of em, for Type0 fonts.
    pub fn cid_width(&self, cid: u16) -> f32 {
        self.cid_widths
            .as_ref()
            .and_then(|w| w.get(&cid))
            .copied()
            .unwrap_or(self.cid_default_width)
    }

    /// Whether the base font name or descriptor flags suggest a bold weight.
    pub fn is_bold(&self) -> bool {
        self.font_weight.map(|w| w >= 600).unwrap_or(false) || {
            let lower = self.base_font.to_lowercase();
            lower.contains("bold") || lower.contains("black") || lower.contains("heavy")
        }
    }

    /// Whether the base font name or descriptor flags suggest italic/oblique style.
    pub fn is_italic(&self) -> bool {
        self.flags.map(|f| f & (1 << 6) != 0).unwrap_or(false) || {
            let lower = self.base_font.to_lowercase();
            lower.contains("italic") || lower.contains("oblique")
        }
    }
}

/// Strip an Adobe subset tag prefix (`ABCDEF+FontName` -> `FontName`).
fn strip_subset_tag(name: &str) -> String {
    if name.len() > 7 && name.as_bytes()[6] == b'+' && name[..6].bytes().all(|b| b.is_ascii_uppercase()) {
        name[7..].to_string()
    } else {
        name.to_string()
    }
}

fn stream_bytes(obj: &Object) -> Option<Vec<u8>> {
    match obj {
        Object::Stream { data, .. } => Some(data.to_vec()),
        _ => None,
    }
}

fn parse_encoding(dict: &HashMap<String, Object>, resolve: &mut dyn FnMut(&Object) -> Option<Object>) -> Encoding {
    match dict.get("Encoding") {
        Some(Object::Name(name)) => Encoding::Standard(name.clone()),
        Some(obj @ Object::Reference(_)) => match resolve(obj) {
            Some(resolved) => parse_encoding_object(&resolved, resolve),
            None => Encoding::Standard("StandardEncoding".to_string()),
        },
        Some(obj) => parse_encoding_object(obj, resolve),
        None => Encoding::Standard("StandardEncoding".to_string()),
    }
}

fn parse_encoding_object(obj: &Object, resolve: &mut dyn FnMut(&Object) -> Option<Object>) -> Encoding {
    let Some(dict) = obj.as_dict() else {
        return Encoding::Standard("StandardEncoding".to_string());
    };
    let base = dict
        .get("BaseEncoding")
        .and_then(|o| o.as_name())
        .unwrap_or("StandardEncoding")
        .to_string();
    let Some(differences) = dict.get("Differences").and_then(|o| resolve(o).or_else(|| Some(o.clone()))) else {
        return Encoding::Standard(base);
    };
    let Some(arr) = differences.as_array() else {
        return Encoding::Standard(base);
    };
    let mut map = HashMap::new();
    let mut code: u8 = 0;
    for item in arr {
        match item {
            Object::Integer(n) => code = (*n).clamp(0, 255) as u8,
            Object::Name(glyph_name) => {
                if let Some(ch) = glyph_name_to_char(glyph_name) {
                    map.insert(code, ch);
                }
                code = code.saturating_add(1);
            },
            _ => {},
        }
    }
    Encoding::Custom(map)
}

/// Minimal Adobe glyph name lookup covering the handful of names that show
/// up in `/Differences` arrays for ordinary Latin-text PDFs. Anything more
/// exotic falls through to ToUnicode/WinAnsi decoding instead.
fn glyph_name_to_char(name: &str) -> Option<char> {
    match name {
        "bullet" => Some('\u{2022}'),
        "emdash" => Some('\u{2014}'),
        "endash" => Some('\u{2013}'),
        "quotedblleft" => Some('\u{201C}'),
        "quotedblright" => Some('\u{201D}'),
        "quoteleft" => Some('\u{2018}'),
        "quoteright" => Some('\u{2019}'),
        "space" => Some(' '),
        "fi" => Some('\u{FB01}'),
        "fl" => Some('\u{FB02}'),
        _ if name.len() == 1 => name.chars().next(),
        _ if name.starts_with("uni") && name.len() == 7 => {
            u32::from_str_radix(&name[3..], 16).ok().and_then(char::from_u32)
        },
        _ => None,
    }
}

fn parse_descriptor(
    dict: &HashMap<String, Object>,
    resolve: &mut dyn FnMut(&Object) -> Option<Object>,
) -> (Option<i32>, Option<f32>, Option<i32>) {
    let Some(descriptor) = dict.get("FontDescriptor").and_then(|o| resolve(o).or_else(|| Some(o.clone()))) else {
        return (None, None, None);
    };
    let Some(d) = descriptor.as_dict() else {
        return (None, None, None);
    };
    let flags = d.get("Flags").and_then(|o| o.as_integer()).map(|v| v as i32);
    let stem_v = d.get("StemV").and_then(|o| o.as_integer()).map(|v| v as f32);
    let font_weight = d.get("FontWeight").and_then(|o| o.as_integer()).map(|v| v as i32);
    (flags, stem_v, font_weight)
}

fn parse_descendant_cid_font(
    dict: &HashMap<String, Object>,
    resolve: &mut dyn FnMut(&Object) -> Option<Object>,
) -> (
    Option<HashMap<u16, f32>>,
    f32,
    Option<CIDToGIDMap>,
    Option<CIDSystemInfo>,
    Option<String>,
) {
    let Some(descendants) = dict.get("DescendantFonts").and_then(|o| resolve(o).or_else(|| Some(o.clone()))) else {
        return (None, 1000.0, None, None, None);
    };
    let Some(first) = descendants.as_array().and_then(|a| a.first()) else {
        return (None, 1000.0, None, None, None);
    };
    let Some(cid_font) = resolve(first).or_else(|| Some(first.clone())) else {
        return (None, 1000.0, None, None, None);
    };
    let Some(cf) = cid_font.as_dict() else {
        return (None, 1000.0, None, None, None);
    };

    let cid_font_type = cf.get("Subtype").and_then(|o| o.as_name()).map(String::from);
    let default_width = cf.get("DW").and_then(|o| o.as_integer()).map(|v| v as f32).unwrap_or(1000.0);

    let cid_widths = cf
        .get("W")
        .and_then(|o| resolve(o).or_else(|| Some(o.clone())))
        .and_then(|o| o.as_array().map(parse_cid_widths));

    let cid_to_gid_map = match cf.get("CIDToGIDMap") {
        Some(Object::Name(n)) if n == "Identity" => Some(CIDToGIDMap::Identity),
        Some(obj) => resolve(obj).and_then(|o| stream_bytes(&o)).map(|bytes| {
            let gids = bytes.chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]])).collect();
            CIDToGIDMap::Explicit(gids)
        }),
        None => Some(CIDToGIDMap::Identity),
    };

    let cid_system_info = cf.get("CIDSystemInfo").and_then(|o| o.as_dict()).map(|info| CIDSystemInfo {
        registry: info.get("Registry").and_then(string_value).unwrap_or_default(),
        ordering: info.get("Ordering").and_then(string_value).unwrap_or_default(),
        supplement: info.get("Supplement").and_then(|o| o.as_integer()).unwrap_or(0),
    });

    (cid_widths, default_width, cid_to_gid_map, cid_system_info, cid_font_type)
}

fn string_value(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes) => Some(String::from_utf8_lossy(bytes).to_string()),
        Object::Name(n) => Some(n.clone()),
        _ => None,
    }
}

/// Parse a CIDFont `/W` array: entries are either `c [w1 w2 ...]` (individual
/// widths starting at CID `c`) or `cFirst cLast w` (uniform width over a
/// range), per ISO 32000-1:2008 §9.7.4.3.
fn parse_cid_widths(arr: &[Object]) -> HashMap<u16, f32> {
    let mut widths = HashMap::new();
    let mut i = 0;
    while i < arr.len() {
        let Some(first) = arr[i].as_integer() else { break };
        i += 1;
        if i >= arr.len() {
            break;
        }
        if let Some(list) = arr[i].as_array() {
            for (offset, w) in list.iter().enumerate() {
                if let Some(width) = w.as_integer() {
                    widths.insert((first as i64 + offset as i64) as u16, width as f32);
                }
            }
            i += 1;
        } else if let Some(last) = arr[i].as_integer() {
            i += 1;
            if i >= arr.len() {
                break;
            }
            if let Some(width) = arr[i].as_integer() {
                for cid in first..=last {
                    widths.insert(cid as u16, width as f32);
                }
            }
            i += 1;
        } else {
            break;
        }
    }
    widths
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_resolve(_: &Object) -> Option<Object> {
        None
    }

    #[test]
    fn test_from_dict_base_font_and_subtype() {
        let mut dict = HashMap::new();
        dict.insert("BaseFont".to_string(), Object::Name("Helvetica-Bold".to_string()));
        dict.insert("Subtype".to_string(), Object::Name("Type1".to_string()));
        let mut resolve = noop_resolve;
        let info = FontInfo::from_dict(&dict, &mut resolve);
        assert_eq!(info.base_font, "Helvetica-Bold");
        assert_eq!(info.subtype, "Type1");
        assert!(info.is_bold());
    }

    #[test]
    fn test_strip_subset_tag() {
        assert_eq!(strip_subset_tag("ABCDEF+Calibri"), "Calibri");
        assert_eq!(strip_subset_tag("Calibri"), "Calibri");
    }

    #[test]
    fn test_glyph_width_uses_table_then_default() {
        let mut info_dict = HashMap::new();
        info_dict.insert("BaseFont".to_string(), Object::Name("Test".to_string()));
        let mut resolve = noop_resolve;
        let mut info = FontInfo::from_dict(&info_dict, &mut resolve);
        info.widths = Some(vec![600.0, 700.0]);
        info.first_char = Some(65);
        assert_eq!(info.glyph_width(65), 600.0);
        assert_eq!(info.glyph_width(66), 700.0);
        assert_eq!(info.glyph_width(200), info.default_width);
    }

    #[test]
    fn test_parse_cid_widths_both_forms() {
        let arr = vec![
            Object::Integer(1),
            Object::Array(vec![Object::Integer(500), Object::Integer(600)]),
            Object::Integer(10),
            Object::Integer(12),
            Object::Integer(1000),
        ];
        let widths = parse_cid_widths(&arr);
        assert_eq!(widths.get(&1), Some(&500.0));
        assert_eq!(widths.get(&2), Some(&600.0));
        assert_eq!(widths.get(&10), Some(&1000.0));
        assert_eq!(widths.get(&11), Some(&1000.0));
        assert_eq!(widths.get(&12), Some(&1000.0));
    }

    #[test]
    fn test_cid_to_gid_identity_passthrough() {
        let map = CIDToGIDMap::Identity;
        assert_eq!(map.get_gid(42), 42);
    }

    #[test]
    fn test_cid_to_gid_explicit_out_of_range_falls_back_to_identity() {
        let map = CIDToGIDMap::Explicit(vec![10, 20, 30]);
        assert_eq!(map.get_gid(1), 20);
        assert_eq!(map.get_gid(99), 99);
    }
}
