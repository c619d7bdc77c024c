//! Image XObject extraction (the "image sidechannel" of §2 item 10 /
//! §3's "extracted images are detached... owned by the caller").
//!
//! This module never writes files — it hands back raw bytes plus enough
//! metadata (`ExtractedImage`) for an external writer to persist them and
//! substitute `![id]` placeholders with `![alt](path)`.

use std::io::Cursor;

use crate::config::{ExtractedImage, ImageFormat};
use crate::object::Object;

/// Color space of an image XObject, coarse enough to decide how to
/// re-pack a raw (FlateDecode) raster into PNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorSpace {
    DeviceGray,
    DeviceRgb,
    DeviceCmyk,
    Other,
}

fn color_space_of(dict: &std::collections::HashMap<String, Object>) -> ColorSpace {
    match dict.get("ColorSpace").and_then(|o| o.as_name()) {
        Some("DeviceGray") | Some("CalGray") => ColorSpace::DeviceGray,
        Some("DeviceRGB") | Some("CalRGB") => ColorSpace::DeviceRgb,
        Some("DeviceCMYK") => ColorSpace::DeviceCmyk,
        _ => ColorSpace::Other,
    }
}

fn filters_of(dict: &std::collections::HashMap<String, Object>) -> Vec<String> {
    match dict.get("Filter") {
        Some(Object::Name(name)) => vec![name.clone()],
        Some(Object::Array(arr)) => arr.iter().filter_map(|o| o.as_name().map(|s| s.to_string())).collect(),
        _ => vec![],
    }
}

/// Re-pack a raw (already-decompressed) raster into a PNG. Returns
/// `None` for color spaces/bit depths this crate doesn't know how to
/// interpret; the caller falls back to `ImageFormat::Bin` with the raw
/// bytes in that case.
fn repack_as_png(raw: &[u8], width: u32, height: u32, bits_per_component: u32, space: ColorSpace) -> Option<Vec<u8>> {
    if bits_per_component != 8 {
        return None;
    }
    let dynamic = match space {
        ColorSpace::DeviceGray => {
            let expected = (width as usize) * (height as usize);
            if raw.len() < expected {
                return None;
            }
            let buf = image::GrayImage::from_raw(width, height, raw[..expected].to_vec())?;
            image::DynamicImage::ImageLuma8(buf)
        }
        ColorSpace::DeviceRgb => {
            let expected = (width as usize) * (height as usize) * 3;
            if raw.len() < expected {
                return None;
            }
            let buf = image::RgbImage::from_raw(width, height, raw[..expected].to_vec())?;
            image::DynamicImage::ImageRgb8(buf)
        }
        ColorSpace::DeviceCmyk | ColorSpace::Other => return None,
    };
    let mut out = Cursor::new(Vec::new());
    dynamic.write_to(&mut out, image::ImageOutputFormat::Png).ok()?;
    Some(out.into_inner())
}

/// Extract one `ExtractedImage` from an already-resolved `/Subtype
/// /Image` stream object. `id` is the caller-chosen stable identifier
/// (e.g. `"page_003_img_1"`).
pub fn extract_image(id: String, stream_obj: &Object, page_index: usize) -> Option<ExtractedImage> {
    let dict = stream_obj.as_dict()?;
    if dict.get("Subtype").and_then(|o| o.as_name()) != Some("Image") {
        return None;
    }
    let width_px = dict.get("Width").and_then(|o| o.as_integer()).unwrap_or(0).max(0) as u32;
    let height_px = dict.get("Height").and_then(|o| o.as_integer()).unwrap_or(0).max(0) as u32;
    let bits_per_component = dict.get("BitsPerComponent").and_then(|o| o.as_integer()).unwrap_or(8).max(0) as u32;

    let filters = filters_of(dict);
    let raw = stream_obj.decode_stream_data().ok()?;

    let (format, raw_bytes) = if filters.iter().any(|f| f == "DCTDecode") {
        (ImageFormat::Jpeg, raw)
    } else if filters.iter().any(|f| f == "JPXDecode") {
        (ImageFormat::Jp2, raw)
    } else {
        let space = color_space_of(dict);
        match repack_as_png(&raw, width_px, height_px, bits_per_component, space) {
            Some(png) => (ImageFormat::Png, png),
            None => (ImageFormat::Bin, raw),
        }
    };

    Some(ExtractedImage { id, format, raw_bytes, alt_text: None, page_index, width_px, height_px })
}

/// Walk a page's resolved `/Resources/XObject` dictionary, extracting
/// every entry whose `/Subtype` is `/Image`. `resolve` dereferences an
/// indirect reference to its target object (document-agnostic, same
/// pattern as `FontInfo::from_dict`'s resolver closure).
pub fn extract_images_from_resources(
    resources: &std::collections::HashMap<String, Object>,
    page_index: usize,
    resolve: &mut dyn FnMut(&Object) -> Option<Object>,
) -> Vec<ExtractedImage> {
    let mut images = Vec::new();
    let Some(xobjects) = resources.get("XObject").and_then(|o| o.as_dict().cloned().or_else(|| resolve(o).and_then(|r| r.as_dict().cloned()))) else {
        return images;
    };
    for (name, obj) in xobjects.iter() {
        let resolved = match obj {
            Object::Reference(_) => match resolve(obj) {
                Some(r) => r,
                None => continue,
            },
            other => other.clone(),
        };
        let id = format!("page_{:03}_{}", page_index + 1, name);
        if let Some(image) = extract_image(id, &resolved, page_index) {
            images.push(image);
        }
    }
    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn image_dict(width: i64, height: i64, filter: &str, color_space: &str) -> HashMap<String, Object> {
        let mut dict = HashMap::new();
        dict.insert("Subtype".to_string(), Object::Name("Image".to_string()));
        dict.insert("Width".to_string(), Object::Integer(width));
        dict.insert("Height".to_string(), Object::Integer(height));
        dict.insert("Filter".to_string(), Object::Name(filter.to_string()));
        dict.insert("ColorSpace".to_string(), Object::Name(color_space.to_string()));
        dict.insert("BitsPerComponent".to_string(), Object::Integer(8));
        dict
    }

    #[test]
    fn test_dct_image_passed_through_as_jpeg() {
        let dict = image_dict(10, 10, "DCTDecode", "DeviceRGB");
        let stream = Object::Stream { dict, data: bytes::Bytes::from_static(b"\xff\xd8\xff\xd9") };
        let extracted = extract_image("img1".into(), &stream, 0).unwrap();
        assert_eq!(extracted.format, ImageFormat::Jpeg);
        assert_eq!(extracted.raw_bytes, b"\xff\xd8\xff\xd9".to_vec());
    }

    #[test]
    fn test_non_image_subtype_rejected() {
        let mut dict = image_dict(10, 10, "DCTDecode", "DeviceRGB");
        dict.insert("Subtype".to_string(), Object::Name("Form".to_string()));
        let stream = Object::Stream { dict, data: bytes::Bytes::new() };
        assert!(extract_image("img1".into(), &stream, 0).is_none());
    }

    #[test]
    fn test_flate_gray_raster_repacked_as_png() {
        let dict = image_dict(2, 2, "FlateDecode", "DeviceGray");
        // decode_stream_data() would normally inflate this; here we bypass
        // that by constructing the raw bytes directly and calling the
        // repack helper, since building a real zlib stream isn't worth it
        // for this test.
        let raw = vec![0u8, 128, 255, 64];
        let png = repack_as_png(&raw, 2, 2, 8, ColorSpace::DeviceGray);
        assert!(png.is_some());
        assert!(png.unwrap().starts_with(&[0x89, b'P', b'N', b'G']));
    }
}
