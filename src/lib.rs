#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::enum_variant_names)]
#![allow(clippy::wrong_self_convention)]
#![allow(clippy::explicit_counter_loop)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::match_like_matches_macro)]
#![cfg_attr(test, allow(dead_code))]
#![cfg_attr(test, allow(unused_variables))]

//! # pdfmd
//!
//! Converts PDF documents into readable Markdown. Recovers headings, lists,
//! tables and footnotes from page geometry rather than relying on PDF
//! structure tags, since the vast majority of PDFs in the wild carry none.
//!
//! ## What this crate does
//!
//! - Parses the PDF object graph directly: classic and cross-reference-stream
//!   xrefs, object streams, linearized files, the standard filter chain
//!   (Flate/LZW/ASCII85/ASCIIHex with PNG/TIFF predictors), and the RC4/AES
//!   empty-password encryption path (ISO 32000-1:2008 §7.6).
//! - Runs the content stream interpreter to recover positioned text runs per
//!   page, decoding character codes to Unicode via ToUnicode CMaps with a
//!   WinAnsi/MacRoman/Symbol fallback chain.
//! - Reassembles runs into lines, tables, headings and lists using page
//!   geometry (line spacing, X-alignment, repeated headers/footers) and
//!   renders the result as Markdown.
//!
//! ## Quick start
//!
//! ```ignore
//! use pdfmd::{convert, ConvertOptions};
//!
//! let bytes = std::fs::read("paper.pdf")?;
//! let output = convert(&bytes, &ConvertOptions::default())?;
//! println!("{}", output.markdown);
//! # Ok::<(), pdfmd::Error>(())
//! ```
//!
//! ## License
//!
//! Licensed under either of Apache License 2.0 or MIT license at your
//! option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Core PDF parsing
pub mod document;
pub mod lexer;
pub mod object;
pub mod objstm;
pub mod parser;
/// Parser configuration options
pub mod parser_config;
pub mod xref;

// Stream decoders (§4.1)
pub mod decoders;

// Encryption support (§4.4)
pub mod encryption;

// Page geometry primitives
pub mod geometry;

// Content stream interpretation (§4.6)
pub mod content;

// Font dictionaries and CMap decoding (§4.5)
pub mod fonts;

// Image passthrough
pub mod images;

// Layout reconstruction pipeline (§4.7, §4.8)
pub mod pipeline;

// Conversion options and progress hooks
pub mod config;

pub use config::{ConversionOutput, ConvertOptions, ExtractedImage, ImageFormat, ProgressHooks};
pub use error::{Error, Result};

/// Convert a PDF document's raw bytes into Markdown.
///
/// This is the single entry point of the crate (see [`ConvertOptions`] for
/// the available knobs and [`ProgressHooks`] for progress callbacks). Fatal
/// document-level problems (unresolvable xref, missing trailer, cyclic page
/// tree, encryption the crate cannot authenticate) return `Err`; problems
/// local to one page are logged via the progress hooks and that page simply
/// contributes nothing to the result.
///
/// # Examples
///
/// ```ignore
/// let bytes = std::fs::read("report.pdf")?;
/// let output = pdfmd::convert(&bytes, &pdfmd::ConvertOptions::default())?;
/// assert!(!output.markdown.is_empty());
/// ```
pub fn convert(bytes: &[u8], options: &ConvertOptions) -> Result<ConversionOutput> {
    document::convert(bytes, options)
}

/// Same as [`convert`], but drives [`ProgressHooks`] callbacks as pages are
/// parsed, fonts are loaded, pages are skipped, and the conversion finishes.
pub fn convert_with_hooks(bytes: &[u8], options: &ConvertOptions, hooks: &mut ProgressHooks) -> Result<ConversionOutput> {
    document::convert_with_hooks(bytes, options, hooks)
}

// Internal utilities
pub(crate) mod utils {
    //! Internal utility functions for the library.

    use std::cmp::Ordering;

    /// Safely compare two floating point numbers, handling NaN cases.
    ///
    /// NaN values are treated as equal to each other and greater than all other values.
    /// This ensures that sorting operations never panic due to NaN comparisons.
    #[inline]
    pub fn safe_float_cmp(a: f32, b: f32) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater, // NaN > all numbers
            (false, true) => Ordering::Less,    // all numbers < NaN
            (false, false) => a.partial_cmp(&b).unwrap(),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_safe_float_cmp_normal() {
            assert_eq!(safe_float_cmp(1.0, 2.0), Ordering::Less);
            assert_eq!(safe_float_cmp(2.0, 1.0), Ordering::Greater);
            assert_eq!(safe_float_cmp(1.5, 1.5), Ordering::Equal);
        }

        #[test]
        fn test_safe_float_cmp_nan() {
            assert_eq!(safe_float_cmp(f32::NAN, f32::NAN), Ordering::Equal);
            assert_eq!(safe_float_cmp(f32::NAN, 0.0), Ordering::Greater);
            assert_eq!(safe_float_cmp(0.0, f32::NAN), Ordering::Less);
        }
    }
}

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(VERSION.starts_with("0."));
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "pdfmd");
    }
}
