//! Command-line front end for `pdfmd`.
//!
//! Reads a PDF from a path or stdin, converts it to Markdown, and writes the
//! result to stdout or a file. Image placeholders (`![id]`) are substituted
//! for real paths only here — the library itself never touches the
//! filesystem.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pdfmd::{convert, ConvertOptions};

/// Convert a PDF document to Markdown.
#[derive(Parser, Debug)]
#[command(name = "pdfmd", version, about)]
struct Cli {
    /// Path to the PDF to convert, or "-" to read from stdin.
    input: PathBuf,

    /// Write markdown here instead of stdout.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Write extracted images into this directory and rewrite `![id]`
    /// placeholders to `![alt](path)`.
    #[arg(long)]
    images: Option<PathBuf>,

    /// Disable running-header/footer stripping.
    #[arg(long)]
    no_strip_headers_footers: bool,

    /// Disable heading detection.
    #[arg(long)]
    no_headings: bool,

    /// Disable list detection.
    #[arg(long)]
    no_lists: bool,

    /// Disable scanned-page detection.
    #[arg(long)]
    no_scan_mode: bool,
}

fn read_input(path: &PathBuf) -> io::Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        fs::read(path)
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let bytes = match read_input(&cli.input) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("pdfmd: failed to read {}: {e}", cli.input.display());
            return ExitCode::FAILURE;
        },
    };

    let options = ConvertOptions {
        strip_headers_footers: !cli.no_strip_headers_footers,
        detect_headings: !cli.no_headings,
        detect_lists: !cli.no_lists,
        scan_mode: !cli.no_scan_mode,
        ..ConvertOptions::default()
    };

    let output = match convert(&bytes, &options) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("pdfmd: conversion failed: {e}");
            return ExitCode::FAILURE;
        },
    };

    let mut markdown = output.markdown;

    if let Some(dir) = &cli.images {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("pdfmd: failed to create image directory {}: {e}", dir.display());
            return ExitCode::FAILURE;
        }
        for image in &output.images {
            let filename = format!("{}.{}", image.id, image.format);
            let filepath = dir.join(&filename);
            if let Err(e) = fs::write(&filepath, &image.raw_bytes) {
                eprintln!("pdfmd: failed to write image {}: {e}", filepath.display());
                continue;
            }
            let placeholder = format!("![{}]", image.id);
            let alt = image.alt_text.as_deref().unwrap_or(&image.id);
            let replacement = format!("![{alt}]({})", filepath.display());
            markdown = markdown.replace(&placeholder, &replacement);
        }
    }

    let write_result = match &cli.out {
        Some(path) => fs::write(path, markdown.as_bytes()),
        None => io::stdout().write_all(markdown.as_bytes()),
    };
    if let Err(e) = write_result {
        eprintln!("pdfmd: failed to write output: {e}");
        return ExitCode::FAILURE;
    }

    for warning in &output.warnings {
        eprintln!("pdfmd: warning: {warning}");
    }

    ExitCode::SUCCESS
}
