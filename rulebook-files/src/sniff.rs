//! Content sniffing.
//!
//! Raster formats are recognised by the `image` crate from their leading
//! bytes. SVG, PDF and ZIP are checked here. Anything else is left to
//! name-based guessing.

use image::ImageFormat;
use mime::Mime;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Number of leading bytes inspected.
pub const SNIFF_LEN: usize = 512;

/// Raster formats trusted from `image::guess_format`.
const RASTER_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::Bmp,
    ImageFormat::WebP,
    ImageFormat::Tiff,
    ImageFormat::Ico,
];

const DOCUMENT_SIGNATURES: &[(&[u8], &str)] = &[
    (b"%PDF-", "application/pdf"),
    (b"PK\x03\x04", "application/zip"),
];

const SVG: &str = "image/svg+xml";

/// Whether [`sniff_bytes`] can positively identify content of type
/// `essence` (e.g. `image/png`).
///
/// A client name claiming one of these types is not trusted when the
/// content was not recognised.
pub fn is_sniffable(essence: &str) -> bool {
    essence == SVG
        || RASTER_FORMATS.iter().any(|f| f.to_mime_type() == essence)
        || DOCUMENT_SIGNATURES.iter().any(|(_, mime)| *mime == essence)
}

/// Detect a content type from the leading bytes of a file.
pub fn sniff_bytes(bytes: &[u8]) -> Option<Mime> {
    let found = image::guess_format(bytes)
        .ok()
        .filter(|format| RASTER_FORMATS.contains(format))
        .map(|format| format.to_mime_type())
        .or_else(|| {
            DOCUMENT_SIGNATURES
                .iter()
                .find(|(magic, _)| bytes.starts_with(magic))
                .map(|(_, mime)| *mime)
        })
        .or_else(|| is_svg(bytes).then_some(SVG))?;

    found.parse().ok()
}

/// Detect a content type by reading the head of the file at `path`.
pub fn sniff_path(path: &Path) -> io::Result<Option<Mime>> {
    let mut head = Vec::with_capacity(SNIFF_LEN);
    File::open(path)?
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut head)?;
    Ok(sniff_bytes(&head))
}

/// Whether the first element of an XML document is `<svg`.
///
/// Leading byte order mark, whitespace, XML declaration, comments and
/// DOCTYPE are skipped.
fn is_svg(bytes: &[u8]) -> bool {
    let text = String::from_utf8_lossy(bytes);
    let mut rest = text.trim_start_matches('\u{feff}');

    loop {
        rest = rest.trim_start();
        let skipped = if rest.starts_with("<?") {
            rest.find("?>").map(|end| end + 2)
        } else if rest.starts_with("<!--") {
            rest.find("-->").map(|end| end + 3)
        } else if rest.starts_with("<!DOCTYPE") || rest.starts_with("<!doctype") {
            rest.find('>').map(|end| end + 1)
        } else {
            return rest.starts_with("<svg");
        };

        match skipped {
            Some(end) => rest = &rest[end..],
            None => return false,
        }
    }
}
