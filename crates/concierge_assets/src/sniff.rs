//! Image format and dimension sniffing from raw header bytes.
//!
//! Nothing here decodes pixels. Each parser reads only the container or
//! frame header that carries the image size, and every parser treats short
//! or malformed input as "unknown" by returning `None`. Callers proceed
//! without resize hints when dimensions cannot be determined.

use serde::{Deserialize, Serialize};

const PNG_MAGIC: [u8; 4] = [0x89, 0x50, 0x4E, 0x47];
const JPEG_MAGIC: [u8; 2] = [0xFF, 0xD8];
const VP8_START_CODE: [u8; 3] = [0x9D, 0x01, 0x2A];
const VP8L_SIGNATURE: u8 = 0x2F;

/// Shortest buffer that can be classified.
const MIN_SNIFF_LEN: usize = 12;
/// Shortest buffer holding a RIFF header plus one chunk header and payload.
const MIN_WEBP_LEN: usize = 30;

/// Image container formats the pipeline recognises.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// JPEG/JFIF
    #[display("jpg")]
    Jpg,
    /// Portable Network Graphics
    #[display("png")]
    Png,
    /// RIFF WebP (lossy, lossless or extended)
    #[display("webp")]
    Webp,
}

impl ImageFormat {
    /// Canonical file extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
        }
    }
}

/// Pixel dimensions read from an image header. Both sides are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl ImageDimensions {
    /// Create dimensions, rejecting a zero side.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }
}

/// Classify a buffer by its magic bytes.
pub fn detect_format(bytes: &[u8]) -> Option<ImageFormat> {
    if bytes.len() < MIN_SNIFF_LEN {
        return None;
    }
    if bytes.starts_with(&PNG_MAGIC) {
        return Some(ImageFormat::Png);
    }
    if bytes.starts_with(&JPEG_MAGIC) {
        return Some(ImageFormat::Jpg);
    }
    if &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Some(ImageFormat::Webp);
    }
    None
}

/// Read dimensions from the PNG `IHDR` chunk.
pub fn parse_png_dimensions(bytes: &[u8]) -> Option<ImageDimensions> {
    if bytes.get(12..16)? != b"IHDR" {
        return None;
    }
    let width = read_u32_be(bytes, 16)?;
    let height = read_u32_be(bytes, 20)?;
    ImageDimensions::new(width, height)
}

/// Walk JPEG marker segments until a start-of-frame header is found.
pub fn parse_jpeg_dimensions(bytes: &[u8]) -> Option<ImageDimensions> {
    let mut offset = 2;
    loop {
        if *bytes.get(offset)? != 0xFF {
            return None;
        }
        while *bytes.get(offset)? == 0xFF {
            offset += 1;
        }
        let marker = bytes[offset];
        offset += 1;

        match marker {
            // Scan data or end of image before any frame header
            0xDA | 0xD9 => return None,
            // Markers without a length field
            0x01 | 0xD0..=0xD8 => continue,
            _ => {}
        }

        if is_start_of_frame(marker) {
            let height = read_u16_be(bytes, offset + 3)?;
            let width = read_u16_be(bytes, offset + 5)?;
            return ImageDimensions::new(u32::from(width), u32::from(height));
        }

        let length = usize::from(read_u16_be(bytes, offset)?);
        if length < 2 {
            return None;
        }
        offset = offset.checked_add(length)?;
    }
}

/// SOF0–SOF15, excluding DHT (`C4`), JPG (`C8`) and DAC (`CC`).
fn is_start_of_frame(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF)
}

/// Walk RIFF chunks until a `VP8X`, `VP8 ` or `VP8L` chunk yields a size.
pub fn parse_webp_dimensions(bytes: &[u8]) -> Option<ImageDimensions> {
    if bytes.len() < MIN_WEBP_LEN || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WEBP" {
        return None;
    }

    let mut offset: usize = 12;
    while offset.checked_add(8)? <= bytes.len() {
        let tag = &bytes[offset..offset + 4];
        let size = usize::try_from(read_u32_le(bytes, offset + 4)?).ok()?;
        let data = offset + 8;

        match tag {
            b"VP8X" => {
                let width = 1 + read_u24_le(bytes, data + 4)?;
                let height = 1 + read_u24_le(bytes, data + 7)?;
                return ImageDimensions::new(width, height);
            }
            b"VP8 " => {
                if bytes.get(data + 3..data + 6)? != VP8_START_CODE.as_slice() {
                    return None;
                }
                let width = read_u16_le(bytes, data + 6)? & 0x3FFF;
                let height = read_u16_le(bytes, data + 8)? & 0x3FFF;
                return ImageDimensions::new(u32::from(width), u32::from(height));
            }
            b"VP8L" => {
                if *bytes.get(data)? != VP8L_SIGNATURE {
                    return None;
                }
                let b1 = u32::from(*bytes.get(data + 1)?);
                let b2 = u32::from(*bytes.get(data + 2)?);
                let b3 = u32::from(*bytes.get(data + 3)?);
                let b4 = u32::from(*bytes.get(data + 4)?);
                let width = 1 + (b1 | ((b2 & 0x3F) << 8));
                let height = 1 + ((b2 >> 6) | (b3 << 2) | ((b4 & 0x0F) << 10));
                return ImageDimensions::new(width, height);
            }
            _ => {}
        }

        // Chunk payloads are padded to an even length
        let padded = size.checked_add(size & 1)?;
        offset = data.checked_add(padded)?;
    }
    None
}

/// Sniff the format and read the dimensions of an image buffer.
///
/// # Examples
///
/// ```
/// use concierge_assets::{image_dimensions, ImageDimensions};
///
/// let mut png = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
/// png.extend_from_slice(&13u32.to_be_bytes());
/// png.extend_from_slice(b"IHDR");
/// png.extend_from_slice(&640u32.to_be_bytes());
/// png.extend_from_slice(&480u32.to_be_bytes());
///
/// assert_eq!(image_dimensions(&png), ImageDimensions::new(640, 480));
/// assert_eq!(image_dimensions(b"not an image"), None);
/// ```
pub fn image_dimensions(bytes: &[u8]) -> Option<ImageDimensions> {
    match detect_format(bytes)? {
        ImageFormat::Png => parse_png_dimensions(bytes),
        ImageFormat::Jpg => parse_jpeg_dimensions(bytes),
        ImageFormat::Webp => parse_webp_dimensions(bytes),
    }
}

fn read_u16_be(bytes: &[u8], at: usize) -> Option<u16> {
    let raw = bytes.get(at..at.checked_add(2)?)?;
    Some(u16::from_be_bytes([raw[0], raw[1]]))
}

fn read_u16_le(bytes: &[u8], at: usize) -> Option<u16> {
    let raw = bytes.get(at..at.checked_add(2)?)?;
    Some(u16::from_le_bytes([raw[0], raw[1]]))
}

fn read_u24_le(bytes: &[u8], at: usize) -> Option<u32> {
    let raw = bytes.get(at..at.checked_add(3)?)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], 0]))
}

fn read_u32_be(bytes: &[u8], at: usize) -> Option<u32> {
    let raw = bytes.get(at..at.checked_add(4)?)?;
    Some(u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

fn read_u32_le(bytes: &[u8], at: usize) -> Option<u32> {
    let raw = bytes.get(at..at.checked_add(4)?)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}
