//! Tests for header-only format and dimension sniffing.

mod common;

use common::{jpeg_bytes, png_bytes, riff_webp, sof_segment, vp8_chunk, vp8l_chunk, vp8x_chunk};
use concierge_assets::{
    ImageDimensions, ImageFormat, detect_format, image_dimensions, parse_jpeg_dimensions,
    parse_png_dimensions, parse_webp_dimensions,
};

fn dims(width: u32, height: u32) -> Option<ImageDimensions> {
    Some(ImageDimensions { width, height })
}

#[test]
fn test_detect_format_by_magic() {
    assert_eq!(detect_format(&png_bytes(1, 1)), Some(ImageFormat::Png));
    assert_eq!(detect_format(&jpeg_bytes(1, 1)), Some(ImageFormat::Jpg));
    assert_eq!(
        detect_format(&riff_webp(&[(b"VP8X", vp8x_chunk(1, 1))])),
        Some(ImageFormat::Webp)
    );
}

#[test]
fn test_detect_format_rejects_short_and_unknown() {
    assert_eq!(detect_format(&[]), None);
    assert_eq!(detect_format(&[0xFF, 0xD8, 0xFF, 0xE0]), None);
    assert_eq!(detect_format(&png_bytes(1, 1)[..11]), None);
    assert_eq!(detect_format(b"GIF89a......"), None);
    assert_eq!(detect_format(b"RIFF....WAVE"), None);
}

#[test]
fn test_png_dimensions() {
    assert_eq!(parse_png_dimensions(&png_bytes(1920, 1080)), dims(1920, 1080));
    assert_eq!(image_dimensions(&png_bytes(1, 70_000)), dims(1, 70_000));
}

#[test]
fn test_png_rejects_zero_and_missing_ihdr() {
    assert_eq!(parse_png_dimensions(&png_bytes(0, 10)), None);
    assert_eq!(parse_png_dimensions(&png_bytes(10, 0)), None);

    let mut corrupted = png_bytes(10, 10);
    corrupted[12..16].copy_from_slice(b"IDAT");
    assert_eq!(parse_png_dimensions(&corrupted), None);

    assert_eq!(parse_png_dimensions(&png_bytes(10, 10)[..20]), None);
}

#[test]
fn test_jpeg_baseline_dimensions() {
    assert_eq!(parse_jpeg_dimensions(&jpeg_bytes(4032, 3024)), dims(4032, 3024));
}

#[test]
fn test_jpeg_progressive_and_other_sof_markers() {
    for marker in [0xC1, 0xC2, 0xC3, 0xC5, 0xC7, 0xC9, 0xCB, 0xCD, 0xCF] {
        let mut bytes = vec![0xFF, 0xD8];
        bytes.extend_from_slice(&sof_segment(marker, 800, 600));
        assert_eq!(parse_jpeg_dimensions(&bytes), dims(800, 600), "marker {marker:#x}");
    }
}

#[test]
fn test_jpeg_skips_dht_and_dac_segments() {
    let mut bytes = vec![0xFF, 0xD8];
    // DHT and DAC carry lengths but no frame size
    bytes.extend_from_slice(&[0xFF, 0xC4, 0x00, 0x05, 0xAA, 0xBB, 0xCC]);
    bytes.extend_from_slice(&[0xFF, 0xCC, 0x00, 0x04, 0x01, 0x02]);
    bytes.extend_from_slice(&sof_segment(0xC0, 640, 427));
    assert_eq!(parse_jpeg_dimensions(&bytes), dims(640, 427));
}

#[test]
fn test_jpeg_skips_fill_bytes() {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xFF, 0xFF];
    bytes.extend_from_slice(&sof_segment(0xC2, 1200, 900)[1..]);
    assert_eq!(parse_jpeg_dimensions(&bytes), dims(1200, 900));
}

#[test]
fn test_jpeg_truncated_or_malformed_is_none() {
    let full = jpeg_bytes(1024, 768);
    // The SOF width field ends at byte 29
    for len in 2..29 {
        assert_eq!(parse_jpeg_dimensions(&full[..len]), None, "truncated at {len}");
    }

    // Garbage where a marker is expected
    let mut garbage = vec![0xFF, 0xD8, 0x12, 0x34];
    garbage.extend_from_slice(&[0; 16]);
    assert_eq!(parse_jpeg_dimensions(&garbage), None);

    // Length field shorter than itself
    let bogus_length = [0xFF, 0xD8, 0xFF, 0xE1, 0x00, 0x01, 0, 0, 0, 0, 0, 0];
    assert_eq!(parse_jpeg_dimensions(&bogus_length), None);

    // Start of scan before any frame header
    let sos_first = [0xFF, 0xD8, 0xFF, 0xDA, 0x00, 0x08, 0, 0, 0, 0, 0, 0];
    assert_eq!(parse_jpeg_dimensions(&sos_first), None);
}

#[test]
fn test_webp_vp8x_dimensions() {
    let bytes = riff_webp(&[(b"VP8X", vp8x_chunk(4000, 2250))]);
    assert_eq!(parse_webp_dimensions(&bytes), dims(4000, 2250));
}

#[test]
fn test_webp_vp8x_large_canvas() {
    let bytes = riff_webp(&[(b"VP8X", vp8x_chunk(16_777_216, 1))]);
    assert_eq!(parse_webp_dimensions(&bytes), dims(16_777_216, 1));
}

#[test]
fn test_webp_vp8_lossy_dimensions() {
    let bytes = riff_webp(&[(b"VP8 ", vp8_chunk(1280, 720))]);
    assert_eq!(parse_webp_dimensions(&bytes), dims(1280, 720));
}

#[test]
fn test_webp_vp8_masks_scale_bits() {
    // Top two bits of each field carry the upscaling hint, not size
    let mut chunk = vp8_chunk(300, 200);
    chunk[7] |= 0xC0;
    chunk[9] |= 0x40;
    let bytes = riff_webp(&[(b"VP8 ", chunk)]);
    assert_eq!(parse_webp_dimensions(&bytes), dims(300, 200));
}

#[test]
fn test_webp_vp8_bad_start_code() {
    let mut chunk = vp8_chunk(300, 200);
    chunk[3] = 0x00;
    let bytes = riff_webp(&[(b"VP8 ", chunk)]);
    assert_eq!(parse_webp_dimensions(&bytes), None);
}

#[test]
fn test_webp_vp8l_lossless_dimensions() {
    for (width, height) in [(1, 1), (400, 300), (16_384, 16_384), (257, 1025), (12_345, 6_789)] {
        let bytes = riff_webp(&[(b"VP8L", vp8l_chunk(width, height))]);
        assert_eq!(
            parse_webp_dimensions(&bytes),
            dims(width, height),
            "{width}x{height}"
        );
    }
}

#[test]
fn test_webp_vp8l_bad_signature() {
    let mut chunk = vp8l_chunk(400, 300);
    chunk[0] = 0x2E;
    let bytes = riff_webp(&[(b"VP8L", chunk)]);
    assert_eq!(parse_webp_dimensions(&bytes), None);
}

#[test]
fn test_webp_skips_unknown_chunks_with_padding() {
    // Odd-sized ICCP chunk is padded before the image chunk
    let bytes = riff_webp(&[
        (b"ICCP", vec![1, 2, 3, 4, 5]),
        (b"VP8L", vp8l_chunk(640, 480)),
    ]);
    assert_eq!(parse_webp_dimensions(&bytes), dims(640, 480));
}

#[test]
fn test_webp_first_image_chunk_wins() {
    let bytes = riff_webp(&[
        (b"VP8X", vp8x_chunk(800, 600)),
        (b"VP8 ", vp8_chunk(400, 300)),
    ]);
    assert_eq!(parse_webp_dimensions(&bytes), dims(800, 600));
}

#[test]
fn test_webp_short_or_chunkless_is_none() {
    let bytes = riff_webp(&[(b"VP8X", vp8x_chunk(10, 10))]);
    assert_eq!(parse_webp_dimensions(&bytes[..29]), None);

    let no_image = riff_webp(&[(b"EXIF", vec![0; 20])]);
    assert_eq!(parse_webp_dimensions(&no_image), None);

    // Chunk size pointing far past the end of the buffer
    let mut oversized = riff_webp(&[(b"ICCP", vec![0; 10]), (b"VP8L", vp8l_chunk(5, 5))]);
    oversized[16..20].copy_from_slice(&u32::MAX.to_le_bytes());
    assert_eq!(parse_webp_dimensions(&oversized), None);
}

#[test]
fn test_image_dimensions_dispatch() {
    assert_eq!(image_dimensions(&png_bytes(320, 240)), dims(320, 240));
    assert_eq!(image_dimensions(&jpeg_bytes(320, 240)), dims(320, 240));
    assert_eq!(
        image_dimensions(&riff_webp(&[(b"VP8 ", vp8_chunk(320, 240))])),
        dims(320, 240)
    );
    assert_eq!(image_dimensions(b"plain text, not an image"), None);
}

#[test]
fn test_sniffers_never_panic_on_prefixes() {
    let samples = [
        png_bytes(100, 50),
        jpeg_bytes(100, 50),
        riff_webp(&[(b"VP8X", vp8x_chunk(100, 50))]),
        riff_webp(&[(b"VP8 ", vp8_chunk(100, 50))]),
        riff_webp(&[(b"VP8L", vp8l_chunk(100, 50))]),
    ];
    for sample in &samples {
        for len in 0..=sample.len() {
            let prefix = &sample[..len];
            let _ = image_dimensions(prefix);
            let _ = parse_png_dimensions(prefix);
            let _ = parse_jpeg_dimensions(prefix);
            let _ = parse_webp_dimensions(prefix);
        }
    }
}
