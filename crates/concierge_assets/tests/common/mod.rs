//! Shared fixtures for asset pipeline tests.

#![allow(dead_code)]

use concierge_assets::{AssetConfig, BucketDirs, EncodeJob, WebpEncoder};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Encoder double that records jobs and copies input to output.
pub struct CountingEncoder {
    calls: AtomicUsize,
    jobs: Mutex<Vec<EncodeJob>>,
    delay: Duration,
    succeed: bool,
}

impl CountingEncoder {
    pub fn working() -> Self {
        Self::new(Duration::ZERO, true)
    }

    pub fn slow(delay: Duration) -> Self {
        Self::new(delay, true)
    }

    pub fn broken() -> Self {
        Self::new(Duration::ZERO, false)
    }

    fn new(delay: Duration, succeed: bool) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            jobs: Mutex::new(Vec::new()),
            delay,
            succeed,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn jobs(&self) -> Vec<EncodeJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl WebpEncoder for CountingEncoder {
    async fn encode(&self, job: &EncodeJob) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.jobs.lock().unwrap().push(job.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if !self.succeed {
            return false;
        }
        tokio::fs::copy(&job.input, &job.output).await.is_ok()
    }
}

/// Configuration rooted in a temporary directory.
pub fn test_config(root: &Path) -> AssetConfig {
    AssetConfig {
        cwebp_bin: "cwebp".to_string(),
        cache_dir: root.join("cache"),
        default_quality: 82,
        max_dimension: 2560,
        prewarm_widths: vec![480, 768],
        prewarm_include_base: true,
        buckets: BucketDirs::under(root.join("uploads")),
    }
}

/// Minimal PNG: signature and IHDR chunk.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 2, 0, 0, 0]);
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes
}

/// Minimal JPEG: SOI, an APP0 segment, then a baseline SOF0 header.
pub fn jpeg_bytes(width: u16, height: u16) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8];
    bytes.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
    bytes.extend_from_slice(b"JFIF\0");
    bytes.extend_from_slice(&[1, 1, 0, 0, 1, 0, 1, 0, 0]);
    bytes.extend_from_slice(&sof_segment(0xC0, width, height));
    bytes.extend_from_slice(&[0xFF, 0xD9]);
    bytes
}

/// A start-of-frame segment with three components.
pub fn sof_segment(marker: u8, width: u16, height: u16) -> Vec<u8> {
    let mut segment = vec![0xFF, marker, 0x00, 0x11, 0x08];
    segment.extend_from_slice(&height.to_be_bytes());
    segment.extend_from_slice(&width.to_be_bytes());
    segment.extend_from_slice(&[3, 1, 0x22, 0, 2, 0x11, 1, 3, 0x11, 1]);
    segment
}

/// RIFF/WEBP container around the given chunks.
pub fn riff_webp(chunks: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
    let mut body = b"WEBP".to_vec();
    for (tag, data) in chunks {
        body.extend_from_slice(*tag);
        body.extend_from_slice(&(data.len() as u32).to_le_bytes());
        body.extend_from_slice(data);
        if data.len() % 2 == 1 {
            body.push(0);
        }
    }
    let mut bytes = b"RIFF".to_vec();
    bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&body);
    bytes
}

/// `VP8X` payload for the given canvas size.
pub fn vp8x_chunk(width: u32, height: u32) -> Vec<u8> {
    let mut data = vec![0x10, 0, 0, 0];
    data.extend_from_slice(&(width - 1).to_le_bytes()[..3]);
    data.extend_from_slice(&(height - 1).to_le_bytes()[..3]);
    data
}

/// `VP8 ` keyframe header payload for the given size.
pub fn vp8_chunk(width: u16, height: u16) -> Vec<u8> {
    let mut data = vec![0x30, 0x01, 0x00, 0x9D, 0x01, 0x2A];
    data.extend_from_slice(&width.to_le_bytes());
    data.extend_from_slice(&height.to_le_bytes());
    data
}

/// `VP8L` payload packing 14-bit `width - 1` and `height - 1`, followed by
/// a few bytes standing in for the bitstream.
pub fn vp8l_chunk(width: u32, height: u32) -> Vec<u8> {
    let w = width - 1;
    let h = height - 1;
    vec![
        0x2F,
        (w & 0xFF) as u8,
        (((w >> 8) & 0x3F) | ((h & 0x03) << 6)) as u8,
        ((h >> 2) & 0xFF) as u8,
        ((h >> 10) & 0x0F) as u8,
        0,
        0,
        0,
        0,
        0,
    ]
}
