//! File naming, URL and parameter clamping helpers shared by uploads and
//! the variant cache.

use crate::Bucket;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Lowest encoder quality the pipeline will request.
pub const MIN_QUALITY: u8 = 55;
/// Highest encoder quality the pipeline will request.
pub const MAX_QUALITY: u8 = 95;
/// Floor for the caller-tunable maximum upload dimension.
pub const MIN_MAX_DIMENSION: u32 = 640;
/// Longest sanitized stem embedded in a generated file name.
const MAX_STEM_LEN: usize = 48;
/// Stem used when a requested name has no usable characters.
const FALLBACK_STEM: &str = "asset";
/// Prefix used when a requested prefix has no usable characters.
const FALLBACK_PREFIX: &str = "upload";

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("Valid stem regex"));

/// Clamp an encoder quality into `[MIN_QUALITY, MAX_QUALITY]`.
pub fn clamp_quality(quality: u8) -> u8 {
    quality.clamp(MIN_QUALITY, MAX_QUALITY)
}

/// Apply the upload floor to a requested maximum dimension.
pub fn clamp_max_dimension(max_dimension: u32) -> u32 {
    max_dimension.max(MIN_MAX_DIMENSION)
}

/// Reduce a user-supplied file name to a safe, lowercase stem.
///
/// The extension is dropped, runs of anything other than ASCII letters and
/// digits become a single `-`, and the result is trimmed and truncated.
///
/// # Examples
///
/// ```
/// use concierge_assets::sanitize_stem;
///
/// assert_eq!(sanitize_stem("Lobby View (2).JPG"), "lobby-view-2");
/// assert_eq!(sanitize_stem("???"), "asset");
/// ```
pub fn sanitize_stem(requested_name: &str) -> String {
    let stem = Path::new(requested_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    sanitize_segment(&stem, FALLBACK_STEM)
}

/// Reduce a caller-supplied file name prefix to the same safe alphabet as
/// stems, so it can never introduce a path separator.
///
/// ```
/// use concierge_assets::sanitize_prefix;
///
/// assert_eq!(sanitize_prefix("../Hotel"), "hotel");
/// assert_eq!(sanitize_prefix("/"), "upload");
/// ```
pub fn sanitize_prefix(prefix: &str) -> String {
    sanitize_segment(prefix, FALLBACK_PREFIX)
}

fn sanitize_segment(raw: &str, fallback: &str) -> String {
    let lowered = raw.to_ascii_lowercase();
    let replaced = NON_ALPHANUMERIC.replace_all(&lowered, "-");
    let mut sanitized: String = replaced.trim_matches('-').chars().take(MAX_STEM_LEN).collect();
    while sanitized.ends_with('-') {
        sanitized.pop();
    }
    if sanitized.is_empty() {
        fallback.to_string()
    } else {
        sanitized
    }
}

/// Normalize a source extension: lowercase, no leading dot, `jpeg` → `jpg`.
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
    match ext.as_str() {
        "jpeg" => "jpg".to_string(),
        _ => ext,
    }
}

/// Public URL of a stored asset: `/api/v1/assets/{bucket}/{file_name}`.
pub fn asset_url(bucket: Bucket, file_name: &str) -> String {
    format!("/api/v1/assets/{}/{}", bucket.as_str(), file_name)
}

/// Four random bytes as eight lowercase hex digits.
pub(crate) fn random_hex() -> String {
    format!("{:08x}", rand::random::<u32>())
}

/// Collision-resistant base name for a new upload, without extension:
/// `{sanitizedPrefix}-{timestampMs}-{randomHex}-{sanitizedStem}`.
pub(crate) fn upload_base_name(prefix: &str, requested_name: &str) -> String {
    format!(
        "{}-{}-{}-{}",
        sanitize_prefix(prefix),
        chrono::Utc::now().timestamp_millis(),
        random_hex(),
        sanitize_stem(requested_name)
    )
}
