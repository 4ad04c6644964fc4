//! Upload save path.
//!
//! Photographic uploads are transcoded to WebP when the encoder is available
//! and stored verbatim otherwise, so every upload produces a usable asset.
//! Icons and other formats that must keep their bytes use
//! [`save_raw_uploaded_asset`].
//!
//! Generated names embed a millisecond timestamp and four random bytes, which
//! keeps concurrent uploads from colliding without any locking.

use crate::naming::{
    asset_url, clamp_max_dimension, clamp_quality, normalize_extension, upload_base_name,
};
use crate::variant::remove_quietly;
use crate::{
    Bucket, EncodeJob, WebpEncoder, constrain_by_max_dimension, detect_format, image_dimensions,
};
use concierge_error::{AssetError, AssetErrorKind, ConciergeResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// An uploaded file as received from the route layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// Destination bucket
    pub bucket: Bucket,
    /// Leading component of the generated file name (e.g. `hotel`)
    pub file_prefix: String,
    /// Client-supplied file name, used only for a readable stem
    pub requested_name: String,
    /// Extension of the uploaded file
    pub source_ext: String,
    /// Raw uploaded bytes
    pub bytes: Vec<u8>,
    /// Longest side of the stored image; the configured default when `None`
    pub max_dimension: Option<u32>,
    /// Encoder quality; the configured default when `None`
    pub quality: Option<u8>,
}

/// Outcome of storing an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImageResult {
    /// Name of the stored file inside the bucket directory
    pub file_name: String,
    /// Public URL of the stored file
    pub url: String,
    /// `true` when the stored file is a transcoded WebP
    pub optimized: bool,
}

/// Values applied when an upload does not specify its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadDefaults {
    /// Encoder quality
    pub quality: u8,
    /// Longest side of stored images
    pub max_dimension: u32,
}

/// Store an upload's bytes unchanged.
///
/// # Errors
///
/// Returns an error if the extension is unknown or the file cannot be written.
#[instrument(skip(upload_dir, request), fields(bucket = %request.bucket, size = request.bytes.len()))]
pub async fn save_raw_uploaded_asset(
    upload_dir: &Path,
    request: &UploadRequest,
) -> ConciergeResult<UploadedImageResult> {
    ensure_dir(upload_dir).await?;

    let ext = upload_extension(request)?;
    let file_name = format!(
        "{}.{}",
        upload_base_name(&request.file_prefix, &request.requested_name),
        ext
    );
    write_file(&upload_dir.join(&file_name), &request.bytes).await?;

    info!(file_name = %file_name, "Stored raw upload");
    Ok(UploadedImageResult {
        url: asset_url(request.bucket, &file_name),
        file_name,
        optimized: false,
    })
}

/// Store a photographic upload, transcoding to WebP when possible.
///
/// Quality is clamped to `[55, 95]` and the maximum dimension floored at
/// 640px. A resize is only passed to the encoder when it changes the sniffed
/// dimensions. If the encode fails for any reason, the original bytes are
/// stored under the original extension and `optimized` is `false`.
///
/// # Errors
///
/// Returns an error only when the upload directory or the fallback file
/// cannot be written.
#[instrument(skip(encoder, defaults, upload_dir, request), fields(bucket = %request.bucket, size = request.bytes.len()))]
pub async fn save_uploaded_image(
    encoder: &dyn WebpEncoder,
    defaults: UploadDefaults,
    upload_dir: &Path,
    request: &UploadRequest,
) -> ConciergeResult<UploadedImageResult> {
    ensure_dir(upload_dir).await?;

    let ext = upload_extension(request)?;
    let quality = clamp_quality(request.quality.unwrap_or(defaults.quality));
    let max_dimension = clamp_max_dimension(request.max_dimension.unwrap_or(defaults.max_dimension));
    let base_name = upload_base_name(&request.file_prefix, &request.requested_name);

    let resize = image_dimensions(&request.bytes).and_then(|dims| {
        let fitted = constrain_by_max_dimension(dims, max_dimension);
        (fitted != dims).then_some(fitted)
    });

    // Dot-prefixed so bucket scans never pick it up
    let temp_path = upload_dir.join(format!(".{}.{}.tmp", base_name, ext));
    let webp_name = format!("{}.webp", base_name);
    let webp_path = upload_dir.join(&webp_name);

    let encoded = match tokio::fs::write(&temp_path, &request.bytes).await {
        Ok(()) => {
            let job = EncodeJob {
                input: temp_path.clone(),
                output: webp_path,
                quality,
                resize,
            };
            encoder.encode(&job).await
        }
        Err(e) => {
            debug!(path = %temp_path.display(), error = %e, "Failed to stage upload for encoding");
            false
        }
    };
    remove_quietly(&temp_path).await;

    if encoded {
        info!(file_name = %webp_name, quality, resize = ?resize, "Stored optimized upload");
        return Ok(UploadedImageResult {
            url: asset_url(request.bucket, &webp_name),
            file_name: webp_name,
            optimized: true,
        });
    }

    let file_name = format!("{}.{}", base_name, ext);
    write_file(&upload_dir.join(&file_name), &request.bytes).await?;

    warn!(file_name = %file_name, "WebP encode unavailable, stored original upload");
    Ok(UploadedImageResult {
        url: asset_url(request.bucket, &file_name),
        file_name,
        optimized: false,
    })
}

/// Normalized extension of the upload, falling back to the sniffed format.
fn upload_extension(request: &UploadRequest) -> ConciergeResult<String> {
    let ext = normalize_extension(&request.source_ext);
    if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Ok(ext);
    }
    detect_format(&request.bytes)
        .map(|format| format.extension().to_string())
        .ok_or_else(|| {
            AssetError::new(AssetErrorKind::InvalidFileName(format!(
                "{} has no usable extension",
                request.requested_name
            )))
            .into()
        })
}

async fn ensure_dir(dir: &Path) -> ConciergeResult<()> {
    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        AssetError::new(AssetErrorKind::DirectoryCreation(format!(
            "{}: {}",
            dir.display(),
            e
        )))
        .into()
    })
}

async fn write_file(path: &Path, bytes: &[u8]) -> ConciergeResult<()> {
    tokio::fs::write(path, bytes).await.map_err(|e| {
        AssetError::new(AssetErrorKind::FileWrite(format!(
            "{}: {}",
            path.display(),
            e
        )))
        .into()
    })
}
