//! Read-time resolution of `/api/v1/assets/{bucket}/{file_name}` requests.

use crate::{AssetConfig, Bucket, VariantCache};
use concierge_error::{AssetError, AssetErrorKind, ConciergeResult};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Extensions the variant cache can transcode.
const TRANSCODABLE: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// What the client asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetQuery {
    /// Requested width; `None` serves the full-size variant
    pub width: Option<u32>,
    /// Requested quality; the cache default when `None`
    pub quality: Option<u8>,
    /// Whether the client accepts `image/webp`
    pub accept_webp: bool,
}

impl Default for AssetQuery {
    fn default() -> Self {
        Self {
            width: None,
            quality: None,
            accept_webp: true,
        }
    }
}

/// The file a request should be answered with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAsset {
    /// File to stream
    pub path: PathBuf,
    /// `Content-Type` header value
    pub content_type: &'static str,
    /// `true` when `path` is a generated variant
    pub optimized: bool,
}

/// `Content-Type` for an asset extension.
pub fn content_type_for(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Maps asset requests onto stored sources and their variants.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    config: AssetConfig,
    cache: VariantCache,
}

impl AssetResolver {
    /// Create a resolver over the configured buckets.
    pub fn new(config: AssetConfig, cache: VariantCache) -> Self {
        Self { config, cache }
    }

    /// Resolve a stored asset, preferring a WebP variant when the client
    /// accepts one and the source is a raster image.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFileName` for names that are empty, hidden, or contain
    /// path components, and `NotFound` when the source does not exist.
    #[instrument(skip(self, query), fields(width = ?query.width, webp = query.accept_webp))]
    pub async fn resolve(
        &self,
        bucket: Bucket,
        file_name: &str,
        query: AssetQuery,
    ) -> ConciergeResult<ResolvedAsset> {
        validate_file_name(file_name)?;
        let source_path = self.config.upload_dir(bucket).join(file_name);

        let is_file = tokio::fs::metadata(&source_path)
            .await
            .map(|metadata| metadata.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(AssetError::new(AssetErrorKind::NotFound(format!(
                "{}/{}",
                bucket, file_name
            )))
            .into());
        }

        let ext = extension_of(&source_path);
        if query.accept_webp && TRANSCODABLE.contains(&ext.as_str()) {
            let width = query.width.unwrap_or(0);
            if let Some(path) = self
                .cache
                .variant_for(bucket, &source_path, width, query.quality)
                .await
            {
                return Ok(ResolvedAsset {
                    path,
                    content_type: content_type_for("webp"),
                    optimized: true,
                });
            }
            debug!("No variant available, serving original");
        }

        Ok(ResolvedAsset {
            content_type: content_type_for(&ext),
            path: source_path,
            optimized: false,
        })
    }
}

/// Reject names that are empty, hidden, or not a single path component.
///
/// A leading `.` also covers `.` and `..`, so separators are the only other
/// way out of the bucket directory.
pub(crate) fn validate_file_name(file_name: &str) -> ConciergeResult<()> {
    let invalid = file_name.is_empty()
        || file_name.starts_with('.')
        || file_name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(
            AssetError::new(AssetErrorKind::InvalidFileName(file_name.to_string())).into(),
        );
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}
