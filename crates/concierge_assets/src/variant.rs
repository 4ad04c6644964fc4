//! Content-addressed WebP variant cache.
//!
//! Variants live at `{cache_dir}/{bucket}/{variant_file_name}`. The file name
//! embeds the source's modification time and size, so editing a source makes
//! every old variant unreachable without an explicit invalidation step.
//! Unreachable variants stay on disk; nothing here deletes them.

use crate::inflight::InFlightJobs;
use crate::naming::{clamp_quality, random_hex};
use crate::{
    Bucket, EncodeJob, WebpEncoder, constrain_by_target_width, image_dimensions,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;
use tracing::{debug, info, instrument, warn};

/// Identity of a source file version: modification time and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceStamp {
    /// Modification time in milliseconds since the Unix epoch, rounded
    pub modified_ms: u64,
    /// File size in bytes
    pub size_bytes: u64,
}

impl SourceStamp {
    /// Take the stamp from file metadata.
    ///
    /// Returns `None` when the platform cannot report a modification time.
    pub fn from_metadata(metadata: &std::fs::Metadata) -> Option<Self> {
        let modified = metadata.modified().ok()?;
        let since_epoch = modified.duration_since(UNIX_EPOCH).unwrap_or_default();
        let modified_ms = (since_epoch.as_nanos() + 500_000) / 1_000_000;
        Some(Self {
            modified_ms: u64::try_from(modified_ms).unwrap_or(u64::MAX),
            size_bytes: metadata.len(),
        })
    }
}

/// A request for one derivative of a stored source asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRequest {
    /// Bucket the source belongs to
    pub bucket: Bucket,
    /// Path of the source asset
    pub source_path: PathBuf,
    /// Version of the source the variant is derived from
    pub stamp: SourceStamp,
    /// Target width; `0` keeps the source size and only transcodes
    pub width: u32,
    /// Encoder quality; the cache default when `None`
    pub quality: Option<u8>,
}

/// Cache file name for a variant:
/// `{stem}-{modified_ms}-{size_bytes}-w{width}-q{quality}.webp`.
///
/// # Examples
///
/// ```
/// use concierge_assets::{variant_file_name, SourceStamp};
///
/// let stamp = SourceStamp { modified_ms: 1_700_000_000_123, size_bytes: 52_431 };
/// assert_eq!(
///     variant_file_name("lobby", stamp, 768, 82),
///     "lobby-1700000000123-52431-w768-q82.webp"
/// );
/// ```
pub fn variant_file_name(stem: &str, stamp: SourceStamp, width: u32, quality: u8) -> String {
    format!(
        "{}-{}-{}-w{}-q{}.webp",
        stem, stamp.modified_ms, stamp.size_bytes, width, quality
    )
}

/// Lazily generated, coalesced WebP variants of stored assets.
#[derive(Clone)]
pub struct VariantCache {
    cache_dir: PathBuf,
    default_quality: u8,
    encoder: Arc<dyn WebpEncoder>,
    jobs: InFlightJobs<Option<PathBuf>>,
}

impl VariantCache {
    /// Create a cache rooted at `cache_dir`.
    pub fn new(
        cache_dir: impl Into<PathBuf>,
        default_quality: u8,
        encoder: Arc<dyn WebpEncoder>,
    ) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            default_quality,
            encoder,
            jobs: InFlightJobs::new(),
        }
    }

    /// Root directory of the cache.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Number of variant encodes currently running.
    pub fn pending(&self) -> usize {
        self.jobs.pending()
    }

    /// Path of the requested variant, generating it if needed.
    ///
    /// Concurrent requests for the same variant share a single encode.
    /// Returns `None` when no variant can be produced; the caller should
    /// serve the original.
    #[instrument(skip(self, request), fields(bucket = %request.bucket, source = %request.source_path.display(), width = request.width))]
    pub async fn get_or_create_webp_variant(&self, request: &VariantRequest) -> Option<PathBuf> {
        let quality = clamp_quality(request.quality.unwrap_or(self.default_quality));
        let stem = request.source_path.file_stem()?.to_string_lossy().into_owned();
        let file_name = variant_file_name(&stem, request.stamp, request.width, quality);
        let bucket_dir = self.cache_dir.join(request.bucket.as_str());
        let cache_path = bucket_dir.join(&file_name);

        if tokio::fs::try_exists(&cache_path).await.unwrap_or(false) {
            debug!(variant = %file_name, "Variant cache hit");
            return Some(cache_path);
        }

        let key = format!("{}:{}", request.bucket, file_name);
        let job = VariantJob {
            encoder: Arc::clone(&self.encoder),
            bucket: request.bucket,
            source_path: request.source_path.clone(),
            bucket_dir,
            cache_path,
            file_name,
            width: request.width,
            quality,
        };
        self.jobs.run(&key, move || job.generate()).await
    }

    /// Stat `source_path` and request its variant.
    ///
    /// Returns `None` when the source cannot be stat'ed.
    pub async fn variant_for(
        &self,
        bucket: Bucket,
        source_path: impl AsRef<Path>,
        width: u32,
        quality: Option<u8>,
    ) -> Option<PathBuf> {
        let source_path = source_path.as_ref();
        let metadata = match tokio::fs::metadata(source_path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!(source = %source_path.display(), error = %e, "Cannot stat variant source");
                return None;
            }
        };
        let request = VariantRequest {
            bucket,
            source_path: source_path.to_path_buf(),
            stamp: SourceStamp::from_metadata(&metadata)?,
            width,
            quality,
        };
        self.get_or_create_webp_variant(&request).await
    }
}

impl std::fmt::Debug for VariantCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantCache")
            .field("cache_dir", &self.cache_dir)
            .field("default_quality", &self.default_quality)
            .field("jobs", &self.jobs)
            .finish()
    }
}

/// Everything one variant encode needs, owned so it can run detached.
struct VariantJob {
    encoder: Arc<dyn WebpEncoder>,
    bucket: Bucket,
    source_path: PathBuf,
    bucket_dir: PathBuf,
    cache_path: PathBuf,
    file_name: String,
    width: u32,
    quality: u8,
}

impl VariantJob {
    async fn generate(self) -> Option<PathBuf> {
        // A job for this key may have finished since the caller's check
        if tokio::fs::try_exists(&self.cache_path).await.unwrap_or(false) {
            return Some(self.cache_path);
        }

        if let Err(e) = tokio::fs::create_dir_all(&self.bucket_dir).await {
            warn!(
                bucket = %self.bucket,
                dir = %self.bucket_dir.display(),
                error = %e,
                "Failed to create variant cache directory"
            );
            return None;
        }

        let resize = if self.width > 0 {
            match tokio::fs::read(&self.source_path).await {
                Ok(bytes) => image_dimensions(&bytes)
                    .and_then(|dims| constrain_by_target_width(dims, self.width)),
                Err(e) => {
                    warn!(
                        bucket = %self.bucket,
                        source = %self.source_path.display(),
                        error = %e,
                        "Failed to read variant source"
                    );
                    return None;
                }
            }
        } else {
            None
        };

        let temp_path = self
            .bucket_dir
            .join(format!("{}.{}.tmp", self.file_name, random_hex()));
        let encode = EncodeJob {
            input: self.source_path.clone(),
            output: temp_path.clone(),
            quality: self.quality,
            resize,
        };

        if !self.encoder.encode(&encode).await {
            warn!(
                bucket = %self.bucket,
                source = %self.source_path.display(),
                variant = %self.file_name,
                "Variant encode failed"
            );
            remove_quietly(&temp_path).await;
            return None;
        }

        if let Err(e) = tokio::fs::rename(&temp_path, &self.cache_path).await {
            warn!(
                bucket = %self.bucket,
                variant = %self.file_name,
                error = %e,
                "Failed to move variant into place"
            );
            remove_quietly(&temp_path).await;
            return None;
        }

        info!(
            bucket = %self.bucket,
            variant = %self.file_name,
            resize = ?resize,
            "Generated variant"
        );
        Some(self.cache_path)
    }
}

/// Best-effort removal; a leftover temp file is harmless.
pub(crate) async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        debug!(path = %path.display(), error = %e, "Temp file cleanup skipped");
    }
}
