//! Service facade tying configuration, encoder and variant cache together.

use crate::{
    AssetConfig, AssetQuery, AssetResolver, Bucket, CwebpEncoder, PrewarmReport, ResolvedAsset,
    UploadDefaults, UploadRequest, UploadedImageResult, VariantCache, WebpEncoder, prewarm_all,
    prewarm_asset_bucket, save_raw_uploaded_asset, save_uploaded_image,
};
use crate::resolve::validate_file_name;
use concierge_error::ConciergeResult;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// The image asset pipeline as consumed by upload and asset-serving routes.
///
/// Cloning is cheap and clones share the in-flight job registry, so one
/// pipeline per process gives process-wide request coalescing.
#[derive(Clone)]
pub struct AssetPipeline {
    config: AssetConfig,
    encoder: Arc<dyn WebpEncoder>,
    cache: VariantCache,
}

impl AssetPipeline {
    /// Pipeline using the configured `cwebp` binary.
    pub fn new(config: AssetConfig) -> Self {
        let encoder = Arc::new(CwebpEncoder::new(&config.cwebp_bin));
        Self::with_encoder(config, encoder)
    }

    /// Pipeline using a specific encoder.
    pub fn with_encoder(config: AssetConfig, encoder: Arc<dyn WebpEncoder>) -> Self {
        let cache = VariantCache::new(
            config.cache_dir.clone(),
            config.default_quality,
            Arc::clone(&encoder),
        );
        Self {
            config,
            encoder,
            cache,
        }
    }

    /// Pipeline configuration.
    pub fn config(&self) -> &AssetConfig {
        &self.config
    }

    /// Shared variant cache.
    pub fn cache(&self) -> &VariantCache {
        &self.cache
    }

    /// Store a photographic upload, transcoding to WebP when possible.
    ///
    /// # Errors
    ///
    /// See [`save_uploaded_image`].
    pub async fn upload_image(&self, request: &UploadRequest) -> ConciergeResult<UploadedImageResult> {
        let defaults = UploadDefaults {
            quality: self.config.default_quality,
            max_dimension: self.config.max_dimension,
        };
        save_uploaded_image(
            self.encoder.as_ref(),
            defaults,
            self.config.upload_dir(request.bucket),
            request,
        )
        .await
    }

    /// Store an upload's bytes unchanged.
    ///
    /// # Errors
    ///
    /// See [`save_raw_uploaded_asset`].
    pub async fn upload_raw(&self, request: &UploadRequest) -> ConciergeResult<UploadedImageResult> {
        save_raw_uploaded_asset(self.config.upload_dir(request.bucket), request).await
    }

    /// Variant of a stored asset, `None` when the original should be served.
    ///
    /// Names that are hidden or not a single path component never reach the
    /// encoder and also yield `None`.
    pub async fn variant(
        &self,
        bucket: Bucket,
        file_name: &str,
        width: u32,
        quality: Option<u8>,
    ) -> Option<PathBuf> {
        if let Err(e) = validate_file_name(file_name) {
            debug!(bucket = %bucket, error = %e, "Refusing variant for invalid file name");
            return None;
        }
        let source_path = self.config.upload_dir(bucket).join(file_name);
        self.cache.variant_for(bucket, source_path, width, quality).await
    }

    /// Resolve an asset request to the file that should be served.
    ///
    /// # Errors
    ///
    /// See [`AssetResolver::resolve`].
    pub async fn resolve(
        &self,
        bucket: Bucket,
        file_name: &str,
        query: AssetQuery,
    ) -> ConciergeResult<ResolvedAsset> {
        AssetResolver::new(self.config.clone(), self.cache.clone())
            .resolve(bucket, file_name, query)
            .await
    }

    /// Prewarm every bucket with the configured widths.
    pub async fn prewarm_configured(&self) -> Vec<(Bucket, PrewarmReport)> {
        prewarm_all(&self.cache, &self.config).await
    }

    /// Prewarm the given buckets with explicit widths.
    pub async fn prewarm(
        &self,
        buckets: &[Bucket],
        widths: &[u32],
        include_base: bool,
    ) -> Vec<(Bucket, PrewarmReport)> {
        let mut reports = Vec::new();
        for bucket in buckets {
            let report = prewarm_asset_bucket(
                &self.cache,
                *bucket,
                self.config.upload_dir(*bucket),
                widths,
                include_base,
            )
            .await;
            reports.push((*bucket, report));
        }
        reports
    }
}

impl std::fmt::Debug for AssetPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetPipeline")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish()
    }
}
