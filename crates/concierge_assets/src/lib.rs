//! On-demand image asset pipeline for the Concierge marketing site.
//!
//! Uploaded images are sniffed for format and dimensions straight from their
//! header bytes, transcoded to WebP through an external `cwebp` process, and
//! served through a content-addressed cache of resized variants.
//!
//! # Features
//!
//! - **Header sniffing**: PNG, JPEG and WebP dimensions without a codec
//! - **Graceful degradation**: a missing or failing encoder falls back to the
//!   original bytes; it never fails an upload or a read
//! - **Self-invalidating cache**: variant names embed source mtime and size
//! - **Request coalescing**: at most one encode per variant at a time
//!
//! # Example
//!
//! ```rust,no_run
//! use concierge_assets::{AssetPipeline, Bucket, ConciergeConfig, UploadRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConciergeConfig::load()?;
//! let pipeline = AssetPipeline::new(config.assets);
//!
//! let stored = pipeline
//!     .upload_image(&UploadRequest {
//!         bucket: Bucket::Hotels,
//!         file_prefix: "hotel".to_string(),
//!         requested_name: "Lobby.jpg".to_string(),
//!         source_ext: "jpg".to_string(),
//!         bytes: std::fs::read("lobby.jpg")?,
//!         max_dimension: None,
//!         quality: None,
//!     })
//!     .await?;
//!
//! // A 768px variant for the listing card, or `None` to serve the original
//! let card = pipeline.variant(Bucket::Hotels, &stored.file_name, 768, None).await;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bucket;
mod config;
mod encoder;
mod inflight;
mod naming;
mod pipeline;
mod prewarm;
mod resize;
mod resolve;
mod sniff;
mod upload;
mod variant;

pub use bucket::Bucket;
pub use concierge_error::{
    AssetError, AssetErrorKind, ConciergeError, ConciergeErrorKind, ConciergeResult, ConfigError,
    ConfigErrorKind,
};
pub use config::{AssetConfig, BucketDirs, ConciergeConfig};
pub use encoder::{CwebpEncoder, EncodeJob, WebpEncoder, cwebp_args, run_cwebp};
pub use inflight::InFlightJobs;
pub use naming::{
    MAX_QUALITY, MIN_MAX_DIMENSION, MIN_QUALITY, asset_url, clamp_max_dimension, clamp_quality,
    normalize_extension, sanitize_prefix, sanitize_stem,
};
pub use pipeline::AssetPipeline;
pub use prewarm::{PrewarmReport, prewarm_all, prewarm_asset_bucket};
pub use resize::{constrain_by_max_dimension, constrain_by_target_width};
pub use resolve::{AssetQuery, AssetResolver, ResolvedAsset, content_type_for};
pub use sniff::{
    ImageDimensions, ImageFormat, detect_format, image_dimensions, parse_jpeg_dimensions,
    parse_png_dimensions, parse_webp_dimensions,
};
pub use upload::{
    UploadDefaults, UploadRequest, UploadedImageResult, save_raw_uploaded_asset,
    save_uploaded_image,
};
pub use variant::{SourceStamp, VariantCache, VariantRequest, variant_file_name};
