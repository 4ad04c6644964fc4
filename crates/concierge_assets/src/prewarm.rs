//! Bulk variant generation for a bucket's stored sources.

use crate::{AssetConfig, Bucket, SourceStamp, VariantCache, VariantRequest};
use futures::future::join_all;
use serde::Serialize;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};

const PREWARM_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Counts from one prewarm pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PrewarmReport {
    /// Source files found in the bucket directory
    pub scanned: usize,
    /// Variant requests that produced a variant (generated or already cached)
    pub generated: usize,
}

/// Request the base variant (when `include_base`) and one variant per width
/// for every raster source in `upload_dir`.
///
/// An unreadable directory counts as empty and unreadable files are skipped.
/// All requests go through the variant cache concurrently; there is no bound
/// on the number of encoder processes this can start.
#[instrument(skip(cache, upload_dir, widths), fields(dir = %upload_dir.display()))]
pub async fn prewarm_asset_bucket(
    cache: &VariantCache,
    bucket: Bucket,
    upload_dir: &Path,
    widths: &[u32],
    include_base: bool,
) -> PrewarmReport {
    let sources = list_sources(upload_dir).await;

    let mut widths: Vec<u32> = widths.iter().copied().filter(|w| *w > 0).collect();
    widths.sort_unstable();
    widths.dedup();
    if include_base {
        widths.insert(0, 0);
    }

    let requests: Vec<VariantRequest> = sources
        .iter()
        .flat_map(|(path, stamp)| {
            widths.iter().map(move |width| VariantRequest {
                bucket,
                source_path: path.clone(),
                stamp: *stamp,
                width: *width,
                quality: None,
            })
        })
        .collect();

    let results = join_all(
        requests
            .iter()
            .map(|request| cache.get_or_create_webp_variant(request)),
    )
    .await;

    let report = PrewarmReport {
        scanned: sources.len(),
        generated: results.iter().filter(|path| path.is_some()).count(),
    };
    info!(
        scanned = report.scanned,
        generated = report.generated,
        requested = requests.len(),
        "Prewarmed bucket"
    );
    report
}

/// Prewarm every bucket with the configured widths.
pub async fn prewarm_all(cache: &VariantCache, config: &AssetConfig) -> Vec<(Bucket, PrewarmReport)> {
    let mut reports = Vec::new();
    for bucket in Bucket::iter() {
        let report = prewarm_asset_bucket(
            cache,
            bucket,
            config.upload_dir(bucket),
            &config.prewarm_widths,
            config.prewarm_include_base,
        )
        .await;
        reports.push((bucket, report));
    }
    reports
}

/// Regular, non-hidden raster files in `dir` with their stamps.
async fn list_sources(dir: &Path) -> Vec<(PathBuf, SourceStamp)> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "Bucket directory unreadable, treating as empty");
            return Vec::new();
        }
    };

    let mut sources = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "Stopped reading bucket directory");
                break;
            }
        };

        let path = entry.path();
        if !is_prewarm_candidate(&path) {
            continue;
        }
        let Ok(metadata) = tokio::fs::metadata(&path).await else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        if let Some(stamp) = SourceStamp::from_metadata(&metadata) {
            sources.push((path, stamp));
        }
    }
    sources.sort_by(|a, b| a.0.cmp(&b.0));
    sources
}

fn is_prewarm_candidate(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with('.') {
        return false;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| PREWARM_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
