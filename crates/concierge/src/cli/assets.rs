//! Pipeline command handlers.

use concierge_assets::{
    AssetConfig, AssetPipeline, AssetQuery, Bucket, ConciergeConfig, PrewarmReport, UploadRequest,
};
use concierge_error::ConciergeResult;
use std::error::Error;
use std::path::Path;
use strum::IntoEnumIterator;
use tracing::info;

/// Upload flags gathered from the command line.
#[derive(Debug)]
pub struct UploadOptions {
    pub bucket: Bucket,
    pub prefix: String,
    pub name: Option<String>,
    pub raw: bool,
    pub quality: Option<u8>,
    pub max_dimension: Option<u32>,
}

/// Load the asset configuration from `path`, or from the standard locations.
pub fn load_config(path: Option<&Path>) -> ConciergeResult<AssetConfig> {
    let config = match path {
        Some(path) => ConciergeConfig::from_file(path)?,
        None => ConciergeConfig::load()?,
    };
    Ok(config.assets)
}

/// Store `file` in a bucket and print the result as JSON.
pub async fn upload(
    config: AssetConfig,
    file: &Path,
    options: UploadOptions,
) -> Result<(), Box<dyn Error>> {
    let bytes = tokio::fs::read(file).await?;
    let requested_name = options.name.unwrap_or_else(|| {
        file.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let source_ext = file
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default();

    let request = UploadRequest {
        bucket: options.bucket,
        file_prefix: options.prefix,
        requested_name,
        source_ext,
        bytes,
        max_dimension: options.max_dimension,
        quality: options.quality,
    };

    let pipeline = AssetPipeline::new(config);
    let result = if options.raw {
        pipeline.upload_raw(&request).await?
    } else {
        pipeline.upload_image(&request).await?
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Print the path of a variant, generating it if needed.
pub async fn variant(
    config: AssetConfig,
    bucket: Bucket,
    file_name: &str,
    width: u32,
    quality: Option<u8>,
) -> Result<(), Box<dyn Error>> {
    let pipeline = AssetPipeline::new(config);
    match pipeline.variant(bucket, file_name, width, quality).await {
        Some(path) => println!("{}", path.display()),
        None => println!("No variant available; serve the original {}/{}", bucket, file_name),
    }
    Ok(())
}

/// Print the file an asset request resolves to.
pub async fn resolve(
    config: AssetConfig,
    bucket: Bucket,
    file_name: &str,
    width: Option<u32>,
    quality: Option<u8>,
    accept_webp: bool,
) -> Result<(), Box<dyn Error>> {
    let pipeline = AssetPipeline::new(config);
    let query = AssetQuery {
        width,
        quality,
        accept_webp,
    };
    let resolved = pipeline.resolve(bucket, file_name, query).await?;
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}

/// Prewarm one or all buckets and print a line per bucket.
pub async fn prewarm(
    config: AssetConfig,
    bucket: Option<Bucket>,
    widths: Option<Vec<u32>>,
    no_base: bool,
) -> Result<(), Box<dyn Error>> {
    let pipeline = AssetPipeline::new(config);

    let reports: Vec<(Bucket, PrewarmReport)> = match (bucket, widths) {
        (None, None) if !no_base => pipeline.prewarm_configured().await,
        (bucket, widths) => {
            let buckets: Vec<Bucket> = match bucket {
                Some(bucket) => vec![bucket],
                None => Bucket::iter().collect(),
            };
            let widths = widths.unwrap_or_else(|| pipeline.config().prewarm_widths.clone());
            let include_base = !no_base && pipeline.config().prewarm_include_base;
            pipeline.prewarm(&buckets, &widths, include_base).await
        }
    };

    for (bucket, report) in &reports {
        println!(
            "{:<8} scanned {:>4}  variants {:>5}",
            bucket, report.scanned, report.generated
        );
    }
    let generated: usize = reports.iter().map(|(_, report)| report.generated).sum();
    info!(buckets = reports.len(), generated, "Prewarm complete");
    Ok(())
}
