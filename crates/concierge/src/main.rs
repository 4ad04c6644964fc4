//! Concierge CLI binary.
//!
//! Operator access to the image asset pipeline:
//! - Inspect image headers
//! - Store uploads the way the upload routes do
//! - Generate, resolve and prewarm WebP variants

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{
        Cli, Commands, UploadOptions, load_config, prewarm, resolve, sniff, upload, variant,
    };

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute the requested command
    let config_path = cli.config;
    match cli.command {
        Commands::Sniff { file, format } => {
            sniff(&file, format).await?;
        }

        Commands::Upload {
            file,
            bucket,
            prefix,
            name,
            raw,
            quality,
            max_dimension,
        } => {
            let options = UploadOptions {
                bucket,
                prefix,
                name,
                raw,
                quality,
                max_dimension,
            };
            upload(load_config(config_path.as_deref())?, &file, options).await?;
        }

        Commands::Variant {
            file_name,
            bucket,
            width,
            quality,
        } => {
            let config = load_config(config_path.as_deref())?;
            variant(config, bucket, &file_name, width, quality).await?;
        }

        Commands::Resolve {
            file_name,
            bucket,
            width,
            quality,
            no_webp,
        } => {
            let config = load_config(config_path.as_deref())?;
            resolve(config, bucket, &file_name, width, quality, !no_webp).await?;
        }

        Commands::Prewarm {
            bucket,
            widths,
            no_base,
        } => {
            let config = load_config(config_path.as_deref())?;
            prewarm(config, bucket, widths, no_base).await?;
        }
    }

    Ok(())
}
