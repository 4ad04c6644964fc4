//! Header inspection command.

use super::commands::OutputFormat;
use concierge_assets::{ImageDimensions, ImageFormat, detect_format, image_dimensions};
use serde::Serialize;
use std::error::Error;
use std::path::Path;

/// What the sniffers could read from a file header.
#[derive(Debug, Serialize)]
struct SniffReport {
    format: Option<ImageFormat>,
    dimensions: Option<ImageDimensions>,
    size_bytes: usize,
}

/// Print the format and dimensions of `file`.
pub async fn sniff(file: &Path, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    let bytes = tokio::fs::read(file).await?;
    let report = SniffReport {
        format: detect_format(&bytes),
        dimensions: image_dimensions(&bytes),
        size_bytes: bytes.len(),
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Human => {
            println!("File:       {}", file.display());
            println!("Size:       {} bytes", report.size_bytes);
            match report.format {
                Some(format) => println!("Format:     {}", format),
                None => println!("Format:     unrecognised"),
            }
            match report.dimensions {
                Some(dims) => println!("Dimensions: {}x{}", dims.width, dims.height),
                None => println!("Dimensions: unknown"),
            }
        }
    }

    Ok(())
}
