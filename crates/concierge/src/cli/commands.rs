//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use concierge_assets::Bucket;
use std::path::PathBuf;

/// Concierge - image asset pipeline operations
#[derive(Parser, Debug)]
#[command(name = "concierge")]
#[command(about = "Image asset pipeline: sniffing, WebP uploads and variant caching", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file layered over the bundled defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the format and dimensions read from an image header
    Sniff {
        /// Image file to inspect
        file: PathBuf,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Store a file the way the upload routes do
    Upload {
        /// File to upload
        file: PathBuf,

        /// Destination bucket
        #[arg(long, value_parser = parse_bucket)]
        bucket: Bucket,

        /// Leading component of the stored file name
        #[arg(long)]
        prefix: String,

        /// Name to derive the stored stem from (defaults to the file's name)
        #[arg(long)]
        name: Option<String>,

        /// Store the bytes unchanged instead of transcoding
        #[arg(long)]
        raw: bool,

        /// Encoder quality (clamped to 55..=95)
        #[arg(long)]
        quality: Option<u8>,

        /// Longest side of the stored image (at least 640)
        #[arg(long)]
        max_dimension: Option<u32>,
    },

    /// Generate or look up a cached WebP variant
    Variant {
        /// Stored file name inside the bucket
        file_name: String,

        /// Bucket holding the source
        #[arg(long, value_parser = parse_bucket)]
        bucket: Bucket,

        /// Target width; 0 transcodes without resizing
        #[arg(long, default_value = "0")]
        width: u32,

        /// Encoder quality (clamped to 55..=95)
        #[arg(long)]
        quality: Option<u8>,
    },

    /// Show which file an asset request would be answered with
    Resolve {
        /// Stored file name inside the bucket
        file_name: String,

        /// Bucket holding the source
        #[arg(long, value_parser = parse_bucket)]
        bucket: Bucket,

        /// Requested width
        #[arg(long)]
        width: Option<u32>,

        /// Requested quality
        #[arg(long)]
        quality: Option<u8>,

        /// Resolve as a client that does not accept WebP
        #[arg(long)]
        no_webp: bool,
    },

    /// Generate variants for every stored source in one or all buckets
    Prewarm {
        /// Only this bucket (all buckets when omitted)
        #[arg(long, value_parser = parse_bucket)]
        bucket: Option<Bucket>,

        /// Widths to generate, comma separated (configured widths when omitted)
        #[arg(long, value_delimiter = ',')]
        widths: Option<Vec<u32>>,

        /// Skip the full-size variant
        #[arg(long)]
        no_base: bool,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

fn parse_bucket(value: &str) -> Result<Bucket, String> {
    value.parse::<Bucket>().map_err(|e| e.to_string())
}
