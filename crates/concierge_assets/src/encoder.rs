//! External WebP encoder invocation.
//!
//! Encoding is delegated to a `cwebp` executable. A missing or failing
//! encoder is an expected deployment state, so the contract is a plain
//! `bool`: `true` only when the process exited with status 0.

use crate::ImageDimensions;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};

/// One encode: read `input`, write WebP to `output`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeJob {
    /// Source image path
    pub input: PathBuf,
    /// Destination WebP path
    pub output: PathBuf,
    /// Encoder quality, already clamped by the caller
    pub quality: u8,
    /// Exact output size, when resizing
    pub resize: Option<ImageDimensions>,
}

/// Something that can transcode an image file to WebP.
///
/// Implementations must not fail loudly: every failure mode maps to `false`
/// so callers can fall back to the original asset.
#[async_trait::async_trait]
pub trait WebpEncoder: Send + Sync {
    /// Run the encode, returning `true` on success.
    async fn encode(&self, job: &EncodeJob) -> bool;
}

/// [`WebpEncoder`] backed by the `cwebp` command-line tool.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct CwebpEncoder {
    binary: PathBuf,
}

impl CwebpEncoder {
    /// Create an encoder that runs `binary` (a path or a name on `PATH`).
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait::async_trait]
impl WebpEncoder for CwebpEncoder {
    async fn encode(&self, job: &EncodeJob) -> bool {
        run_cwebp(&self.binary, job).await
    }
}

/// Build the `cwebp` argument list for a job.
///
/// `-quiet -mt -q {quality} [-resize {w} {h}] {input} -o {output}`
pub fn cwebp_args(job: &EncodeJob) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-quiet".into(),
        "-mt".into(),
        "-q".into(),
        job.quality.to_string().into(),
    ];
    if let Some(resize) = job.resize {
        args.push("-resize".into());
        args.push(resize.width.to_string().into());
        args.push(resize.height.to_string().into());
    }
    args.push(job.input.clone().into_os_string());
    args.push("-o".into());
    args.push(job.output.clone().into_os_string());
    args
}

/// Spawn `binary` for `job` and wait for it to exit.
///
/// Resolves to `false` on spawn errors and non-zero exits; never errors.
#[instrument(skip(job), fields(binary = %binary.display(), quality = job.quality, resize = ?job.resize))]
pub async fn run_cwebp(binary: &Path, job: &EncodeJob) -> bool {
    let status = Command::new(binary)
        .args(cwebp_args(job))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    match status {
        Ok(status) if status.success() => true,
        Ok(status) => {
            debug!(code = ?status.code(), "Encoder exited unsuccessfully");
            false
        }
        Err(e) => {
            debug!(error = %e, "Failed to spawn encoder");
            false
        }
    }
}
