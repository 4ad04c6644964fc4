//! Configuration for the asset pipeline.
//!
//! Sources in order of precedence (later sources override earlier):
//! 1. Bundled defaults (`concierge.toml` shipped with the crate)
//! 2. `~/.config/concierge/concierge.toml`
//! 3. `./concierge.toml`
//! 4. `CONCIERGE_*` environment variables, `__` separating nested keys
//!    (e.g. `CONCIERGE_ASSETS__CWEBP_BIN=/usr/local/bin/cwebp`)
//!
//! User files are optional and skipped when absent.

use crate::Bucket;
use concierge_error::{ConciergeError, ConciergeResult, ConfigError, ConfigErrorKind};
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../concierge.toml");

/// Upload directory for each bucket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BucketDirs {
    /// Directory holding avatar uploads
    pub avatars: PathBuf,
    /// Directory holding hotel photography
    pub hotels: PathBuf,
    /// Directory holding home page imagery
    pub home: PathBuf,
}

impl BucketDirs {
    /// Upload directory for `bucket`.
    pub fn dir(&self, bucket: Bucket) -> &Path {
        match bucket {
            Bucket::Avatars => &self.avatars,
            Bucket::Hotels => &self.hotels,
            Bucket::Home => &self.home,
        }
    }

    /// Place every bucket under `root/{bucket}`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            avatars: root.join(Bucket::Avatars.as_str()),
            hotels: root.join(Bucket::Hotels.as_str()),
            home: root.join(Bucket::Home.as_str()),
        }
    }
}

/// Image pipeline settings.
///
/// ```toml
/// [assets]
/// cwebp_bin = "cwebp"
/// cache_dir = "data/asset-cache"
/// default_quality = 82
/// max_dimension = 2560
/// prewarm_widths = [480, 768, 1280, 1920]
/// prewarm_include_base = true
///
/// [assets.buckets]
/// avatars = "data/uploads/avatars"
/// hotels = "data/uploads/hotels"
/// home = "data/uploads/home"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AssetConfig {
    /// Path or `PATH` name of the `cwebp` executable
    pub cwebp_bin: String,
    /// Root of the variant cache; each bucket gets a subdirectory
    pub cache_dir: PathBuf,
    /// Encoder quality used when a request does not specify one
    pub default_quality: u8,
    /// Longest side of transcoded uploads when a request does not specify one
    pub max_dimension: u32,
    /// Widths generated by bucket prewarming
    #[serde(default)]
    pub prewarm_widths: Vec<u32>,
    /// Whether prewarming also generates the unresized variant
    #[serde(default = "default_include_base")]
    pub prewarm_include_base: bool,
    /// Upload directory per bucket
    pub buckets: BucketDirs,
}

fn default_include_base() -> bool {
    true
}

impl AssetConfig {
    /// Variant cache directory for `bucket`.
    pub fn cache_dir_for(&self, bucket: Bucket) -> PathBuf {
        self.cache_dir.join(bucket.as_str())
    }

    /// Upload directory for `bucket`.
    pub fn upload_dir(&self, bucket: Bucket) -> &Path {
        self.buckets.dir(bucket)
    }

    /// Check values deserialization cannot catch.
    ///
    /// # Errors
    ///
    /// Returns an error when the encoder binary or cache directory is empty,
    /// or the default quality is outside `1..=100`.
    pub fn validate(&self) -> ConciergeResult<()> {
        if self.cwebp_bin.trim().is_empty() {
            return Err(ConfigError::invalid("assets.cwebp_bin", "must not be empty").into());
        }
        if self.cache_dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid("assets.cache_dir", "must not be empty").into());
        }
        if !(1..=100).contains(&self.default_quality) {
            return Err(ConfigError::invalid(
                "assets.default_quality",
                format!("must be in 1..=100, got {}", self.default_quality),
            )
            .into());
        }
        Ok(())
    }
}

/// Top-level Concierge configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConciergeConfig {
    /// Image pipeline settings
    pub assets: AssetConfig,
}

impl ConciergeConfig {
    /// Load bundled defaults overridden by a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> ConciergeResult<Self> {
        debug!("Loading configuration from file");
        let builder = Self::defaults().add_source(File::from(path.as_ref()));
        Self::finish(builder)
    }

    /// Load configuration with precedence:
    /// environment > current dir > home dir > bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a present source cannot be parsed or the merged
    /// configuration is invalid.
    #[instrument]
    pub fn load() -> ConciergeResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder = Self::defaults();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/concierge/concierge.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("concierge").required(false))
            .add_source(Self::environment());

        Self::finish(builder)
    }

    /// Load bundled defaults, then `path`, then `CONCIERGE_*` variables taken
    /// from `vars` instead of the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a value cannot be parsed,
    /// or the merged configuration is invalid.
    pub fn from_file_and_vars<I, K, V>(path: impl AsRef<Path>, vars: I) -> ConciergeResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: config::Map<String, String> = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        let builder = Self::defaults()
            .add_source(File::from(path.as_ref()))
            .add_source(Self::environment().source(Some(vars)));
        Self::finish(builder)
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    // `CONCIERGE_ASSETS__CWEBP_BIN` -> `assets.cwebp_bin`
    fn environment() -> Environment {
        Environment::with_prefix("CONCIERGE")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("assets.prewarm_widths")
            .try_parsing(true)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> ConciergeResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| {
                ConciergeError::from(ConfigError::new(ConfigErrorKind::Load(e.to_string())))
            })?
            .try_deserialize()
            .map_err(|e| {
                ConciergeError::from(ConfigError::new(ConfigErrorKind::Parse(e.to_string())))
            })?;
        config.assets.validate()?;
        Ok(config)
    }
}
