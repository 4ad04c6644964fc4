//! Configuration error types.

/// Kinds of configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A configuration source could not be read or merged
    #[display("Failed to build configuration: {}", _0)]
    Load(String),
    /// The merged configuration does not match the expected schema
    #[display("Failed to parse configuration: {}", _0)]
    Parse(String),
    /// A value deserialized but is out of range
    #[display("Invalid value for {}: {}", key, reason)]
    Invalid {
        /// Dotted key of the offending value (e.g. `assets.default_quality`)
        key: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Configuration error with location tracking.
///
/// # Examples
///
/// ```
/// use concierge_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::invalid("assets.cwebp_bin", "must not be empty");
/// assert!(matches!(err.kind(), ConfigErrorKind::Invalid { .. }));
/// assert!(err.to_string().contains("assets.cwebp_bin"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// The kind of error that occurred
    pub kind: ConfigErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new configuration error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for an [`ConfigErrorKind::Invalid`] value.
    #[track_caller]
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Invalid {
            key: key.into(),
            reason: reason.into(),
        })
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ConfigErrorKind {
        &self.kind
    }
}
