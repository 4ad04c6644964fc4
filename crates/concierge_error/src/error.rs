//! Top-level error wrapper types.

use crate::{AssetError, ConfigError};

/// Every error a Concierge operation can surface.
///
/// # Examples
///
/// ```
/// use concierge_error::{ConciergeError, ConfigError, ConfigErrorKind};
///
/// let err: ConciergeError =
///     ConfigError::new(ConfigErrorKind::Parse("missing field `assets`".to_string())).into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum ConciergeErrorKind {
    /// Asset pipeline error
    #[from(AssetError)]
    Asset(AssetError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Concierge error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Concierge Error: {}", _0)]
pub struct ConciergeError(Box<ConciergeErrorKind>);

impl ConciergeError {
    /// Create a new error from a kind.
    pub fn new(kind: ConciergeErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ConciergeErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to ConciergeErrorKind
impl<T> From<T> for ConciergeError
where
    T: Into<ConciergeErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Concierge operations.
pub type ConciergeResult<T> = std::result::Result<T, ConciergeError>;
