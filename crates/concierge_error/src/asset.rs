//! Asset pipeline error types.

/// Kinds of asset pipeline errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum AssetErrorKind {
    /// Failed to create an upload or cache directory
    #[display("Failed to create directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write an asset file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Asset not found in its bucket
    #[display("Asset not found: {}", _0)]
    NotFound(String),
    /// File name is empty, hidden, or escapes the bucket directory
    #[display("Invalid asset file name: {}", _0)]
    InvalidFileName(String),
    /// Bucket name is not one of the known buckets
    #[display("Unknown asset bucket: {}", _0)]
    UnknownBucket(String),
}

/// Asset pipeline error with location tracking.
///
/// # Examples
///
/// ```
/// use concierge_error::{AssetError, AssetErrorKind};
///
/// let err = AssetError::new(AssetErrorKind::NotFound("hotels/lobby.jpg".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Asset Error: {} at line {} in {}", kind, line, file)]
pub struct AssetError {
    /// The kind of error that occurred
    pub kind: AssetErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl AssetError {
    /// Create a new asset error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AssetErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AssetErrorKind {
        &self.kind
    }
}
