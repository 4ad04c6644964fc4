//! Error types for the Concierge asset pipeline.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Degraded image processing (a missing encoder, an unreadable header) is
//! not an error in this crate's sense: those paths return `Option`/`bool`
//! and fall back to the original asset. Only failures a caller must act on
//! are represented here.
//!
//! # Examples
//!
//! ```
//! use concierge_error::{AssetError, AssetErrorKind, ConciergeResult};
//!
//! fn open_bucket(name: &str) -> ConciergeResult<()> {
//!     Err(AssetError::new(AssetErrorKind::UnknownBucket(name.to_string())))?
//! }
//!
//! assert!(open_bucket("lobby").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod asset;
mod config;
mod error;

pub use asset::{AssetError, AssetErrorKind};
pub use config::{ConfigError, ConfigErrorKind};
pub use error::{ConciergeError, ConciergeErrorKind, ConciergeResult};
