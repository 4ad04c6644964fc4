//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the
//! concierge binary.

mod assets;
mod commands;
mod inspect;

pub use assets::{UploadOptions, load_config, prewarm, resolve, upload, variant};
pub use commands::{Cli, Commands};
pub use inspect::sniff;
