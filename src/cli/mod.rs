//! Command-line interface for sonora.
//!
//! Commands for inspecting audio files and uploading albums or singles to
//! the catalog.

mod commands;

pub use commands::{Cli, Commands, UploadTarget, run_command};
