//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `show`: Print a file's metadata
//! - `art`: Save a file's embedded cover art
//! - `upload`: Upload a folder as an album or as singles

mod art;
mod show;
mod upload;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::runtime::{Builder, Runtime};

use crate::config::{self, Config, Overrides};
use crate::error::{Error, Result};
use crate::scanner;

pub use art::cmd_get_art;
pub use show::cmd_show;
pub use upload::{cmd_upload_album, cmd_upload_singles};

/// Sonora CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: sonora/config.toml in the OS config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Catalog service base URL
    #[arg(long, global = true, env = "SONORA_API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// Root directory of the content store
    #[arg(long, global = true, env = "SONORA_STORAGE_ROOT")]
    pub storage_root: Option<PathBuf>,

    /// SQLite media store; staged files are referenced by UUID when set
    #[arg(long, global = true, env = "SONORA_MEDIA_DB")]
    pub media_db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Show metadata of an audio file
    Show {
        /// Path to the audio file (.mp3 or .ogg)
        file: PathBuf,
    },
    /// Extract embedded cover art from an audio file
    GetArt {
        /// Path to the audio file (.mp3 or .ogg)
        file: PathBuf,
        /// Directory to save the image in (default: next to the audio file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Upload audio files to the catalog
    Upload {
        #[command(subcommand)]
        target: UploadTarget,
    },
}

/// What a folder is uploaded as
#[derive(Subcommand)]
pub enum UploadTarget {
    /// Upload a folder as one album
    Album {
        /// Folder containing the album's audio files
        folder: PathBuf,
    },
    /// Upload every file in a folder as a standalone track
    Single {
        /// Folder containing the audio files
        folder: PathBuf,
    },
}

impl Cli {
    /// Configuration from file, with flag/env overrides applied
    pub fn load_config(&self) -> Config {
        config::load(self.config.as_deref()).with_overrides(Overrides {
            base_url: self.api_base_url.clone(),
            storage_root: self.storage_root.clone(),
            media_db: self.media_db.clone(),
        })
    }
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Show { file } => cmd_show(file),
        Commands::GetArt { file, output } => cmd_get_art(file, output.as_deref()),
        Commands::Upload { target } => {
            let config = cli.load_config();
            let rt = runtime()?;
            match target {
                UploadTarget::Album { folder } => cmd_upload_album(&rt, &config, folder),
                UploadTarget::Single { folder } => cmd_upload_singles(&rt, &config, folder),
            }
        }
    }
}

/// Single-threaded runtime: every catalog and store call is awaited in order
fn runtime() -> std::io::Result<Runtime> {
    Builder::new_current_thread().enable_all().build()
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Check that `path` is an existing audio file we can read.
pub(crate) fn check_audio_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::not_found(path));
    }
    if !path.is_file() {
        return Err(Error::NotAFile(path.to_path_buf()));
    }
    if !scanner::is_supported_audio_file(path) {
        return Err(Error::unsupported(path));
    }
    Ok(())
}

/// Check that `path` is an existing directory.
pub(crate) fn check_folder(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::not_found(path));
    }
    if !path.is_dir() {
        return Err(Error::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}
