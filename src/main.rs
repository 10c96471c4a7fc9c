//! Sonora - audio metadata extraction and catalog ingestion.
//!
//! Reads tags and embedded artwork from MP3 (ID3v2) and Ogg Vorbis files,
//! stages audio and artwork into a sharded content store, and registers
//! albums, singers, tracks and lyrics with a remote catalog service.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod cover;
pub mod db;
pub mod error;
pub mod metadata;
pub mod scanner;
pub mod staging;
#[cfg(test)]
pub mod test_utils;
pub mod upload;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("sonora=info".parse()?))
        .init();

    cli::run_command(&args)
}
