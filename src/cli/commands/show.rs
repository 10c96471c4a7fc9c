//! Metadata display command.

use std::path::Path;

use super::check_audio_file;
use crate::metadata;

/// Print the normalized metadata of one audio file
pub fn cmd_show(path: &Path) -> anyhow::Result<()> {
    check_audio_file(path)?;

    let name = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy();
    println!("File: {}", name);
    println!("{}", "=".repeat(60));

    match metadata::read(path) {
        Some(meta) => {
            println!("{}", meta);
            Ok(())
        }
        None => anyhow::bail!("Could not extract metadata (no tags found)"),
    }
}
