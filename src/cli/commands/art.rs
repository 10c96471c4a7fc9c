//! Cover art extraction command.

use std::path::Path;

use super::check_audio_file;
use crate::cover;
use crate::error::ResultExt;

/// Save the embedded cover next to the audio file, or into `output`
pub fn cmd_get_art(path: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    check_audio_file(path)?;

    let name = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy();
    println!("Extracting cover art from: {}", name);

    let Some(blob) = cover::extract(path) else {
        anyhow::bail!("No cover art found in the audio file");
    };

    let out_dir = match output {
        Some(dir) => dir,
        None => path.parent().unwrap_or(Path::new(".")),
    };
    let saved = cover::save(&blob, path, out_dir).with_context("saving cover art")?;
    println!("Cover art saved to: {}", saved.display());
    Ok(())
}
