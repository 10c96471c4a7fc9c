//! Album and singles upload commands.

use std::path::Path;
use tokio::runtime::Runtime;

use super::check_folder;
use crate::catalog::HttpCatalog;
use crate::config::Config;
use crate::error::{Result, ResultExt};
use crate::staging::ContentStager;
use crate::upload::CatalogUploader;

/// Upload a folder as one album
pub fn cmd_upload_album(rt: &Runtime, config: &Config, folder: &Path) -> anyhow::Result<()> {
    check_folder(folder)?;
    println!("Processing album folder: {}", display_name(folder));

    let summary = rt.block_on(async {
        let uploader = build_uploader(config).await?;
        uploader
            .upload_album(folder)
            .await
            .with_context("album upload failed")
    })?;

    for track in &summary.tracks {
        println!("  Track created: {} (ID: {})", track.title, track.track_id);
    }
    if summary.skipped > 0 {
        println!("Skipped {} file(s) without metadata", summary.skipped);
    }
    if summary.cover.is_empty() {
        println!("No album cover found");
    } else {
        println!("Album cover: {}", summary.cover);
    }

    println!("\nAlbum upload completed successfully!");
    println!("Album: {} (ID: {})", summary.name, summary.album_id);
    println!("Tracks: {} tracks processed", summary.tracks.len());
    Ok(())
}

/// Upload every file in a folder as a standalone track
pub fn cmd_upload_singles(rt: &Runtime, config: &Config, folder: &Path) -> anyhow::Result<()> {
    check_folder(folder)?;
    println!("Processing singles folder: {}", display_name(folder));

    let summary = rt.block_on(async {
        let uploader = build_uploader(config).await?;
        uploader
            .upload_singles(folder)
            .await
            .with_context("singles upload failed")
    })?;

    for track in &summary.tracks {
        println!("  Single created: {} (ID: {})", track.title, track.track_id);
    }
    if summary.skipped > 0 {
        println!("Skipped {} file(s) without metadata", summary.skipped);
    }
    println!("\nSingles upload completed successfully!");
    println!("Tracks: {} tracks processed", summary.tracks.len());
    Ok(())
}

async fn build_uploader(config: &Config) -> Result<CatalogUploader<HttpCatalog>> {
    let catalog = HttpCatalog::new(&config.catalog)?;
    let stager = ContentStager::from_config(&config.storage).await?;
    tracing::debug!(
        base_url = %catalog.base_url(),
        root = %stager.root().display(),
        media_store = stager.has_store(),
        "Uploader ready"
    );
    Ok(CatalogUploader::new(catalog, stager))
}

fn display_name(folder: &Path) -> String {
    folder
        .file_name()
        .unwrap_or(folder.as_os_str())
        .to_string_lossy()
        .into_owned()
}
