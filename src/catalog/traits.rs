//! Trait definition for the catalog service.
//!
//! The uploader only talks to [`CatalogApi`], so tests can substitute the
//! recording mock for the HTTP client.

use async_trait::async_trait;

use super::CatalogError;
use super::dto::{NewAlbum, NewTrack, SingerView};

/// Remote catalog operations used by the upload pipeline.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Singers whose name matches `query` (server-side, case-insensitive).
    async fn search_singers(&self, query: &str) -> Result<Vec<SingerView>, CatalogError>;

    /// Create a singer; returns its id.
    async fn create_singer(&self, name: &str, avatar: &str) -> Result<i64, CatalogError>;

    /// Create an album; returns its id.
    async fn create_album(&self, album: &NewAlbum) -> Result<i64, CatalogError>;

    /// Create a lyric; returns its id.
    async fn create_lyric(&self, content: &str) -> Result<i64, CatalogError>;

    /// Create a track; returns its id.
    async fn create_track(&self, track: &NewTrack) -> Result<i64, CatalogError>;
}

#[async_trait]
impl CatalogApi for super::client::HttpCatalog {
    async fn search_singers(&self, query: &str) -> Result<Vec<SingerView>, CatalogError> {
        self.search_singers(query).await
    }

    async fn create_singer(&self, name: &str, avatar: &str) -> Result<i64, CatalogError> {
        self.create_singer(name, avatar).await
    }

    async fn create_album(&self, album: &NewAlbum) -> Result<i64, CatalogError> {
        self.create_album(album).await
    }

    async fn create_lyric(&self, content: &str) -> Result<i64, CatalogError> {
        self.create_lyric(content).await
    }

    async fn create_track(&self, track: &NewTrack) -> Result<i64, CatalogError> {
        self.create_track(track).await
    }
}


#[cfg(test)]
mod tests {
    use super::mocks::{Call, RecordingCatalog};
    use super::*;

    #[tokio::test]
    async fn test_mock_search_is_case_insensitive_substring() {
        let catalog = RecordingCatalog::with_singers(&["Daft Punk", "Punk Rock Band"]);
        let found = catalog.search_singers("punk").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(catalog.calls(), vec![Call::SearchSinger("punk".to_string())]);
    }

    #[tokio::test]
    async fn test_mock_created_singer_is_searchable() {
        let catalog = RecordingCatalog::new();
        let id = catalog.create_singer("Björk", "").await.unwrap();
        let found = catalog.search_singers("BJÖRK").await.unwrap();
        assert_eq!(found[0].id, id);
    }

    #[tokio::test]
    async fn test_mock_failing_track() {
        let catalog = RecordingCatalog::new().failing_track_at(1);
        let track = NewTrack {
            name: "x".to_string(),
            singer: "y".to_string(),
            album: 1,
            cover: String::new(),
            url: "u".to_string(),
            lyric: 0,
            duration: 0,
            year: 0,
            track_number: 0,
            genre: String::new(),
            album_text: String::new(),
        };
        assert!(catalog.create_track(&track).await.is_err());
        assert!(catalog.created_tracks().is_empty());
    }
}
