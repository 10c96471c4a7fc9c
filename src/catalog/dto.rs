//! Catalog API Data Transfer Objects
//!
//! Request bodies and response payloads exactly as the catalog service
//! reads and writes them (camelCase on the wire).

use serde::{Deserialize, Serialize};

/// Response envelope shared by every action
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
    /// An object on success, a string describing the failure otherwise
    #[serde(default)]
    pub message: serde_json::Value,
}

/// `SearchSinger` request
#[derive(Debug, Clone, Serialize)]
pub struct SearchSingerRequest<'a> {
    pub query: &'a str,
}

/// `SearchSinger` payload
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSingerResponse {
    pub singers: Option<Vec<SingerView>>,
}

/// A singer as listed by search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingerView {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
}

/// `CreateSinger` request
#[derive(Debug, Clone, Serialize)]
pub struct CreateSingerRequest<'a> {
    pub name: &'a str,
    pub avatar: &'a str,
}

/// `CreateLyric` request
#[derive(Debug, Clone, Serialize)]
pub struct CreateLyricRequest<'a> {
    pub content: &'a str,
}

/// `CreateAlbum` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAlbum {
    pub name: String,
    /// Media token of the cover; empty when there is none
    pub cover: String,
    pub year: u32,
}

/// `CreateTrack` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrack {
    pub name: String,
    /// Display string of all artists
    pub singer: String,
    /// Album id; 0 for singles
    pub album: i64,
    pub cover: String,
    /// Media token of the audio file
    pub url: String,
    /// Lyric id; 0 when the track has none
    pub lyric: i64,
    pub duration: u64,
    pub year: u32,
    pub track_number: u32,
    pub genre: String,
    pub album_text: String,
}

/// Payload of every create action
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedResponse {
    pub id: Option<i64>,
}
