//! Remote catalog service client.
//!
//! The catalog owns albums, singers, tracks and lyrics. Every call is a
//! `POST {base_url}{endpoint}?Action={Action}` with a JSON body, answered by
//! an envelope:
//!
//! ```json
//! { "requestId": "...", "code": 200, "message": { "id": 42 } }
//! ```
//!
//! Handler errors come back with HTTP 200 and a string `message`, so a
//! successful status alone does not mean the call succeeded.
//!
//! # Architecture
//!
//! ```text
//! CatalogUploader → CatalogApi (trait) → HttpCatalog → reqwest
//!                                      ↘ mocks (tests)
//! ```

pub mod client;
pub mod dto;
pub mod traits;

pub use client::HttpCatalog;
pub use dto::{NewAlbum, NewTrack, SingerView};
pub use traits::CatalogApi;

/// Catalog actions and the endpoint family each one is sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    SearchSinger,
    CreateSinger,
    CreateAlbum,
    CreateTrack,
    CreateLyric,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::SearchSinger => "SearchSinger",
            Action::CreateSinger => "CreateSinger",
            Action::CreateAlbum => "CreateAlbum",
            Action::CreateTrack => "CreateTrack",
            Action::CreateLyric => "CreateLyric",
        }
    }

    /// Whether the action creates a record
    pub fn is_create(self) -> bool {
        !matches!(self, Action::SearchSinger)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from catalog calls. All of them abort the current upload.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Network error during {action}: {message}")]
    Network { action: Action, message: String },

    #[error("{action} failed with HTTP {status}")]
    Http { action: Action, status: u16 },

    #[error("{action} rejected by catalog: {message}")]
    Rejected { action: Action, message: String },

    #[error("{action} response is missing `{field}`")]
    MissingField {
        action: Action,
        field: &'static str,
    },

    #[error("Failed to parse {action} response: {message}")]
    Parse { action: Action, message: String },
}

impl CatalogError {
    /// The action that failed, when the failure came from a call
    pub fn action(&self) -> Option<Action> {
        match self {
            CatalogError::Client(_) => None,
            CatalogError::Network { action, .. }
            | CatalogError::Http { action, .. }
            | CatalogError::Rejected { action, .. }
            | CatalogError::MissingField { action, .. }
            | CatalogError::Parse { action, .. } => Some(*action),
        }
    }
}
