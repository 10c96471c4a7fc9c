//! Catalog HTTP client
//!
//! No timeouts and no retries: a failed call is reported once and the
//! caller aborts.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::dto::{self, NewAlbum, NewTrack, SingerView};
use super::{Action, CatalogError};
use crate::config::{CatalogConfig, Endpoints};

/// User agent string
const USER_AGENT: &str = concat!("sonora/", env!("CARGO_PKG_VERSION"));

/// Header carrying the per-call idempotency key
pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// Catalog API client
pub struct HttpCatalog {
    http_client: reqwest::Client,
    base_url: String,
    endpoints: Endpoints,
    idempotency: Option<IdempotencyKeys>,
}

/// `<run id>-<sequence>` keys, one per create call in this run
struct IdempotencyKeys {
    run_id: Uuid,
    sequence: AtomicU64,
}

impl IdempotencyKeys {
    fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            sequence: AtomicU64::new(0),
        }
    }

    fn next(&self) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", self.run_id.simple(), seq)
    }
}

impl HttpCatalog {
    /// Create a client from configuration
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CatalogError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            endpoints: config.endpoints.clone(),
            idempotency: config.idempotency_keys.then(IdempotencyKeys::new),
        })
    }

    /// Create a client for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
            endpoints: Endpoints::default(),
            idempotency: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, action: Action) -> &str {
        match action {
            Action::SearchSinger | Action::CreateSinger => &self.endpoints.singer,
            Action::CreateAlbum => &self.endpoints.album,
            Action::CreateTrack | Action::CreateLyric => &self.endpoints.track,
        }
    }

    /// Find singers whose name matches `query`
    pub async fn search_singers(&self, query: &str) -> Result<Vec<SingerView>, CatalogError> {
        let action = Action::SearchSinger;
        let payload: dto::SearchSingerResponse = self
            .call(action, &dto::SearchSingerRequest { query })
            .await?;
        payload.singers.ok_or(CatalogError::MissingField {
            action,
            field: "singers",
        })
    }

    pub async fn create_singer(&self, name: &str, avatar: &str) -> Result<i64, CatalogError> {
        self.create(Action::CreateSinger, &dto::CreateSingerRequest { name, avatar })
            .await
    }

    pub async fn create_album(&self, album: &NewAlbum) -> Result<i64, CatalogError> {
        self.create(Action::CreateAlbum, album).await
    }

    pub async fn create_lyric(&self, content: &str) -> Result<i64, CatalogError> {
        self.create(Action::CreateLyric, &dto::CreateLyricRequest { content })
            .await
    }

    pub async fn create_track(&self, track: &NewTrack) -> Result<i64, CatalogError> {
        self.create(Action::CreateTrack, track).await
    }

    async fn create<B: Serialize + ?Sized>(
        &self,
        action: Action,
        body: &B,
    ) -> Result<i64, CatalogError> {
        let payload: dto::CreatedResponse = self.call(action, body).await?;
        payload
            .id
            .ok_or(CatalogError::MissingField { action, field: "id" })
    }

    /// Send one action and unwrap its envelope
    async fn call<B, T>(&self, action: Action, body: &B) -> Result<T, CatalogError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, self.endpoint(action));

        let mut request = self
            .http_client
            .post(&url)
            .query(&[("Action", action.as_str())])
            .json(body);

        if action.is_create()
            && let Some(keys) = &self.idempotency
        {
            request = request.header(IDEMPOTENCY_HEADER, keys.next());
        }

        tracing::debug!(action = %action, url = %url, "Catalog call");

        let response = request.send().await.map_err(|e| CatalogError::Network {
            action,
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Http {
                action,
                status: status.as_u16(),
            });
        }

        let envelope = response
            .json::<dto::Envelope>()
            .await
            .map_err(|e| CatalogError::Parse {
                action,
                message: e.to_string(),
            })?;

        decode_message(action, envelope.message)
    }
}

/// Turn an envelope `message` into the action's payload.
///
/// An object is the payload; a string is a handler error; anything else is
/// treated as a rejection too.
pub fn decode_message<T: DeserializeOwned>(
    action: Action,
    message: serde_json::Value,
) -> Result<T, CatalogError> {
    match message {
        serde_json::Value::Object(_) => {
            serde_json::from_value(message).map_err(|e| CatalogError::Parse {
                action,
                message: e.to_string(),
            })
        }
        serde_json::Value::String(message) => Err(CatalogError::Rejected { action, message }),
        other => Err(CatalogError::Rejected {
            action,
            message: other.to_string(),
        }),
    }
}
