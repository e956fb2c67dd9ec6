//! Game-organizer REST client.
//!
//! Async HTTP client using `reqwest`. Implements [`LibraryStore`] so a
//! [`LibraryView`](gameshelf_library::LibraryView) can run against a live server.

use std::time::Duration;

use futures_util::future::BoxFuture;
use gameshelf_library::{
    CatalogResult, EntryId, EntryPayload, LibraryEntry, LibraryStore, StoreError,
};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Method, RequestBuilder};
use tracing::debug;

use crate::types::CatalogHit;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the game-organizer client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid server URL: {0:?}")]
    InvalidUrl(String),
}

impl From<Error> for StoreError {
    fn from(err: Error) -> Self {
        match err {
            Error::Api { status, body } => StoreError::Rejected { status, body },
            Error::Json(e) => StoreError::Json(e),
            other => StoreError::Http(other.to_string()),
        }
    }
}

/// Game-organizer API client.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Creates a client for the server at `base_url` (e.g. `http://localhost:8080`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::InvalidUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%method, %url, "sending request");
        self.http.request(method, url)
    }

    /// Sends the request and returns the body of a 2xx response.
    async fn send(&self, req: RequestBuilder) -> Result<Vec<u8>, Error> {
        let resp = req.send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.bytes().await?.to_vec())
    }

    /// Searches the external catalog by name.
    pub async fn search(&self, name: &str) -> Result<Vec<CatalogResult>, Error> {
        let encoded = utf8_percent_encode(name, NON_ALPHANUMERIC).to_string();
        let body = self
            .send(self.request(Method::GET, &format!("/api/games/organize?name={encoded}")))
            .await?;
        let hits: Vec<CatalogHit> = serde_json::from_slice(&body)?;
        Ok(hits.into_iter().map(CatalogResult::from).collect())
    }

    /// Returns the whole library.
    pub async fn library(&self) -> Result<Vec<LibraryEntry>, Error> {
        let body = self.send(self.request(Method::GET, "/api/library")).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Upserts an entry. The server matches existing entries by `rawgId`.
    pub async fn save(&self, payload: &EntryPayload) -> Result<(), Error> {
        self.send(self.request(Method::POST, "/api/library").json(payload))
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: EntryId) -> Result<(), Error> {
        self.send(self.request(Method::DELETE, &format!("/api/library/{id}")))
            .await?;
        Ok(())
    }

    /// Persists manual order: each id gets its index as `listOrder`.
    pub async fn reorder(&self, ordered_ids: &[EntryId]) -> Result<(), Error> {
        self.send(self.request(Method::POST, "/api/library/reorder").json(ordered_ids))
            .await?;
        Ok(())
    }
}

impl LibraryStore for Client {
    fn search_catalog(
        &self,
        query: String,
    ) -> BoxFuture<'_, Result<Vec<CatalogResult>, StoreError>> {
        Box::pin(async move { Ok(self.search(&query).await?) })
    }

    fn fetch_library(&self) -> BoxFuture<'_, Result<Vec<LibraryEntry>, StoreError>> {
        Box::pin(async move { Ok(self.library().await?) })
    }

    fn save_entry(&self, payload: EntryPayload) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move { Ok(self.save(&payload).await?) })
    }

    fn delete_entry(&self, id: EntryId) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move { Ok(self.delete(id).await?) })
    }

    fn persist_reorder(&self, ordered_ids: Vec<EntryId>) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move { Ok(self.reorder(&ordered_ids).await?) })
    }
}
