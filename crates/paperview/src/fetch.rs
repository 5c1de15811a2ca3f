//! Credentialed document retrieval
//!
//! Fetches the full document body from the streaming gateway before decode;
//! the viewer never renders from a partial body. A non-success status is
//! fatal for the attempt.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::ViewerError;

/// The fetch seam the viewer depends on; tests substitute their own.
#[async_trait(?Send)]
pub trait FetchDocument {
    async fn fetch(&self, url: &str) -> Result<Bytes, ViewerError>;
}

/// HTTP fetcher carrying the caller's session credential
pub struct DocumentFetcher {
    client: reqwest::Client,
    credential: Option<String>,
}

impl DocumentFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            credential: None,
        }
    }

    /// Attach a session credential sent as a bearer token on every fetch.
    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            credential: Some(credential.into()),
        }
    }
}

impl Default for DocumentFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl FetchDocument for DocumentFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, ViewerError> {
        let mut request = self.client.get(url);
        if let Some(credential) = &self.credential {
            request = request.bearer_auth(credential);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ViewerError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ViewerError::Fetch(format!("unexpected status {status}")));
        }

        response
            .bytes()
            .await
            .map_err(|e| ViewerError::Fetch(e.to_string()))
    }
}
