//! Remote persistence collaborator: save/load/delete story snapshots.
//!
//! Loading fully replaces local state through the store's atomic
//! `replace_all`; there are no merge semantics. Transport failures propagate
//! to the caller with the underlying message and are never retried here.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::error::TransportError;
use crate::types::Snapshot;

/// The remote persistence collaborator.
#[async_trait]
pub trait RemoteStore {
  /// Persists a snapshot and returns the URL it can be loaded from.
  async fn save(&self, snapshot: &Snapshot) -> Result<String, TransportError>;
  /// Fetches the snapshot stored at `url`.
  async fn load(&self, url: &str) -> Result<Snapshot, TransportError>;
  /// Removes the snapshot stored at `url`.
  async fn delete(&self, url: &str) -> Result<(), TransportError>;
}

#[derive(Debug, Deserialize)]
struct SaveReply {
  url: String,
}

/// HTTP blob-store client: `POST {base}/save` with the snapshot body,
/// `GET <url>` to load, `DELETE {base}/delete?url=<url>` to remove.
pub struct BlobClient {
  base_url: String,
  http: reqwest::Client,
}

impl BlobClient {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      base_url: base_url.into(),
      http: reqwest::Client::new(),
    }
  }
}

/// Maps a non-success response to [TransportError::Rejected] carrying the
/// status and body text.
async fn reject_on_error(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }
  let body = response.text().await.unwrap_or_default();
  Err(TransportError::Rejected(format!("{status}: {body}")))
}

#[async_trait]
impl RemoteStore for BlobClient {
  #[instrument(level = "trace", skip(self, snapshot), fields(nodes = snapshot.nodes.len()))]
  async fn save(&self, snapshot: &Snapshot) -> Result<String, TransportError> {
    let response = self
      .http
      .post(format!("{}/save", self.base_url))
      .json(snapshot)
      .send()
      .await?;
    let reply: SaveReply = reject_on_error(response).await?.json().await?;
    info!(url = %reply.url, "snapshot saved");
    Ok(reply.url)
  }

  #[instrument(level = "trace", skip(self))]
  async fn load(&self, url: &str) -> Result<Snapshot, TransportError> {
    let response = self.http.get(url).send().await?;
    let snapshot: Snapshot = reject_on_error(response).await?.json().await?;
    info!(nodes = snapshot.nodes.len(), "snapshot loaded");
    Ok(snapshot)
  }

  #[instrument(level = "trace", skip(self))]
  async fn delete(&self, url: &str) -> Result<(), TransportError> {
    let response = self
      .http
      .delete(format!("{}/delete", self.base_url))
      .query(&[("url", url)])
      .send()
      .await?;
    reject_on_error(response).await?;
    Ok(())
  }
}
