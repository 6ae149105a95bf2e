//! Image-reference collaborator: fetch an illustration URL for a node.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use crate::error::ImageError;

/// The image-reference collaborator. `cache_bust` is an opaque token the
/// provider may use to defeat caching between requests.
#[async_trait]
pub trait ImageProvider {
  async fn fetch_image_url(&self, cache_bust: u64) -> Result<String, ImageError>;
}

/// Wire shape of the provider's reply: `{url}` on success, `{error}` on
/// failure.
#[derive(Debug, Deserialize)]
pub(crate) struct ImageReply {
  pub url: Option<String>,
  pub error: Option<String>,
}

/// Interprets a provider reply, preferring a reported error over a missing
/// url.
pub(crate) fn interpret_reply(reply: ImageReply) -> Result<String, ImageError> {
  if let Some(error) = reply.error {
    return Err(ImageError::Provider(error));
  }
  reply
    .url
    .ok_or_else(|| ImageError::Provider("reply contained no url".to_string()))
}

/// HTTP-backed [ImageProvider] calling a `GET endpoint?t=<token>` API.
pub struct ImageClient {
  endpoint: String,
  http: reqwest::Client,
}

impl ImageClient {
  pub fn new(endpoint: impl Into<String>) -> Self {
    Self {
      endpoint: endpoint.into(),
      http: reqwest::Client::new(),
    }
  }
}

#[async_trait]
impl ImageProvider for ImageClient {
  #[instrument(level = "trace", skip(self))]
  async fn fetch_image_url(&self, cache_bust: u64) -> Result<String, ImageError> {
    let reply: ImageReply = self
      .http
      .get(&self.endpoint)
      .query(&[("t", cache_bust)])
      .send()
      .await?
      .json()
      .await?;
    interpret_reply(reply)
  }
}
