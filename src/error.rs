//! Error taxonomy for store mutation, generation, and transport.

use thiserror::Error;

/// Structural or referential failure of a [crate::store::GraphStore]
/// mutation. Validation failures carry the full list of issues, one message
/// per offending field, addressed by 1-based node/choice index; nothing is
/// partially applied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
  #[error("invalid node data: {}", .0.join("; "))]
  Invalid(Vec<String>),
  #[error("no node with id {0}")]
  NotFound(u64),
  #[error("failed to persist story data: {0}")]
  Persist(String),
}

/// A single batch item's content request failed. Recorded per item; never
/// aborts sibling items or already-committed nodes.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("content generation failed: {0}")]
pub struct GenerationError(pub String);

/// Remote save/load/delete failed. Surfaced to the caller with the
/// underlying message; no automatic retry.
#[derive(Debug, Error)]
pub enum TransportError {
  #[error("transport request failed: {0}")]
  Http(#[from] reqwest::Error),
  #[error("remote rejected request: {0}")]
  Rejected(String),
}

/// Image-reference fetch failed. Tolerated during batch resolution (the node
/// is committed without an image), surfaced elsewhere.
#[derive(Debug, Error)]
pub enum ImageError {
  #[error("image request failed: {0}")]
  Http(#[from] reqwest::Error),
  #[error("image provider returned an error: {0}")]
  Provider(String),
}
