//! Remote-persistence payload: the exported graph plus a version stamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::StoryNode;

/// Version stamp written into every saved snapshot.
pub const SNAPSHOT_VERSION: &str = "1.0.0";

/// Remote-persistence payload: the full node set plus a version stamp and a
/// last-updated timestamp. Loading a snapshot fully replaces local state; no
/// merge semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
  pub nodes: Vec<StoryNode>,
  pub version: String,
  #[serde(rename = "lastUpdated")]
  pub last_updated: DateTime<Utc>,
}

impl Snapshot {
  /// Stamps the given node set with the current version and time.
  pub fn new(nodes: Vec<StoryNode>) -> Self {
    Self {
      nodes,
      version: SNAPSHOT_VERSION.to_string(),
      last_updated: Utc::now(),
    }
  }
}
