//! Layout axis orientation.

use serde::{Deserialize, Serialize};

/// Layout axis orientation: which axis levels advance along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  Vertical,
  Horizontal,
}
