//! A labeled transition from one story node toward another.

use serde::{Deserialize, Serialize};

/// A labeled transition from one story node toward another.
///
/// `next_id` is `None` while the choice is dangling: a normal, long-lived
/// authoring state, not an error. It serializes as JSON `null` under the
/// `nextId` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
  pub text: String,
  #[serde(rename = "nextId")]
  pub next_id: Option<u64>,
}

impl Choice {
  /// Creates a dangling choice with the given label.
  pub fn dangling(text: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      next_id: None,
    }
  }

  /// Creates a choice already linked to `next_id`.
  pub fn linked(text: impl Into<String>, next_id: u64) -> Self {
    Self {
      text: text.into(),
      next_id: Some(next_id),
    }
  }

  /// Returns true if the choice has no target yet.
  pub fn is_dangling(&self) -> bool {
    self.next_id.is_none()
  }
}
