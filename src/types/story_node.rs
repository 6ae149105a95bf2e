//! A single story beat: display text, optional image, outgoing choices.

use serde::{Deserialize, Deserializer, Serialize};

use super::{Choice, Direction};

/// A single story beat: display text, optional image, outgoing choices.
///
/// `id` is the primary key and must be a positive integer unique across the
/// graph. `layout` is the axis orientation the node was last rendered in, a
/// rendering hint only, never story semantics. Imported JSON may carry
/// auxiliary derived fields (e.g. a cached neighbor list); they are ignored
/// here and re-derived from the choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryNode {
  pub id: u64,
  pub text: String,
  pub choices: Vec<Choice>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image: Option<String>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none",
    deserialize_with = "lenient_direction"
  )]
  pub layout: Option<Direction>,
}

/// The orientation tag is a re-derivable rendering hint: an unrecognized
/// value reads as "never laid out" instead of failing the whole import.
fn lenient_direction<'de, D>(deserializer: D) -> Result<Option<Direction>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = serde_json::Value::deserialize(deserializer)?;
  Ok(serde_json::from_value(value).ok())
}

impl StoryNode {
  pub fn new(id: u64, text: impl Into<String>, choices: Vec<Choice>) -> Self {
    Self {
      id,
      text: text.into(),
      choices,
      image: None,
      layout: None,
    }
  }

  /// Placeholder node offered to the author when adding a fresh beat:
  /// default text and two unset choices.
  pub fn placeholder(id: u64) -> Self {
    Self::new(
      id,
      "New node",
      vec![Choice::dangling("Option 1"), Choice::dangling("Option 2")],
    )
  }

  /// Ids of all linked choice targets, in choice order.
  pub fn connected_nodes(&self) -> Vec<u64> {
    self.choices.iter().filter_map(|c| c.next_id).collect()
  }
}
