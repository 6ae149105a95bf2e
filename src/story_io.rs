//! Story import/export (JSON).
//!
//! Import is a two-stage pass: a schema check over the raw JSON that
//! collects every violation before any mutation, then an atomic
//! [GraphStore::replace_all]. Export round-trips `id`, `text`,
//! `choices[].text`, `choices[].nextId`, and `image` losslessly.

use serde_json::Value;
use tracing::instrument;

use crate::error::StoreError;
use crate::store::GraphStore;
use crate::types::StoryNode;

/// Checks an import payload against the story schema and converts it.
///
/// Rules: the top-level value is an array; each element has an integer `id`,
/// string `text`, and array `choices`; each choice has a string `text` and
/// an integer-or-null `nextId`; `image`, when present, is a string.
/// Auxiliary derived fields (a cached neighbor list, an orientation tag) are
/// read if present but never required; they are outputs of other
/// components, not input contracts.
///
/// Returns the parsed nodes, or the full list of issues addressed by
/// 1-based node/choice index.
#[instrument(level = "trace", skip(json))]
pub fn check_import_format(json: &str) -> Result<Vec<StoryNode>, Vec<String>> {
  let value: Value = match serde_json::from_str(json) {
    Ok(v) => v,
    Err(e) => return Err(vec![format!("invalid JSON: {e}")]),
  };

  let Some(entries) = value.as_array() else {
    return Err(vec!["top-level value should be an array".to_string()]);
  };

  let mut issues = Vec::new();
  for (i, node) in entries.iter().enumerate() {
    let n = i + 1;
    if !node.get("id").is_some_and(Value::is_u64) {
      issues.push(format!("node {n}: `id` should be a positive integer"));
    }
    if !node.get("text").is_some_and(Value::is_string) {
      issues.push(format!("node {n}: `text` should be a string"));
    }
    match node.get("choices").and_then(Value::as_array) {
      None => issues.push(format!("node {n}: `choices` should be an array")),
      Some(choices) => {
        for (j, choice) in choices.iter().enumerate() {
          let m = j + 1;
          if !choice.get("text").is_some_and(Value::is_string) {
            issues.push(format!("node {n}, choice {m}: `text` should be a string"));
          }
          let next_id_ok = match choice.get("nextId") {
            Some(Value::Null) => true,
            Some(v) => v.is_u64(),
            None => false,
          };
          if !next_id_ok {
            issues.push(format!(
              "node {n}, choice {m}: `nextId` should be an integer or null"
            ));
          }
        }
      }
    }
    if let Some(image) = node.get("image") {
      if !image.is_null() && !image.is_string() {
        issues.push(format!("node {n}: `image` should be a string when present"));
      }
    }
  }
  if !issues.is_empty() {
    return Err(issues);
  }

  serde_json::from_value(value).map_err(|e| vec![format!("invalid node data: {e}")])
}

/// Imports a JSON payload into the store, replacing its whole content.
/// All-or-nothing: any schema or id issue leaves the store unchanged and is
/// reported as [StoreError::Invalid] with every message at once. Returns the
/// number of nodes imported.
pub fn import_story(store: &mut GraphStore, json: &str) -> Result<usize, StoreError> {
  let nodes = check_import_format(json).map_err(StoreError::Invalid)?;
  let count = nodes.len();
  store.replace_all(nodes)?;
  Ok(count)
}

/// Exports a node set as pretty-printed JSON.
pub fn export_story(nodes: &[StoryNode]) -> String {
  serde_json::to_string_pretty(nodes).unwrap_or_else(|_| "[]".to_string())
}
