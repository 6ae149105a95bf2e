//! Tests for story import/export.

use crate::error::StoreError;
use crate::kv::MemoryStore;
use crate::store::GraphStore;
use crate::story_io::{check_import_format, export_story, import_story};
use crate::types::{Choice, StoryNode};

fn store() -> GraphStore {
  GraphStore::new(Box::new(MemoryStore::new()))
}

const VALID: &str = r#"[
  {"id": 1, "text": "Start", "choices": [
    {"text": "North", "nextId": 2},
    {"text": "Wait", "nextId": null}
  ]},
  {"id": 2, "text": "Forest", "choices": [], "image": "https://example.com/f.png"}
]"#;

#[test]
fn accepts_valid_payload() {
  let nodes = check_import_format(VALID).unwrap();
  assert_eq!(nodes.len(), 2);
  assert_eq!(nodes[0].choices[0].next_id, Some(2));
  assert!(nodes[0].choices[1].is_dangling());
  assert_eq!(nodes[1].image.as_deref(), Some("https://example.com/f.png"));
}

#[test]
fn rejects_non_array_top_level() {
  let issues = check_import_format(r#"{"id": 1}"#).unwrap_err();
  assert_eq!(issues, vec!["top-level value should be an array".to_string()]);
}

#[test]
fn rejects_invalid_json_with_parse_issue() {
  let issues = check_import_format("not json").unwrap_err();
  assert_eq!(issues.len(), 1);
  assert!(issues[0].starts_with("invalid JSON:"));
}

#[test]
fn reports_choices_of_wrong_type_by_node_index() {
  let payload = r#"[
    {"id": 1, "text": "Ok", "choices": []},
    {"id": 2, "text": "Broken", "choices": "oops"}
  ]"#;
  let issues = check_import_format(payload).unwrap_err();
  assert_eq!(issues, vec!["node 2: `choices` should be an array".to_string()]);
}

#[test]
fn collects_every_issue_with_indices() {
  let payload = r#"[
    {"id": "one", "text": 5, "choices": [
      {"text": 1, "nextId": "two"}
    ]}
  ]"#;
  let issues = check_import_format(payload).unwrap_err();
  assert_eq!(
    issues,
    vec![
      "node 1: `id` should be a positive integer".to_string(),
      "node 1: `text` should be a string".to_string(),
      "node 1, choice 1: `text` should be a string".to_string(),
      "node 1, choice 1: `nextId` should be an integer or null".to_string(),
    ]
  );
}

#[test]
fn auxiliary_fields_are_never_required_or_rejected() {
  // connectedNodes and layout are derived outputs; imports without them and
  // with odd values in them both pass the schema check.
  let payload = r#"[
    {"id": 1, "text": "A", "choices": [], "connectedNodes": [2, 3], "layout": "vertical"},
    {"id": 2, "text": "B", "choices": []}
  ]"#;
  assert!(check_import_format(payload).is_ok());
}

#[test]
fn rejects_choice_without_next_id_key() {
  // An unset target is spelled as an explicit null, not an absent key.
  let payload = r#"[{"id": 1, "text": "A", "choices": [{"text": "Go"}]}]"#;
  let issues = check_import_format(payload).unwrap_err();
  assert_eq!(
    issues,
    vec!["node 1, choice 1: `nextId` should be an integer or null".to_string()]
  );
}

#[test]
fn rejects_non_string_image() {
  let payload = r#"[{"id": 1, "text": "A", "choices": [], "image": 7}]"#;
  let issues = check_import_format(payload).unwrap_err();
  assert_eq!(issues, vec!["node 1: `image` should be a string when present".to_string()]);
}

#[test]
fn import_is_atomic_on_schema_failure() {
  let mut s = store();
  s.add(StoryNode::new(9, "Kept", vec![])).unwrap();
  let err = import_story(&mut s, r#"[{"id": 1, "text": "X", "choices": "oops"}]"#).unwrap_err();
  let StoreError::Invalid(issues) = err else {
    panic!("expected Invalid");
  };
  assert_eq!(issues, vec!["node 1: `choices` should be an array".to_string()]);
  assert_eq!(s.nodes().len(), 1);
  assert_eq!(s.get(9).unwrap().text, "Kept");
}

#[test]
fn import_replaces_whole_store() {
  let mut s = store();
  s.add(StoryNode::new(9, "Old", vec![])).unwrap();
  let count = import_story(&mut s, VALID).unwrap();
  assert_eq!(count, 2);
  assert!(s.get(9).is_none());
  assert_eq!(s.get(1).unwrap().text, "Start");
}

#[test]
fn export_round_trips_losslessly() {
  let nodes = vec![
    StoryNode::new(
      1,
      "Start",
      vec![Choice::linked("North", 2), Choice::dangling("Wait")],
    ),
    StoryNode {
      image: Some("https://example.com/f.png".to_string()),
      ..StoryNode::new(2, "Forest", vec![Choice::linked("Restart", 1)])
    },
  ];
  let json = export_story(&nodes);
  let back = check_import_format(&json).unwrap();
  assert_eq!(back, nodes);
}

#[test]
fn tolerates_dangling_references_to_missing_nodes() {
  // A nextId pointing at a node that is not in the payload is accepted;
  // referential validation is a separate concern from schema tolerance.
  let payload = r#"[{"id": 1, "text": "A", "choices": [{"text": "Go", "nextId": 99}]}]"#;
  let mut s = store();
  import_story(&mut s, payload).unwrap();
  assert_eq!(s.get(1).unwrap().choices[0].next_id, Some(99));
}
