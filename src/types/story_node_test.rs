//! Tests for `StoryNode`.

use super::{Choice, Direction, StoryNode};

#[test]
fn placeholder_has_two_dangling_choices() {
  let n = StoryNode::placeholder(4);
  assert_eq!(n.id, 4);
  assert_eq!(n.text, "New node");
  assert_eq!(n.choices.len(), 2);
  assert!(n.choices.iter().all(Choice::is_dangling));
}

#[test]
fn connected_nodes_skips_dangling_choices() {
  let n = StoryNode::new(
    1,
    "Crossroads",
    vec![
      Choice::linked("Left", 2),
      Choice::dangling("Right"),
      Choice::linked("Back", 1),
    ],
  );
  assert_eq!(n.connected_nodes(), vec![2, 1]);
}

#[test]
fn omits_absent_image_and_layout_when_serialized() {
  let json = serde_json::to_value(StoryNode::new(1, "Start", vec![])).unwrap();
  assert!(json.get("image").is_none());
  assert!(json.get("layout").is_none());
}

#[test]
fn tolerates_auxiliary_fields_on_deserialize() {
  let json = r#"{
    "id": 2,
    "text": "Cave",
    "choices": [{"text": "Enter", "nextId": null}],
    "connectedNodes": [3, 4],
    "layout": "vertical",
    "image": "https://example.com/cave.png"
  }"#;
  let n: StoryNode = serde_json::from_str(json).unwrap();
  assert_eq!(n.id, 2);
  assert_eq!(n.layout, Some(Direction::Vertical));
  assert_eq!(n.image.as_deref(), Some("https://example.com/cave.png"));
}

#[test]
fn unrecognized_layout_tag_reads_as_unset() {
  let json = r#"{"id": 1, "text": "A", "choices": [], "layout": "diagonal"}"#;
  let n: StoryNode = serde_json::from_str(json).unwrap();
  assert_eq!(n.layout, None);
}
