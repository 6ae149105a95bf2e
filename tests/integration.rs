//! End-to-end flows over the public API: import a story, derive edges, lay
//! it out, batch-resolve dangling choices, accept the layout into the
//! position cache, and round-trip the result through export and a snapshot.

use async_trait::async_trait;

use storyweave::error::GenerationError;
use storyweave::kv::MemoryStore;
use storyweave::positions::PositionCache;
use storyweave::resolver::{GeneratedContent, GenerationRequest};
use storyweave::story_io::{check_import_format, export_story, import_story};
use storyweave::types::{Direction, Position, PositionMap, Snapshot, Spacing};
use storyweave::{GraphStore, NodeGenerator, resolve_batch, tree_layout};

const STORY: &str = r#"[
  {"id": 1, "text": "You wake in a clearing.", "choices": [
    {"text": "Follow the path", "nextId": 2},
    {"text": "Climb a tree", "nextId": 3}
  ]},
  {"id": 2, "text": "The path forks at a river.", "choices": [
    {"text": "Ford the river", "nextId": null},
    {"text": "Turn back", "nextId": 1}
  ]},
  {"id": 3, "text": "From above you spot a tower.", "choices": [
    {"text": "Descend and head for it", "nextId": null}
  ]}
]"#;

struct EchoGenerator;

#[async_trait]
impl NodeGenerator for EchoGenerator {
  async fn generate(
    &self,
    request: GenerationRequest<'_>,
  ) -> Result<GeneratedContent, GenerationError> {
    Ok(GeneratedContent {
      text: format!("After \"{}\"", request.choice_texts.join(", ")),
      choices: vec![],
    })
  }
}

fn import_fixture() -> GraphStore {
  let mut store = GraphStore::new(Box::new(MemoryStore::new()));
  import_story(&mut store, STORY).unwrap();
  store
}

#[test]
fn import_derives_edges_and_tolerates_the_cycle() {
  let store = import_fixture();
  let edges = store.edges();
  // Three linked choices, including the 2 -> 1 back edge; the two dangling
  // choices produce no edges.
  assert_eq!(edges.len(), 3);
  assert_eq!(store.dangling_choices().len(), 2);
}

#[test]
fn layout_bands_the_story_and_seeds_the_position_cache() {
  let store = import_fixture();
  let placed = tree_layout(
    store.nodes(),
    &store.edges(),
    Direction::Vertical,
    Spacing::default(),
  );
  assert_eq!(placed[0].position, Position::new(0.0, 0.0));
  assert_eq!(placed[1].position, Position::new(-150.0, 200.0));
  assert_eq!(placed[2].position, Position::new(150.0, 200.0));

  // Accepting the run: the caller, not the engine, persists coordinates.
  let mut cache = PositionCache::new(Box::new(MemoryStore::new()));
  let map: PositionMap = placed
    .iter()
    .map(|p| (p.node.id.to_string(), p.position))
    .collect();
  cache.set_all(map).unwrap();
  assert_eq!(cache.get(2), Some(Position::new(-150.0, 200.0)));
}

#[tokio::test]
async fn batch_resolution_links_every_dangling_choice() {
  let mut store = import_fixture();
  let batch = store.dangling_choices();
  let report = resolve_batch(&mut store, &batch, &EchoGenerator, None).await;

  assert_eq!(report.generated, 2);
  assert!(report.failures.is_empty());
  assert!(store.dangling_choices().is_empty());
  // Ids 4 and 5 were free; batch order follows node order, so node 2's
  // choice got 4 and node 3's got 5.
  assert_eq!(store.get(2).unwrap().choices[0].next_id, Some(4));
  assert_eq!(store.get(3).unwrap().choices[0].next_id, Some(5));
  assert_eq!(store.get(4).unwrap().text, "After \"Ford the river\"");

  // The new nodes take the next layer of the layout.
  let placed = tree_layout(
    store.nodes(),
    &store.edges(),
    Direction::Vertical,
    Spacing::default(),
  );
  let by_id = |id: u64| placed.iter().find(|p| p.node.id == id).unwrap();
  assert_eq!(by_id(4).position.y, 400.0);
  assert_eq!(by_id(5).position.y, 400.0);
}

#[tokio::test]
async fn export_and_snapshot_round_trip_after_resolution() {
  let mut store = import_fixture();
  let batch = store.dangling_choices();
  resolve_batch(&mut store, &batch, &EchoGenerator, None).await;

  let exported = export_story(store.nodes());
  let reimported = check_import_format(&exported).unwrap();
  assert_eq!(reimported, store.nodes());

  let snapshot = Snapshot::new(store.nodes().to_vec());
  let wire = serde_json::to_string(&snapshot).unwrap();
  let back: Snapshot = serde_json::from_str(&wire).unwrap();
  assert_eq!(back.nodes, store.nodes());
  assert_eq!(back.version, snapshot.version);

  // Loading a snapshot fully replaces local state, no merge.
  let mut fresh = GraphStore::new(Box::new(MemoryStore::new()));
  fresh.replace_all(back.nodes).unwrap();
  assert_eq!(fresh.nodes(), store.nodes());
}
