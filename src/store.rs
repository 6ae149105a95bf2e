//! Authoritative owner of the story node set.
//!
//! Every mutation is validated, applied atomically, and persisted as the
//! full node set through the injected [KeyValueStore]. Layout and generation
//! never hold their own copy; they read snapshots and request mutation here.

use tracing::{info, instrument};

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use crate::types::{DanglingChoice, Edge, StoryNode};

/// Backing-store key the full node set is persisted under.
pub const GAME_DATA_KEY: &str = "gameData";

/// Authoritative ordered sequence of story nodes.
///
/// Deleting a node never cascades: choices elsewhere that pointed at the
/// deleted id simply become dangling, an accepted and inspectable state.
pub struct GraphStore {
  nodes: Vec<StoryNode>,
  kv: Box<dyn KeyValueStore>,
}

impl GraphStore {
  /// Creates an empty store persisting through `kv`.
  pub fn new(kv: Box<dyn KeyValueStore>) -> Self {
    Self {
      nodes: Vec::new(),
      kv,
    }
  }

  /// Populates the store from the backing store, if anything was saved.
  /// Missing data leaves the store empty; corrupt data is an error.
  #[instrument(level = "trace", skip(self))]
  pub fn load(&mut self) -> Result<(), StoreError> {
    let Some(saved) = self
      .kv
      .get(GAME_DATA_KEY)
      .map_err(|e| StoreError::Persist(e.to_string()))?
    else {
      return Ok(());
    };
    self.nodes =
      serde_json::from_str(&saved).map_err(|e| StoreError::Persist(e.to_string()))?;
    info!(nodes = self.nodes.len(), "loaded story data");
    Ok(())
  }

  fn persist(&mut self) -> Result<(), StoreError> {
    let json =
      serde_json::to_string(&self.nodes).map_err(|e| StoreError::Persist(e.to_string()))?;
    self
      .kv
      .set(GAME_DATA_KEY, &json)
      .map_err(|e| StoreError::Persist(e.to_string()))
  }

  /// Current node set, in insertion order.
  pub fn nodes(&self) -> &[StoryNode] {
    &self.nodes
  }

  /// Looks up a node by id.
  pub fn get(&self, id: u64) -> Option<&StoryNode> {
    self.nodes.iter().find(|n| n.id == id)
  }

  /// Appends a node. Fails if the id is not positive or already present.
  #[instrument(level = "trace", skip(self, node), fields(id = node.id))]
  pub fn add(&mut self, node: StoryNode) -> Result<(), StoreError> {
    let mut issues = Vec::new();
    if node.id == 0 {
      issues.push("node id must be a positive integer".to_string());
    }
    if self.get(node.id).is_some() {
      issues.push(format!("node id {} already exists", node.id));
    }
    if !issues.is_empty() {
      return Err(StoreError::Invalid(issues));
    }
    self.nodes.push(node);
    self.persist()
  }

  /// Replaces the node with the matching id.
  #[instrument(level = "trace", skip(self, node), fields(id = node.id))]
  pub fn update(&mut self, node: StoryNode) -> Result<(), StoreError> {
    let Some(slot) = self.nodes.iter_mut().find(|n| n.id == node.id) else {
      return Err(StoreError::NotFound(node.id));
    };
    *slot = node;
    self.persist()
  }

  /// Removes the node with that id; a no-op if absent. Choices elsewhere
  /// that referenced the id are left untouched and become dangling.
  #[instrument(level = "trace", skip(self))]
  pub fn delete(&mut self, id: u64) -> Result<(), StoreError> {
    self.nodes.retain(|n| n.id != id);
    self.persist()
  }

  /// Replaces the entire node set, used by import/load. The candidate set is
  /// validated in full before any of it is committed; on failure the store
  /// is left unchanged and every issue is reported at once.
  #[instrument(level = "trace", skip(self, nodes), fields(count = nodes.len()))]
  pub fn replace_all(&mut self, nodes: Vec<StoryNode>) -> Result<(), StoreError> {
    let issues = validate_node_set(&nodes);
    if !issues.is_empty() {
      return Err(StoreError::Invalid(issues));
    }
    self.nodes = nodes;
    self.persist()
  }

  /// Removes every node.
  pub fn clear(&mut self) -> Result<(), StoreError> {
    self.nodes.clear();
    self.persist()
  }

  /// Derived edge list: one edge per linked choice, in node order then
  /// choice order. Never stored; recomputed on every call.
  pub fn edges(&self) -> Vec<Edge> {
    self
      .nodes
      .iter()
      .flat_map(|node| {
        node.choices.iter().enumerate().filter_map(|(i, choice)| {
          choice.next_id.map(|target| Edge::new(node.id, target, i))
        })
      })
      .collect()
  }

  /// Ids of a node's linked choice targets, in choice order.
  pub fn connected_nodes(&self, id: u64) -> Vec<u64> {
    self
      .get(id)
      .map(StoryNode::connected_nodes)
      .unwrap_or_default()
  }

  /// Every unset choice in the graph, in node order then choice order.
  /// This ordering is the batch-resolution input contract.
  pub fn dangling_choices(&self) -> Vec<DanglingChoice> {
    self
      .nodes
      .iter()
      .flat_map(|node| {
        node
          .choices
          .iter()
          .enumerate()
          .filter(|(_, c)| c.is_dangling())
          .map(|(i, c)| DanglingChoice {
            node_id: node.id,
            choice_index: i,
            text: c.text.clone(),
          })
      })
      .collect()
  }

  /// Smallest positive id not yet taken. Ids may have gaps after deletion;
  /// those gaps are reused.
  pub fn next_free_id(&self) -> u64 {
    let mut id = 1;
    while self.get(id).is_some() {
      id += 1;
    }
    id
  }

  /// Creates and commits a placeholder node at the next free id, returning
  /// the id.
  pub fn new_node(&mut self) -> Result<u64, StoreError> {
    let id = self.next_free_id();
    self.add(StoryNode::placeholder(id))?;
    Ok(id)
  }
}

/// Validates a candidate node set for [GraphStore::replace_all]: positive,
/// mutually unique ids. Issues are addressed by 1-based node index.
pub(crate) fn validate_node_set(nodes: &[StoryNode]) -> Vec<String> {
  let mut issues = Vec::new();
  for (i, node) in nodes.iter().enumerate() {
    if node.id == 0 {
      issues.push(format!("node {}: id must be a positive integer", i + 1));
    }
    if nodes[..i].iter().any(|n| n.id == node.id) {
      issues.push(format!("node {}: duplicate id {}", i + 1, node.id));
    }
  }
  issues
}
