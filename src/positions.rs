//! Sparse persistent cache of explicit node coordinates.
//!
//! Written when a node is manually repositioned or when a layout run is
//! accepted; read to seed placement before any layout has run. The graph
//! store never touches it, and the layout engine never writes it.

use tracing::instrument;

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use crate::types::{Position, PositionMap, Spacing};

/// Backing-store key the position map is persisted under.
pub const NODE_POSITIONS_KEY: &str = "nodePositions";

/// Nodes per row of the default grid used before any explicit placement.
const GRID_ROW_LEN: u64 = 5;

/// Sparse map from node id to its last explicit coordinate, persisted
/// through the injected [KeyValueStore]. Absence of an entry means the node
/// was never explicitly placed.
pub struct PositionCache {
  positions: PositionMap,
  kv: Box<dyn KeyValueStore>,
}

impl PositionCache {
  pub fn new(kv: Box<dyn KeyValueStore>) -> Self {
    Self {
      positions: PositionMap::new(),
      kv,
    }
  }

  /// Populates the cache from the backing store, if anything was saved.
  #[instrument(level = "trace", skip(self))]
  pub fn load(&mut self) -> Result<(), StoreError> {
    let Some(saved) = self
      .kv
      .get(NODE_POSITIONS_KEY)
      .map_err(|e| StoreError::Persist(e.to_string()))?
    else {
      return Ok(());
    };
    self.positions =
      serde_json::from_str(&saved).map_err(|e| StoreError::Persist(e.to_string()))?;
    Ok(())
  }

  fn persist(&mut self) -> Result<(), StoreError> {
    let json = serde_json::to_string(&self.positions)
      .map_err(|e| StoreError::Persist(e.to_string()))?;
    self
      .kv
      .set(NODE_POSITIONS_KEY, &json)
      .map_err(|e| StoreError::Persist(e.to_string()))
  }

  /// Last explicit coordinate for a node, if any.
  pub fn get(&self, id: u64) -> Option<Position> {
    self.positions.get(&id.to_string()).copied()
  }

  /// Records one node's explicit coordinate (e.g. after a manual move).
  pub fn set(&mut self, id: u64, position: Position) -> Result<(), StoreError> {
    self.positions.insert(id.to_string(), position);
    self.persist()
  }

  /// Replaces the whole map (e.g. accepting a layout run's output).
  pub fn set_all(&mut self, positions: PositionMap) -> Result<(), StoreError> {
    self.positions = positions;
    self.persist()
  }

  /// Coordinate to use for a node: its cached position if present,
  /// otherwise its slot in the default grid.
  pub fn get_or_fallback(&self, id: u64, spacing: Spacing) -> Position {
    self.get(id).unwrap_or_else(|| fallback_position(id, spacing))
  }
}

/// Default grid placement used before any layout run: nodes flow left to
/// right, five per row, stepped by the configured spacing.
pub fn fallback_position(id: u64, spacing: Spacing) -> Position {
  let ordinal = id.saturating_sub(1);
  let row = ordinal / GRID_ROW_LEN;
  let col = ordinal % GRID_ROW_LEN;
  Position::new(col as f64 * spacing.horizontal, row as f64 * spacing.vertical)
}
