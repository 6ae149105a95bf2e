//! Story graph types.
//!
//! Nodes live in an arena-style ordered sequence keyed by integer id and
//! reference each other by id only, so cycles are ordinary data rather than
//! an ownership problem.

use std::collections::HashMap;

mod choice;
mod dangling_choice;
mod direction;
mod edge;
mod position;
mod snapshot;
mod spacing;
mod story_node;
#[cfg(test)]
mod story_node_test;

pub use choice::Choice;
pub use dangling_choice::DanglingChoice;
pub use direction::Direction;
pub use edge::Edge;
pub use position::Position;
pub use snapshot::{SNAPSHOT_VERSION, Snapshot};
pub use spacing::Spacing;
pub use story_node::StoryNode;

/// Sparse map from a node id (string form) to its last explicit coordinate.
/// Absence means "not yet explicitly placed", not "at origin".
pub type PositionMap = HashMap<String, Position>;
