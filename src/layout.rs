//! Deterministic tree layout from graph topology.
//!
//! Pure function over a snapshot of nodes and derived edges: assigns every
//! node a level (shortest hop-distance from a root candidate) and centers
//! each level's nodes around the layout's primary axis. Cycles, multiple
//! roots, and disconnected components are all ordinary inputs.

use std::collections::{HashMap, VecDeque};

use tracing::instrument;

use crate::types::{Direction, Edge, Position, Spacing, StoryNode};

/// Conventional root id: processed first at level 0 whenever present.
const ROOT_ID: u64 = 1;

/// A node paired with its assigned coordinate. The node's `layout` tag is
/// set to the direction it was laid out in; identity and content are
/// otherwise untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
  pub node: StoryNode,
  pub position: Position,
}

/// Lays out every input node, deterministically and in finite time.
///
/// Root candidates are the node with id 1 if present, otherwise every node
/// with in-degree 0, otherwise the first input node. Levels are computed by
/// bounded relaxation: a node's level is only ever lowered, and the worklist
/// is capped, so cyclic graphs terminate. Nodes the relaxation never reaches
/// keep level 0; no input node is dropped from the output.
#[instrument(level = "trace", skip(nodes, edges), fields(nodes = nodes.len(), edges = edges.len()))]
pub fn tree_layout(
  nodes: &[StoryNode],
  edges: &[Edge],
  direction: Direction,
  spacing: Spacing,
) -> Vec<PlacedNode> {
  if nodes.is_empty() {
    return Vec::new();
  }

  let mut adjacency: HashMap<u64, Vec<u64>> = HashMap::new();
  let mut in_degree: HashMap<u64, usize> = HashMap::new();
  for node in nodes {
    adjacency.insert(node.id, Vec::new());
    in_degree.insert(node.id, 0);
  }
  for edge in edges {
    if let Some(neighbors) = adjacency.get_mut(&edge.source) {
      neighbors.push(edge.target);
    }
    if let Some(count) = in_degree.get_mut(&edge.target) {
      *count += 1;
    }
  }

  let roots = root_candidates(nodes, &in_degree);
  let levels = assign_levels(nodes, &adjacency, &roots);

  // Group by level in input order: the within-level index follows the order
  // nodes appear in the input, not their ids.
  let mut per_level: HashMap<usize, usize> = HashMap::new();
  for node in nodes {
    *per_level.entry(level_of(&levels, node.id)).or_insert(0) += 1;
  }

  let mut placed_in_level: HashMap<usize, usize> = HashMap::new();
  nodes
    .iter()
    .map(|node| {
      let level = level_of(&levels, node.id);
      let index = placed_in_level.entry(level).or_insert(0);
      let k = *index;
      *index += 1;
      let total = per_level[&level];

      let along = match direction {
        Direction::Vertical => spacing.horizontal,
        Direction::Horizontal => spacing.vertical,
      };
      let offset = (k as f64 - (total as f64 - 1.0) / 2.0) * along;
      let position = match direction {
        Direction::Vertical => Position::new(offset, level as f64 * spacing.vertical),
        Direction::Horizontal => Position::new(level as f64 * spacing.horizontal, offset),
      };

      let mut node = node.clone();
      node.layout = Some(direction);
      PlacedNode { node, position }
    })
    .collect()
}

fn level_of(levels: &HashMap<u64, usize>, id: u64) -> usize {
  levels.get(&id).copied().unwrap_or(0)
}

/// Root candidates in processing order: id 1 first whenever present,
/// otherwise every zero-in-degree node in input order, otherwise the first
/// input node (fully cyclic graph).
fn root_candidates(nodes: &[StoryNode], in_degree: &HashMap<u64, usize>) -> Vec<u64> {
  if nodes.iter().any(|n| n.id == ROOT_ID) {
    return vec![ROOT_ID];
  }
  let zero_in: Vec<u64> = nodes
    .iter()
    .filter(|n| in_degree.get(&n.id).copied().unwrap_or(0) == 0)
    .map(|n| n.id)
    .collect();
  if !zero_in.is_empty() {
    return zero_in;
  }
  vec![nodes[0].id]
}

/// Shortest hop-distance from any root, by improve-only worklist relaxation.
///
/// A node re-enters the worklist only when its level strictly drops, so the
/// loop terminates on any finite graph, cycles and self-loops included; the
/// step cap bounds total relaxation work regardless.
fn assign_levels(
  nodes: &[StoryNode],
  adjacency: &HashMap<u64, Vec<u64>>,
  roots: &[u64],
) -> HashMap<u64, usize> {
  let mut levels: HashMap<u64, usize> = HashMap::new();
  let mut queue: VecDeque<u64> = VecDeque::new();
  for &root in roots {
    levels.insert(root, 0);
    queue.push_back(root);
  }

  let max_steps = nodes.len().saturating_mul(nodes.len()).saturating_add(nodes.len());
  let mut steps = 0;
  while let Some(id) = queue.pop_front() {
    steps += 1;
    if steps > max_steps {
      break;
    }
    let next_level = level_of(&levels, id) + 1;
    let Some(neighbors) = adjacency.get(&id) else {
      continue;
    };
    for &neighbor in neighbors {
      let improved = levels
        .get(&neighbor)
        .is_none_or(|&current| next_level < current);
      if improved {
        levels.insert(neighbor, next_level);
        queue.push_back(neighbor);
      }
    }
  }
  levels
}
