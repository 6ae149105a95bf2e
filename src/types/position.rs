//! A 2-D coordinate assigned to a node.

use serde::{Deserialize, Serialize};

/// A 2-D coordinate assigned to a node by layout or by an explicit move.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
  pub x: f64,
  pub y: f64,
}

impl Position {
  pub fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}
