//! Configured distance between levels and between siblings within a level.

use serde::{Deserialize, Serialize};

/// Spacing step applied by the editor's "increase spacing" control.
const SPACING_STEP: f64 = 50.0;

/// Configured distance between adjacent levels and between siblings within a
/// level, in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
  pub horizontal: f64,
  pub vertical: f64,
}

impl Spacing {
  pub fn new(horizontal: f64, vertical: f64) -> Self {
    Self {
      horizontal,
      vertical,
    }
  }

  /// Both axes widened by one step.
  pub fn increased(self) -> Self {
    Self {
      horizontal: self.horizontal + SPACING_STEP,
      vertical: self.vertical + SPACING_STEP,
    }
  }
}

impl Default for Spacing {
  fn default() -> Self {
    Self {
      horizontal: 300.0,
      vertical: 200.0,
    }
  }
}
