//! A choice awaiting a generated target, addressed by owner id and index.

/// A choice awaiting a generated target.
///
/// Identified by the owning node's id and the choice's index within that
/// node's choice list. The batch resolver correlates generated nodes back to
/// choices by position in the batch, never by searching the graph afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DanglingChoice {
  pub node_id: u64,
  pub choice_index: usize,
  pub text: String,
}
