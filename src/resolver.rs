//! Batch resolution: generate nodes for dangling choices and link them.
//!
//! Items are processed strictly one at a time, in batch order: choice
//! *i+1*'s request is only dispatched after choice *i*'s node has been
//! committed. Each generated node is correlated to its choice by position in
//! the batch, never by searching the graph afterwards, so two dangling
//! choices on the same node resolve unambiguously.

use async_trait::async_trait;
use futures::Stream;
use tracing::{error, info, instrument, warn};

use crate::error::{GenerationError, StoreError};
use crate::images::ImageProvider;
use crate::store::GraphStore;
use crate::types::{Choice, DanglingChoice, StoryNode};

/// One content-generation request. The collaborator returns node content;
/// the id is assigned by the resolver, never by the collaborator.
#[derive(Debug, Clone)]
pub struct GenerationRequest<'a> {
  /// Id of the node owning the dangling choice.
  pub node_id: u64,
  /// Display text of the owning node.
  pub node_text: &'a str,
  /// Pending choice texts to continue from.
  pub choice_texts: Vec<&'a str>,
  /// Full current node list, for narrative context.
  pub graph: &'a [StoryNode],
}

/// Node content produced by the generation collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedContent {
  pub text: String,
  pub choices: Vec<Choice>,
}

/// The content-generation collaborator.
#[async_trait]
pub trait NodeGenerator {
  async fn generate(&self, request: GenerationRequest<'_>)
  -> Result<GeneratedContent, GenerationError>;
}

/// A single batch item's failure, recorded without aborting its siblings.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure {
  pub node_id: u64,
  pub choice_index: usize,
  pub message: String,
}

/// Summary of a batch run: count of committed nodes plus per-item failures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
  pub generated: usize,
  pub failures: Vec<BatchFailure>,
}

/// One step of an incremental batch run.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
  /// A node was generated, committed under `new_id`, and linked from
  /// `source`.
  Linked { source: DanglingChoice, new_id: u64 },
  /// This item failed; later items still run.
  Failed(BatchFailure),
}

/// Resolves a batch of dangling choices sequentially, committing one
/// generated node per item and linking it back through the store.
#[instrument(level = "trace", skip_all, fields(items = batch.len()))]
pub async fn resolve_batch(
  store: &mut GraphStore,
  batch: &[DanglingChoice],
  generator: &dyn NodeGenerator,
  images: Option<&dyn ImageProvider>,
) -> BatchReport {
  let mut report = BatchReport::default();
  for item in batch {
    match resolve_one(store, item, generator, images).await {
      Ok(new_id) => {
        info!(node_id = item.node_id, choice = item.choice_index, new_id, "linked choice");
        report.generated += 1;
      }
      Err(failure) => {
        error!(
          node_id = failure.node_id,
          choice = failure.choice_index,
          message = %failure.message,
          "batch item failed"
        );
        report.failures.push(failure);
      }
    }
  }
  report
}

/// Incremental variant of [resolve_batch]: yields one [BatchEvent] per item
/// as it completes, in batch order. The store is borrowed for the stream's
/// lifetime, preserving the commit-before-next-request ordering. Dropping the
/// stream abandons the remaining items; nodes already committed stay
/// committed.
pub fn resolve_batch_stream<'a>(
  store: &'a mut GraphStore,
  batch: Vec<DanglingChoice>,
  generator: &'a dyn NodeGenerator,
  images: Option<&'a dyn ImageProvider>,
) -> impl Stream<Item = BatchEvent> + 'a {
  async_stream::stream! {
    for item in batch {
      match resolve_one(store, &item, generator, images).await {
        Ok(new_id) => yield BatchEvent::Linked { source: item, new_id },
        Err(failure) => yield BatchEvent::Failed(failure),
      }
    }
  }
}

/// Generates, commits, and links one batch item. Returns the new node's id.
async fn resolve_one(
  store: &mut GraphStore,
  item: &DanglingChoice,
  generator: &dyn NodeGenerator,
  images: Option<&dyn ImageProvider>,
) -> Result<u64, BatchFailure> {
  let fail = |message: String| BatchFailure {
    node_id: item.node_id,
    choice_index: item.choice_index,
    message,
  };

  // Re-read the owner every iteration: an earlier item in the batch may
  // have already rewritten this node's choices.
  let owner = store
    .get(item.node_id)
    .ok_or_else(|| fail(format!("owning node {} no longer exists", item.node_id)))?
    .clone();
  if item.choice_index >= owner.choices.len() {
    return Err(fail(format!(
      "choice index {} out of range for node {}",
      item.choice_index, item.node_id
    )));
  }

  let request = GenerationRequest {
    node_id: owner.id,
    node_text: &owner.text,
    choice_texts: vec![item.text.as_str()],
    graph: store.nodes(),
  };
  let content = generator
    .generate(request)
    .await
    .map_err(|GenerationError(message)| fail(message))?;

  let new_id = store.next_free_id();
  let mut node = StoryNode::new(new_id, content.text, content.choices);
  node.image = fetch_image(images).await;

  store.add(node).map_err(|e: StoreError| fail(e.to_string()))?;

  let mut owner = owner;
  owner.choices[item.choice_index].next_id = Some(new_id);
  store.update(owner).map_err(|e| fail(e.to_string()))?;
  Ok(new_id)
}

/// Fetches an illustration for a fresh node. Failure is tolerated: the node
/// is committed without an image.
async fn fetch_image(images: Option<&dyn ImageProvider>) -> Option<String> {
  let provider = images?;
  match provider.fetch_image_url(rand::random()).await {
    Ok(url) => Some(url),
    Err(e) => {
      warn!(error = %e, "image fetch failed; continuing without image");
      None
    }
  }
}
