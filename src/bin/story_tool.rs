//! CLI: inspect and lay out a story graph JSON file.
//!
//! Usage: `story_tool <COMMAND> <path-to-story-json>`
//!
//! `validate` runs the import schema check and prints every issue.
//! `layout` computes the deterministic tree layout and prints one
//! `id<TAB>x<TAB>y` line per node. `dangling` lists unresolved choices.
//! `scaffold` commits a placeholder node for every dangling choice and
//! rewrites the file.
//!
//! Set RUST_LOG=storyweave=trace for TRACE-level span enter/exit and events.

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process;
use storyweave::error::GenerationError;
use storyweave::kv::MemoryStore;
use storyweave::resolver::{GeneratedContent, GenerationRequest};
use storyweave::story_io::{check_import_format, export_story};
use storyweave::types::{Direction, Spacing};
use storyweave::{GraphStore, NodeGenerator, StoryNode, resolve_batch, tree_layout};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

/// Inspect and lay out a story graph JSON file.
#[derive(Parser, Debug)]
#[command(name = "story_tool")]
struct Args {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Check a story file against the import schema.
  Validate {
    /// Path to the story JSON file
    #[arg(value_name = "path-to-story-json")]
    story_path: PathBuf,
  },
  /// Compute the automatic tree layout and print node coordinates.
  Layout {
    /// Path to the story JSON file
    #[arg(value_name = "path-to-story-json")]
    story_path: PathBuf,

    /// Lay levels out along the horizontal axis instead of the vertical.
    #[arg(long)]
    horizontal: bool,

    /// Spacing between siblings within a level.
    #[arg(long, default_value_t = 300.0)]
    spacing_horizontal: f64,

    /// Spacing between adjacent levels.
    #[arg(long, default_value_t = 200.0)]
    spacing_vertical: f64,
  },
  /// List choices that have no target yet.
  Dangling {
    /// Path to the story JSON file
    #[arg(value_name = "path-to-story-json")]
    story_path: PathBuf,
  },
  /// Create a placeholder node for every dangling choice and rewrite the
  /// file.
  Scaffold {
    /// Path to the story JSON file
    #[arg(value_name = "path-to-story-json")]
    story_path: PathBuf,
  },
}

/// Generator used by `scaffold`: every request yields an empty placeholder
/// beat for the author to fill in.
struct PlaceholderGenerator;

#[async_trait]
impl NodeGenerator for PlaceholderGenerator {
  async fn generate(
    &self,
    _request: GenerationRequest<'_>,
  ) -> Result<GeneratedContent, GenerationError> {
    Ok(GeneratedContent {
      text: "New node".to_string(),
      choices: vec![],
    })
  }
}

fn read_story(path: &PathBuf) -> Vec<StoryNode> {
  let json = match fs::read_to_string(path) {
    Ok(s) => s,
    Err(e) => {
      eprintln!("Error reading {}: {}", path.display(), e);
      process::exit(1);
    }
  };
  match check_import_format(&json) {
    Ok(nodes) => nodes,
    Err(issues) => {
      eprintln!("Story file is invalid:");
      for issue in issues {
        eprintln!("  - {issue}");
      }
      process::exit(1);
    }
  }
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
    .init();

  let args = Args::parse();

  match args.command {
    Command::Validate { story_path } => {
      let nodes = read_story(&story_path);
      info!(nodes = nodes.len(), "story file valid");
      println!("OK: {} nodes", nodes.len());
    }
    Command::Layout {
      story_path,
      horizontal,
      spacing_horizontal,
      spacing_vertical,
    } => {
      let nodes = read_story(&story_path);
      let edges: Vec<_> = nodes
        .iter()
        .flat_map(|n| {
          n.choices
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.next_id.map(|t| storyweave::Edge::new(n.id, t, i)))
        })
        .collect();
      let direction = if horizontal {
        Direction::Horizontal
      } else {
        Direction::Vertical
      };
      let spacing = Spacing::new(spacing_horizontal, spacing_vertical);
      for placed in tree_layout(&nodes, &edges, direction, spacing) {
        println!("{}\t{}\t{}", placed.node.id, placed.position.x, placed.position.y);
      }
    }
    Command::Dangling { story_path } => {
      let nodes = read_story(&story_path);
      let mut count = 0;
      for node in &nodes {
        for (i, choice) in node.choices.iter().enumerate() {
          if choice.is_dangling() {
            count += 1;
            println!("node {} choice {}: {}", node.id, i + 1, choice.text);
          }
        }
      }
      if count == 0 {
        println!("No dangling choices.");
      }
    }
    Command::Scaffold { story_path } => {
      let nodes = read_story(&story_path);
      let mut store = GraphStore::new(Box::new(MemoryStore::new()));
      if let Err(e) = store.replace_all(nodes) {
        eprintln!("Error loading story: {e}");
        process::exit(1);
      }
      let batch = store.dangling_choices();
      let report = resolve_batch(&mut store, &batch, &PlaceholderGenerator, None).await;
      if let Err(e) = fs::write(&story_path, export_story(store.nodes())) {
        eprintln!("Error writing {}: {}", story_path.display(), e);
        process::exit(1);
      }
      println!("Scaffolded {} nodes.", report.generated);
      for failure in &report.failures {
        eprintln!(
          "  failed: node {} choice {}: {}",
          failure.node_id,
          failure.choice_index + 1,
          failure.message
        );
      }
    }
  }
}
