use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use refgraph::config::{get_config_path, load_config, save_config, SearchConfig};
use refgraph::replay::ReplayHost;
use refgraph::types::SearchState;
use refgraph::ReferenceSearcher;

/// Links symbol usages into a code graph by searching for references.
#[derive(Parser)]
#[command(name = "refgraph", about = "Link symbol usages into a code graph")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default search configuration
    Init {
        /// Project path (default: current directory)
        path: Option<String>,
    },
    /// Run a reference search against a recorded host session
    Replay {
        /// Fixture file (JSON)
        fixture: PathBuf,
        /// Project path holding the configuration
        #[arg(short, long)]
        path: Option<String>,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> refgraph::Result<()> {
    match cli.command {
        Commands::Init { path } => {
            let project_path = resolve_path(path);
            save_config(&project_path, &SearchConfig::default())?;
            println!("Wrote {}", get_config_path(&project_path).display());
        }
        Commands::Replay {
            fixture,
            path,
            json,
        } => {
            let project_path = resolve_path(path);
            let config = load_config(&project_path)?;
            let replay = ReplayHost::load(&fixture)?;
            let source = replay.source();
            let searcher = ReferenceSearcher::new(replay.host(), config);

            if !searcher.begin_search(source.clone()) {
                println!("No references found for '{}'", source.long_name);
                return Ok(());
            }

            let mut narration = None;
            while narration.is_none() && searcher.state() == SearchState::Idle {
                if searcher.slice_count() > searcher.config().max_slices {
                    break;
                }
                narration = searcher.advance();
            }

            let edges = replay.graph().edges();
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&edges).unwrap_or_default()
                );
            } else {
                println!(
                    "Usages of {} ({} slices)",
                    source.long_name,
                    searcher.slice_count()
                );
                for edge in &edges {
                    println!("  {} -> {}", edge.source, edge.target);
                }
                if let Some(narration) = narration {
                    println!("{}", narration);
                }
            }
        }
    }
    Ok(())
}

/// Resolves an optional path argument to a `PathBuf`.
///
/// Defaults to the current working directory if no path is provided.
fn resolve_path(path: Option<String>) -> PathBuf {
    match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
