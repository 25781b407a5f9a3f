use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use flowslice::config::{get_config_path, save_config, FlowSliceConfig};
use flowslice::formatter::{
    format_flow_as_json, format_flow_as_markdown, format_graph_as_json, format_graph_as_mermaid,
};
use flowslice::session::FlowSession;
use flowslice::types::{ElementId, OutputFormat};
use tracing_subscriber::EnvFilter;

/// Architecture flow explorer over static fact snapshots.
#[derive(Parser)]
#[command(name = "flowslice", about = "Architecture flow explorer over fact snapshots")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration
    Init {
        /// Project path (default: current directory)
        path: Option<String>,
    },
    /// List flow root elements
    Roots {
        /// Fact snapshot (JSON)
        facts: String,
        /// Element kind to list (default: configured root kinds)
        #[arg(short, long)]
        kind: Option<String>,
        /// Project path holding the configuration
        #[arg(short, long)]
        path: Option<String>,
    },
    /// Compute the flow from a root element
    Flow {
        /// Fact snapshot (JSON)
        facts: String,
        /// Root element id
        #[arg(short, long)]
        root: String,
        /// Maximum depth (default: configured)
        #[arg(short, long)]
        depth: Option<usize>,
        /// Output format (markdown, json, graph or mermaid)
        #[arg(short, long, default_value = "markdown")]
        format: String,
        /// Project path holding the configuration
        #[arg(short, long)]
        path: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> flowslice::errors::Result<()> {
    match cli.command {
        Commands::Init { path } => {
            let project_path = resolve_path(path);
            save_config(&project_path, &FlowSliceConfig::default())?;
            println!(
                "Wrote default configuration to {}",
                get_config_path(&project_path).display()
            );
        }
        Commands::Roots { facts, kind, path } => {
            let project_path = resolve_path(path);
            let session = FlowSession::open(&PathBuf::from(facts), &project_path).await?;
            let roots = session.roots(kind.as_deref()).await;
            if roots.is_empty() {
                println!("No root elements found");
            } else {
                for root in &roots {
                    println!("{} ({})", root.id, root.element_type);
                }
            }
        }
        Commands::Flow {
            facts,
            root,
            depth,
            format,
            path,
        } => {
            let project_path = resolve_path(path);
            let output_format = OutputFormat::from_str(&format).unwrap_or(OutputFormat::Markdown);
            let session = FlowSession::open(&PathBuf::from(facts), &project_path).await?;
            let flow = session.compute_flow(&ElementId::new(root), depth).await?;
            match output_format {
                OutputFormat::Markdown => println!("{}", format_flow_as_markdown(&flow)),
                OutputFormat::Json => println!("{}", format_flow_as_json(&flow)),
                OutputFormat::Graph => {
                    let graph = session.project(std::slice::from_ref(&flow)).await;
                    println!("{}", format_graph_as_json(&graph));
                }
                OutputFormat::Mermaid => {
                    let graph = session.project(std::slice::from_ref(&flow)).await;
                    println!("{}", format_graph_as_mermaid(&graph));
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
