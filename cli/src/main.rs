//! cardpath CLI
//!
//! # Commands
//! - `cardpath new <file> --name <name>` - Write an empty story
//! - `cardpath check <file>` - Validate a flow, exit non-zero on errors
//! - `cardpath layout <file>` - Print auto-layout positions as JSON
//! - `cardpath graph <file> [--format json|dot]` - Print the graph projection
//! - `cardpath list <file> [--selected <id>]` - Print the list projection
//! - `cardpath play <file>` - Play a flow on the terminal
//! - `cardpath schema` - Print the JSON schema of the flow format

mod check;
mod document;
mod new;
mod play;

use anyhow::{Context, Result};
use cardpath_core::{CardpathConfig, NodeId, Position, flow_json_schema, layout_with};
use cardpath_inspector::{project_graph, project_list, to_dot};
use clap::{Parser, Subcommand, ValueEnum};
use document::{print_json, read_flow_file};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// cardpath CLI
#[derive(Parser)]
#[command(name = "cardpath")]
#[command(author, version, about = "Author, check and play branching card flows")]
struct Cli {
    /// Config file (default: $CARDPATH_CONFIG, then ./cardpath.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an empty story
    New {
        /// Output file
        file: PathBuf,

        /// Story name
        #[arg(short, long)]
        name: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a flow
    Check {
        file: PathBuf,

        /// Do not require a start node
        #[arg(long)]
        allow_no_start: bool,

        /// Print the validation result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print auto-layout positions
    Layout { file: PathBuf },

    /// Print the graph projection
    Graph {
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = GraphFormat::Json)]
        format: GraphFormat,
    },

    /// Print the list projection
    List {
        file: PathBuf,

        /// Node to tag relations against
        #[arg(short, long)]
        selected: Option<String>,
    },

    /// Play a flow interactively
    Play { file: PathBuf },

    /// Print the JSON schema of the flow format
    Schema,
}

#[derive(Clone, Copy, ValueEnum)]
enum GraphFormat {
    Json,
    Dot,
}

#[derive(Serialize)]
struct LayoutEntry<'a> {
    id: &'a NodeId,
    #[serde(flatten)]
    position: &'a Position,
}

fn main() -> Result<ExitCode> {
    // Logs go to stderr so stdout stays machine-readable.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cardpath_core=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => CardpathConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => CardpathConfig::discover(),
    };

    match cli.command {
        Commands::New { file, name, force } => {
            let story = new::run_new_command(&file, &name, force)?;
            println!("Created story '{}' ({}) at {}", story.name, story.id, file.display());
        }
        Commands::Check {
            file,
            allow_no_start,
            json,
        } => {
            let flow = read_flow_file(&file)?.into_flow();
            let result = check::check_flow(&flow, allow_no_start);
            if json {
                print_json(&result)?;
            } else {
                print!("{}", check::render_report(&result));
            }
            if !result.valid {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Layout { file } => {
            let flow = read_flow_file(&file)?.into_flow();
            let layout = layout_with(&flow, &config.layout);
            let entries: Vec<LayoutEntry<'_>> = layout
                .iter()
                .map(|(id, position)| LayoutEntry { id, position })
                .collect();
            print_json(&entries)?;
        }
        Commands::Graph { file, format } => {
            let flow = read_flow_file(&file)?.into_flow();
            let projection = project_graph(&flow, &config.layout);
            match format {
                GraphFormat::Json => print_json(&projection)?,
                GraphFormat::Dot => print!("{}", to_dot(&projection)),
            }
        }
        Commands::List { file, selected } => {
            let flow = read_flow_file(&file)?.into_flow();
            print_json(&project_list(&flow, selected.as_deref()))?;
        }
        Commands::Play { file } => {
            let document = read_flow_file(&file)?;
            if let Some(name) = document.name() {
                println!("== {name} ==");
            }
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            let outcome = play::play_session(document.flow(), stdin.lock(), &mut stdout)?;
            tracing::debug!(events = outcome.timeline.len(), "Session closed");
            if outcome.status.is_broken() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Schema => print_json(&flow_json_schema())?,
    }

    Ok(ExitCode::SUCCESS)
}
