mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "trd",
    about = "TRD generation backend — ingest source material, search it, and draft technical requirements documents",
    version,
    propagate_version = true
)]
struct Cli {
    /// Workspace root (default: auto-detect from .trd/)
    #[arg(long, global = true, env = "TRD_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a TRD workspace in the current directory
    Init {
        /// Project name recorded in the workspace config
        #[arg(long)]
        name: Option<String>,
    },

    /// Run the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,
    },

    /// Ingest a directory of .txt/.md files into the vector index
    Ingest {
        /// Directory to ingest
        path: PathBuf,

        /// Line of business tag for the ingested documents
        #[arg(long)]
        lob: Option<String>,
    },

    /// Search the vector index
    Search {
        /// Query text
        query: String,

        /// Restrict results to one line of business
        #[arg(long)]
        lob: Option<String>,

        /// Maximum number of hits
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// List the TRD section catalog
    Sections,

    /// Generate a TRD analysis for a project
    Generate {
        /// Project id
        #[arg(long)]
        project: String,

        /// Restrict retrieval to these document ids (repeatable)
        #[arg(long = "document")]
        documents: Vec<String>,

        /// Include these text input ids as notes (repeatable)
        #[arg(long = "text")]
        texts: Vec<String>,

        /// Generate only these section keys (repeatable; omit for all)
        #[arg(long = "section")]
        sections: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root_path = cli.root.as_deref();
    let root = root::resolve_root(root_path);

    let result = match cli.command {
        Commands::Init { name } => cmd::init::run(&root, name.as_deref()),
        Commands::Serve { port } => cmd::serve::run(&root, port),
        Commands::Ingest { path, lob } => cmd::ingest::run(&root, &path, lob.as_deref(), cli.json),
        Commands::Search { query, lob, limit } => {
            cmd::search::run(&root, &query, lob.as_deref(), limit, cli.json)
        }
        Commands::Sections => cmd::sections::run(cli.json),
        Commands::Generate {
            project,
            documents,
            texts,
            sections,
        } => cmd::generate::run(&root, &project, documents, texts, sections, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
