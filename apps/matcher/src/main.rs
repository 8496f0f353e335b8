mod cli;
mod config;
mod errors;
mod matching;
mod models;
mod records;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Interactive;
use crate::config::Config;
use crate::matching::engine::MatchingEngine;
use crate::records::store::{CsvRecordStore, MemoryRecordStore, RecordStore};
use crate::routes::build_router;
use crate::state::AppState;

/// File the interactive graph option writes into the data directory.
const DOT_FILE: &str = "match_graph.dot";

#[derive(Debug, Parser)]
#[command(name = "matcher", version, about = "Match resumes against job postings")]
struct Args {
    /// Directory holding companies.csv and workers.csv
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Number of ranked postings shown for a resume
    #[arg(long, global = true)]
    top_k: Option<usize>,

    /// Minimum similarity (exclusive) for a graph edge
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Keep records in memory only; nothing is read from or written to disk
    #[arg(long, global = true)]
    in_memory: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Prompt loop on stdin/stdout (default)
    Interactive,
    /// HTTP JSON API
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::from_env()?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(k) = args.top_k {
        config.top_k = k;
    }
    if let Some(threshold) = args.threshold {
        config
            .set_edge_threshold(threshold)
            .context("--threshold is out of range")?;
    }

    let command = args.command.unwrap_or(Command::Interactive);
    init_tracing(&config, matches!(command, Command::Interactive));

    let store: Arc<dyn RecordStore> = if args.in_memory {
        info!("using in-memory record store");
        Arc::new(MemoryRecordStore::new())
    } else {
        Arc::new(CsvRecordStore::open(&config.data_dir)?)
    };
    let engine = MatchingEngine::new(config.top_k, config.edge_threshold);

    match command {
        Command::Interactive => {
            let dot_path = (!args.in_memory).then(|| config.data_dir.join(DOT_FILE));
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut session =
                Interactive::new(store.as_ref(), engine, dot_path, stdin, tokio::io::stdout());
            session.run().await
        }
        Command::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            serve(config, store, engine).await
        }
    }
}

/// Structured logging. The prompt loop logs to stderr so stdout stays clean.
fn init_tracing(config: &Config, interactive: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
    });
    let registry = tracing_subscriber::registry().with(filter);

    if interactive {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn serve(config: Config, store: Arc<dyn RecordStore>, engine: MatchingEngine) -> Result<()> {
    info!("Starting matcher API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        top_k = engine.top_k,
        threshold = engine.edge_threshold,
        data_dir = %config.data_dir.display(),
        "matching configured"
    );

    let state = AppState { store, engine };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
