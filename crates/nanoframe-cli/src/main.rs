use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nanoframe_core::{
    AddOutcome, FileStore, Persistence, Studio, ViewerConfig, MAX_REFERENCE_IMAGES,
};

mod config;
mod sink;

use sink::TermSink;

#[derive(Parser)]
#[command(name = "nanoframe", version, about = "Nanoframe image studio CLI")]
struct Cli {
    /// Override the proxy prefix remote fetches go through
    #[arg(long, global = true)]
    proxy: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the stored access key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
    /// Inspect or replay past generations
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Fetch and display a result image
    Show {
        /// A URL, a data URI, or a local file path
        source: String,
        /// Prompt text shown alongside the image
        #[arg(long, default_value = "")]
        caption: String,
        /// Save the source to history as well
        #[arg(long)]
        record: bool,
    },
    /// Manage reference images for the next generation
    Refs {
        #[command(subcommand)]
        action: RefsAction,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Store a new access key
    Set { key: String },
    /// Print the stored key, masked
    Show,
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List saved generations, newest first
    List {
        #[arg(long)]
        json: bool,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Redisplay a saved generation by index
    Show { index: usize },
}

#[derive(Subcommand)]
enum RefsAction {
    /// Load image files onto the board; the board lives for this invocation only
    Add {
        files: Vec<PathBuf>,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = config::load_settings();
    tracing::debug!(path = %config::settings_path().display(), "settings loaded");

    let proxy = cli
        .proxy
        .clone()
        .unwrap_or_else(|| config::proxy_url(&settings));
    let store: Arc<dyn Persistence> = Arc::new(FileStore::new(config::data_dir(&settings))?);
    let viewer_config = ViewerConfig::new(config::scratch_dir(&settings))
        .with_fetch_timeout(config::fetch_timeout(&settings));
    let studio = Studio::open(proxy, viewer_config, store, Arc::new(TermSink))?;

    match cli.command {
        Commands::Key { action } => match action {
            KeyAction::Set { key } => {
                if key.trim().is_empty() {
                    anyhow::bail!("access key cannot be empty");
                }
                studio.set_api_key(&key);
                println!("key saved");
            }
            KeyAction::Show => {
                if studio.has_api_key() {
                    println!("{}", mask(&studio.api_key()));
                } else {
                    println!("no key saved");
                }
            }
        },
        Commands::History { action } => match action {
            HistoryAction::List { json, limit } => {
                let mut entries = studio.history.entries();
                if let Some(n) = limit {
                    entries.truncate(n);
                }
                if json {
                    println!("{}", serde_json::to_string_pretty(&entries)?);
                } else {
                    for (i, e) in entries.iter().enumerate() {
                        println!("{}\t{}\t{}\t{}", i, e.date, preview(&e.prompt), e.url);
                    }
                }
            }
            HistoryAction::Show { index } => match studio.history.select(index) {
                Some(entry) => {
                    studio.viewer.display(&entry.url, &entry.prompt).await;
                }
                None => anyhow::bail!("no history entry at index {index}"),
            },
        },
        Commands::Show {
            source,
            caption,
            record,
        } => {
            if record {
                studio.history.record(&caption, &source);
            }
            studio.viewer.display(&source, &caption).await;
        }
        Commands::Refs { action } => match action {
            RefsAction::Add { files, json } => {
                let mut added = 0usize;
                let mut skipped = 0usize;
                let mut rejected = 0usize;
                for file in files {
                    let bytes = std::fs::read(&file)?;
                    match studio.board.add(bytes).await {
                        AddOutcome::Added => added += 1,
                        AddOutcome::NotAnImage => skipped += 1,
                        AddOutcome::Full => rejected += 1,
                    }
                }
                if json {
                    println!(
                        "{}",
                        serde_json::json!({
                            "added": added,
                            "skipped": skipped,
                            "rejected": rejected,
                            "count": studio.board.len(),
                            "limit": MAX_REFERENCE_IMAGES,
                        })
                    );
                } else {
                    println!(
                        "added {added}, skipped {skipped}, rejected {rejected} ({}/{})",
                        studio.board.len(),
                        MAX_REFERENCE_IMAGES
                    );
                }
            }
        },
    }

    Ok(())
}

fn mask(key: &str) -> String {
    let head: String = key.chars().take(4).collect();
    let rest = key.chars().count().saturating_sub(4);
    format!("{head}{}", "*".repeat(rest))
}

fn preview(s: &str) -> String {
    let s = s.replace('\n', " ");
    const MAX: usize = 48;
    if s.chars().count() > MAX {
        let cut: String = s.chars().take(MAX).collect();
        format!("{cut}…")
    } else {
        s
    }
}
