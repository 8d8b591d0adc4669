//! `docustore-cli`: thin command-line front end over [`docustore::DocuEngine`].

use clap::{Parser, Subcommand};
use docustore::DocuEngine;

#[derive(Parser, Debug)]
#[command(name = "docustore-cli", version, about = "Local personal document search")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest a document: a local file path is read as text, anything else
    /// is treated as a URL and scraped.
    Add {
        /// File path or URL to ingest.
        source: String,
        /// Display title. Defaults to `source` when omitted.
        #[arg(long)]
        title: Option<String>,
    },
    /// Run a free-text query and print ranked results.
    Query {
        /// Query text.
        text: String,
        /// Maximum number of results to print.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> docustore::Result<()> {
    let cli = Cli::parse();
    let engine = DocuEngine::open_default()?;

    match cli.command {
        Command::Add { source, title } => add(&engine, &source, title.as_deref()),
        Command::Query { text, limit } => query(&engine, &text, limit),
    }
}

fn add(engine: &DocuEngine, source: &str, title: Option<&str>) -> docustore::Result<()> {
    let path = std::path::Path::new(source);
    if path.is_file() {
        let text = std::fs::read_to_string(path)?;
        let title = title.unwrap_or(source);
        engine.add_text(&text, title)?;
    } else {
        engine.add_url(source)?;
    }
    println!("added {source}");
    Ok(())
}

fn query(engine: &DocuEngine, text: &str, limit: usize) -> docustore::Result<()> {
    let results = engine.search(text)?;
    for result in results.into_iter().take(limit) {
        println!("{:.4}\t{}\t{}", result.score, result.title, result.identifier);
    }
    Ok(())
}
