use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use logscope_vector_store::{
    add_documents, dimension_from_env, Embedder, HashingEmbedder, Metadata, MetadataFilter,
    SearchResult, VectorStore,
};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

pub mod loader;

pub const DEFAULT_QUERY: &str = "Were there any auth errors?";

#[derive(Parser, Debug)]
#[command(name = "logscope")]
#[command(about = "Similarity search over embedded log lines", long_about = None)]
#[command(version)]
struct Cli {
    /// Question to search the logs for
    #[arg(default_value = DEFAULT_QUERY)]
    query: String,

    /// Number of results to return
    #[arg(short = 'k', long, default_value_t = 2)]
    top_k: usize,

    /// Log file to index, one document per line (defaults to the built-in sample)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Only return lines with this log level
    #[arg(long)]
    level: Option<String>,

    /// Embedding dimension (overrides LOGSCOPE_EMBED_DIMENSION)
    #[arg(long)]
    dimension: Option<usize>,

    /// Print results as a single JSON object on stdout
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Serialize)]
struct SearchReport {
    query: String,
    k: usize,
    model: String,
    total_documents: usize,
    results: Vec<ReportHit>,
}

#[derive(Debug, Serialize)]
struct ReportHit {
    index: usize,
    score: f32,
    content: String,
    metadata: Metadata,
}

impl From<SearchResult> for ReportHit {
    fn from(result: SearchResult) -> Self {
        Self {
            index: result.index,
            score: result.score,
            content: result.document.content,
            metadata: result.document.metadata,
        }
    }
}

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet || cli.json {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);
    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let dimension = match cli.dimension {
        Some(dimension) => dimension,
        None => dimension_from_env()?,
    };
    let embedder = HashingEmbedder::new(dimension)?;
    log::info!("Embedding model {} initialized", embedder.model_id());

    let documents = match &cli.input {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read log file {}", path.display()))?;
            loader::documents_from_lines(&path.display().to_string(), &text)
        }
        None => loader::sample_documents(),
    };
    if documents.is_empty() {
        anyhow::bail!("No log lines to index");
    }
    log::info!("Loaded {} log lines", documents.len());

    let mut store = VectorStore::new();
    add_documents(&mut store, &embedder, documents)
        .await
        .context("Failed to build vector store")?;

    let query_vector = embedder.embed(&cli.query).await?;
    let results = match &cli.level {
        Some(level) => {
            let filter = MetadataFilter::new().with("level", level.to_ascii_uppercase());
            store.search_filtered(&query_vector, cli.top_k, &filter)?
        }
        None => store.search(&query_vector, cli.top_k)?,
    };

    let report = SearchReport {
        query: cli.query,
        k: cli.top_k,
        model: embedder.model_id().to_string(),
        total_documents: store.len(),
        results: results.into_iter().map(ReportHit::from).collect(),
    };

    if cli.json {
        print_stdout(&serde_json::to_string_pretty(&report)?)
    } else {
        print_stdout(&render_text(&report))
    }
}

fn render_text(report: &SearchReport) -> String {
    let mut out = format!(
        "Indexed {} log lines.\n\nTop {} most relevant logs for the question: '{}'",
        report.total_documents,
        report.results.len(),
        report.query
    );
    for hit in &report.results {
        out.push_str(&format!("\n  - [{:.3}] {}", hit.score, hit.content));
    }
    out
}
