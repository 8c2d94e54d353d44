use anyhow::{Context, Result};
use clap::Parser;
use pharma_papers::config::{find_config_file, load_config, Config};
use pharma_papers::export::export_to_csv;
use pharma_papers::models::SearchQuery;
use pharma_papers::processing::filter_papers;
use pharma_papers::sources::{PubMedSource, Source};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fetch research papers with authors from pharmaceutical companies
#[derive(Parser, Debug)]
#[command(name = "pharma-papers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fetch PubMed papers with authors from pharmaceutical/biotech companies", long_about = None)]
struct Cli {
    /// PubMed query string (full PubMed query syntax is supported)
    #[arg(required_unless_present = "show_config")]
    query: Option<String>,

    /// Enable debug output
    #[arg(long, short)]
    debug: bool,

    /// Output file path for CSV results (prints to stdout if omitted)
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// Maximum number of papers to fetch (default from config, 100)
    #[arg(long, short = 'n')]
    max_results: Option<usize>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    show_config: bool,
}

fn init_tracing(debug: bool, config: &Config) {
    let level = if debug {
        "debug"
    } else {
        config.logging.level.as_str()
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("pharma_papers={}", level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(find_config_file);
    let config = load_config(config_path.as_deref()).context("Failed to load configuration")?;

    init_tracing(cli.debug, &config);
    if let Some(path) = &config_path {
        tracing::debug!("Using config file: {}", path.display());
    }

    if cli.show_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let Some(query) = cli.query else {
        anyhow::bail!("A PubMed query is required");
    };

    tracing::debug!("Query: {}", query);
    tracing::debug!(
        "Output file: {}",
        cli.file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".to_string())
    );

    let source = PubMedSource::from_config(&config.pubmed)?;
    let search_query =
        SearchQuery::new(query).max_results(cli.max_results.unwrap_or(config.pubmed.max_results));

    let ids = source
        .search(&search_query)
        .await
        .context("PubMed search failed")?;
    if ids.is_empty() {
        println!("No papers found matching the query.");
        return Ok(());
    }

    let papers = source
        .fetch_details(&ids)
        .await
        .context("Failed to fetch paper details")?;

    let filtered = filter_papers(&papers);
    if filtered.is_empty() {
        println!("No papers found with pharmaceutical/biotech company authors.");
        return Ok(());
    }

    match export_to_csv(&filtered, cli.file.as_deref()).context("Failed to export CSV")? {
        Some(csv) => print!("{}", csv),
        None => {
            if let Some(path) = &cli.file {
                println!("Results saved to {}", path.display());
            }
        }
    }

    Ok(())
}
