use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::Parser;
use pdf_search::validation::format_megabytes;
use pdf_search::{validate_query, Config, GeminiService, SearchService};
use std::path::PathBuf;
use std::sync::Arc;

/// Search a PDF for keywords and topics with the Gemini API.
#[derive(Parser, Debug)]
#[command(name = "pdf_search", version, about)]
struct Cli {
    /// Path to the PDF file
    file: PathBuf,

    /// Exact-match keyword; repeat or comma-separate for several
    #[arg(short, long = "keyword", value_delimiter = ',')]
    keywords: Vec<String>,

    /// Thematic topic; repeat or comma-separate for several
    #[arg(short, long = "topic", value_delimiter = ',')]
    topics: Vec<String>,

    /// Print the metadata as JSON after the answer
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    env_logger::init();

    let bytes = tokio::fs::read(&cli.file)
        .await
        .with_context(|| format!("PDF file not found: {}", cli.file.display()))?;
    eprintln!("Processing PDF: {} ({})", cli.file.display(), format_megabytes(bytes.len()));

    let encoded = STANDARD.encode(&bytes);
    let query = validate_query(Some(&encoded), &cli.keywords, &cli.topics, config.max_pdf_bytes)?;

    let gemini_service = Arc::new(GeminiService::new(&config)?);
    let search_service = SearchService::new(gemini_service);

    let result = search_service.search(&query).await?;

    println!("{}", result.text);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result.metadata)?);
    } else {
        eprintln!("\n{} matching page tags", result.metadata.pages_analyzed);
    }

    Ok(())
}
