//! Document preparation CLI
//!
//! Run with: cargo run -p ruvector-docprep --bin docprep -- all

use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docprep::ingestion::NativePdfExtractor;
use docprep::{ConversionRun, DocprepConfig, RepairSummary, RepairSweep, RunSummary};

#[derive(Parser)]
#[command(name = "docprep", version, about = "Convert crawled pages and PDFs into chunked records")]
struct Cli {
    /// Project root that relative paths are resolved against
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert the latest crawl result
    Crawl,
    /// Convert every PDF in the input directory
    Pdf,
    /// Repair markup artifacts in written records
    Repair,
    /// Crawl, PDF and repair in sequence
    All,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ruvector_docprep=info,docprep=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DocprepConfig::from_toml_file(path)?,
        None => DocprepConfig::default(),
    }
    .with_root(&cli.root);
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Crawl input: {}", config.paths.crawl_input_dir.display());
    tracing::info!("  - PDF input: {}", config.paths.pdf_input_dir.display());
    tracing::info!("  - Max section length: {}", config.limits.max_section_chars);

    let run = ConversionRun::new(&config);

    match cli.command {
        Command::Crawl => print_run(&run.convert_crawl().await?),
        Command::Pdf => print_run(&run.convert_pdfs(Arc::new(NativePdfExtractor)).await?),
        Command::Repair => print_repair(&sweep(&config).run().await?),
        Command::All => {
            // A missing input only skips its own stage
            match run.convert_crawl().await {
                Ok(summary) => print_run(&summary),
                Err(e) if e.is_run_level() => tracing::warn!("Crawl conversion skipped: {}", e),
                Err(e) => return Err(e.into()),
            }
            match run.convert_pdfs(Arc::new(NativePdfExtractor)).await {
                Ok(summary) => print_run(&summary),
                Err(e) if e.is_run_level() => tracing::warn!("PDF conversion skipped: {}", e),
                Err(e) => return Err(e.into()),
            }
            print_repair(&sweep(&config).run().await?);
        }
    }

    Ok(())
}

fn sweep(config: &DocprepConfig) -> RepairSweep {
    RepairSweep::new(
        vec![
            config.paths.crawl_output_dir.clone(),
            config.paths.pdf_output_dir.clone(),
        ],
        &config.output.extension,
    )
}

fn print_run(summary: &RunSummary) {
    println!("\n{} {} conversion summary", style("==").cyan(), summary.category);
    println!("  {} converted: {} sources", style("✔").green(), summary.sources_converted);
    println!("  {} records written: {}", style("✔").green(), summary.records_written);
    println!(
        "  {} skipped (too little content): {}",
        style("-").yellow(),
        summary.sources_skipped
    );
    if summary.has_failures() {
        println!(
            "  {} failed: {} sources, {} records",
            style("✘").red(),
            summary.sources_failed,
            summary.write_failures
        );
    }
}

fn print_repair(summary: &RepairSummary) {
    println!("\n{} repair summary", style("==").cyan());
    println!("  {} fixed: {} files", style("✔").green(), summary.files_fixed);
    println!("  {} unchanged: {} files", style("-").yellow(), summary.files_unchanged);
    if summary.files_failed > 0 {
        println!("  {} failed: {} files", style("✘").red(), summary.files_failed);
    }
}
