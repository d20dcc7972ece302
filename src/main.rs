use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Instant;

use x16rs_stats::algorithms::HashPrimitiveRegistry;
use x16rs_stats::cli::{display_banner, Args};
use x16rs_stats::config::{AnalyzerConfig, SourceConfig};
use x16rs_stats::node::{HeaderSource, MemorySource, NodeClient};
use x16rs_stats::pipeline::{BlockAnalysisPipeline, RangeReport};
use x16rs_stats::report::{self, StatsReport};

#[tokio::main]
async fn main() -> Result<()> {
    let start_time = Instant::now();

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.trace || args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    if args.no_color {
        colored::control::set_override(false);
    }

    display_banner();

    if let Some(path) = &args.show {
        return show_saved(path);
    }

    let config = match AnalyzerConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red().bold());
            std::process::exit(1);
        }
    };

    // Display configuration
    println!("\n{}", "=== Analysis Configuration ===".cyan().bold());
    println!(
        "{:<15} {} to {} ({} blocks)",
        "Blocks:".green(),
        config.start,
        config.end,
        config.requested_blocks()
    );
    match &config.source {
        SourceConfig::Node(node) => println!("{:<15} {}", "Node URL:".green(), node.url.bright_white()),
        SourceConfig::File(path) => println!("{:<15} {}", "Headers:".green(), path.display()),
    }
    println!("{:<15} {}", "Concurrency:".green(), config.pipeline.concurrency);
    match &config.stats_dir {
        Some(dir) => println!("{:<15} {}", "Stats dir:".green(), dir.display()),
        None => println!("{:<15} {}", "Stats dir:".green(), "disabled".dimmed()),
    }
    println!();

    let registry = match HashPrimitiveRegistry::standard() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("\n{}", "Hash primitives unavailable!".red().bold());
            eprintln!("{}", format!("   Error: {}", e).red());
            eprintln!(
                "\n{}",
                "Rebuild with `--features sphlib` and SPHLIB_DIR pointing at the sphlib 3.0 `c/` sources.".yellow()
            );
            std::process::exit(1);
        }
    };

    let range = match config.source.clone() {
        SourceConfig::Node(node) => {
            let client = NodeClient::new(node).context("failed to build HTTP client")?;
            run(client, registry, &config).await?
        }
        SourceConfig::File(path) => {
            let source = MemorySource::load(&path)
                .with_context(|| format!("failed to read block intros from {}", path.display()))?;
            tracing::info!("Loaded {} block intros from {}", source.len(), path.display());
            run(source, registry, &config).await?
        }
    };

    print_summary(&range);

    if let Some(dir) = &config.stats_dir {
        let stats = StatsReport::from_range(&range, report::timestamp_now());
        let path = report::save_stats_to_file(dir, &stats)?;
        println!("\n{} {}", "Statistics saved to:".green(), path.display());
    }

    println!("\nTotal processing time: {:.2} seconds", start_time.elapsed().as_secs_f64());
    Ok(())
}

/// Run the pipeline over the configured range, stopping early on Ctrl+C
async fn run<S: HeaderSource>(
    source: S,
    registry: HashPrimitiveRegistry,
    config: &AnalyzerConfig,
) -> Result<RangeReport> {
    let pipeline = BlockAnalysisPipeline::new(source, registry, config.pipeline.clone());

    let shutdown = pipeline.shutdown_handle();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                println!("\n{}", "Interrupt signal received, finishing in-flight blocks...".yellow().bold());
                shutdown.store(true, Ordering::SeqCst);
            }
            Err(err) => {
                eprintln!("Unable to listen for shutdown signal: {}", err);
            }
        }
    });

    println!("Processing blocks from height {} to {}", config.start, config.end);
    let range = pipeline.analyze_range(config.start, config.end).await?;
    Ok(range)
}

fn print_summary(range: &RangeReport) {
    println!("\n{}", "=== Statistics Results ===".cyan().bold());
    println!("   {} {}", "Requested blocks:".green(), range.requested_blocks());
    println!("   {} {}", "Processed blocks:".green(), range.processed_blocks());

    if range.skipped_blocks() > 0 {
        println!("   {} {}", "Skipped blocks:".yellow(), range.skipped_blocks());
        for block in range.skipped.iter().take(10) {
            println!("      {} {}", format!("#{}", block.height).dimmed(), block.reason);
        }
        if range.skipped.len() > 10 {
            println!("      ... and {} more", range.skipped.len() - 10);
        }
    }
    if range.aborted {
        println!(
            "   {} {} blocks not visited",
            "Aborted:".red().bold(),
            range.unvisited_blocks()
        );
    }

    println!("\n{}", "Algorithm Usage Statistics:".cyan().bold());
    print!("{}", report::render_statistics(&range.aggregate));
    print_extremes(&range.aggregate);
}

fn print_extremes(aggregate: &x16rs_stats::stats::UsageAggregate) {
    if aggregate.total_rounds() == 0 {
        return;
    }
    let ranked = report::ranking(aggregate);
    if let (Some(most), Some(least)) = (ranked.first(), ranked.last()) {
        println!(
            "\n   {} {} ({})   {} {} ({})",
            "Most used:".green(),
            most.0,
            most.1,
            "Least used:".green(),
            least.0,
            least.1
        );
    }
}

fn show_saved(path: &Path) -> Result<()> {
    let stats = report::load_stats_file(path)
        .with_context(|| format!("failed to load {}", path.display()))?;

    println!("\n{}", "=== Saved Statistics ===".cyan().bold());
    println!(
        "   {} {} to {} ({})",
        "Blocks:".green(),
        stats.start_height,
        stats.end_height,
        stats.timestamp
    );
    println!("   {} {}", "Requested blocks:".green(), stats.requested_blocks);
    if !stats.skipped_blocks.is_empty() {
        println!("   {} {}", "Skipped blocks:".yellow(), stats.skipped_blocks.len());
    }
    println!();
    let aggregate = stats.aggregate();
    print!("{}", report::render_statistics(&aggregate));
    print_extremes(&aggregate);
    Ok(())
}
