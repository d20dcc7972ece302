use clap::Parser;
use colored::*;
use std::path::PathBuf;

/// x16rs-stats - x16rs hash-selection statistics for Hacash blocks
#[derive(Parser, Debug)]
#[command(name = "x16rs-stats")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Replays the x16rs hash chain over a block range and counts which primitives it selects", long_about = None)]
pub struct Args {
    /// Starting block height (inclusive)
    #[arg(short, long, value_name = "HEIGHT", required_unless_present = "show")]
    pub start: Option<u32>,

    /// Ending block height (inclusive)
    #[arg(short, long, value_name = "HEIGHT", required_unless_present = "show")]
    pub end: Option<u32>,

    /// Full node HTTP endpoint
    #[arg(short = 'n', long, env = "X16RS_NODE_URL", default_value = crate::node::DEFAULT_NODE_URL, value_name = "URL")]
    pub node_url: String,

    /// Read block intros from a JSON file instead of querying the node
    #[arg(long, value_name = "FILE", conflicts_with = "show")]
    pub headers: Option<PathBuf>,

    /// Number of blocks analyzed concurrently
    #[arg(short, long, default_value_t = 8, value_name = "N")]
    pub concurrency: usize,

    /// Node request timeout in seconds
    #[arg(short, long, default_value_t = 30, value_name = "SECS")]
    pub timeout: u64,

    /// Directory for the JSON summary
    #[arg(long, default_value = "stats", value_name = "DIR")]
    pub stats_dir: PathBuf,

    /// Do not write the JSON summary
    #[arg(long)]
    pub no_save: bool,

    /// Render a previously saved summary and exit
    #[arg(long, value_name = "FILE")]
    pub show: Option<PathBuf>,

    /// Log every chain round (implies --debug)
    #[arg(long)]
    pub trace: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

pub fn display_banner() {
    let rule = "==============================================================".bright_cyan();
    println!("{}", rule);
    println!("  {}", "x16rs-stats - Hash Selection Analyzer".bright_white().bold());
    println!(
        "  {}",
        format!("Version {} | 16 primitives | SHA3-256 seed", env!("CARGO_PKG_VERSION")).bright_green()
    );
    println!("{}", rule);
}
