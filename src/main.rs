use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use waitwise::cli::{
    cmd_reset, cmd_solve, cmd_stats, cmd_watch, runtime, ResetArgs, SolveArgs, WatchArgs,
};

#[derive(Parser, Debug)]
#[command(name = "waitwise", version, about = "Micro-puzzles while AI responses stream")]
struct Cli {
    /// Directory holding the state file (default: $WAITWISE_DATA_DIR or .)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Shortcut for --log-level debug
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve puzzles interactively
    Solve(SolveArgs),
    /// Run the detector against a simulated streaming page
    Watch(WatchArgs),
    /// Show progress and difficulty statistics
    Stats,
    /// Clear all stored state
    Reset(ResetArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    runtime::init_logging(&cli.log_level, cli.debug)?;

    match cli.command {
        Command::Solve(args) => cmd_solve(args, cli.data_dir.as_ref()).await,
        Command::Watch(args) => cmd_watch(args, cli.data_dir.as_ref()).await,
        Command::Stats => cmd_stats(cli.data_dir.as_ref()).await,
        Command::Reset(args) => cmd_reset(args, cli.data_dir.as_ref()).await,
    }
}
