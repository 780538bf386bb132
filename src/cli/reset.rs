use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use crate::cli::runtime::open_storage;

#[derive(Args, Clone, Debug)]
pub struct ResetArgs {
    /// Confirm wiping settings, progress and difficulty state
    #[arg(long)]
    pub yes: bool,
}

pub async fn cmd_reset(args: ResetArgs, data_dir: Option<&PathBuf>) -> Result<()> {
    if !args.yes {
        bail!("this deletes all stored progress; re-run with --yes to confirm");
    }
    let storage = open_storage(data_dir);
    storage.reset().await?;
    println!("All stored state cleared.");
    Ok(())
}
