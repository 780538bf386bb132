use std::path::PathBuf;

use anyhow::Result;

use waitwise_difficulty::AdaptiveDifficulty;

use crate::cli::runtime::open_storage;

pub async fn cmd_stats(data_dir: Option<&PathBuf>) -> Result<()> {
    let storage = open_storage(data_dir);
    let progress = storage.load_progress().await?;
    let controller = match storage.load_difficulty().await? {
        Some(snapshot) => AdaptiveDifficulty::from_snapshot(snapshot),
        None => AdaptiveDifficulty::new(),
    };

    println!("Waitwise Statistics");
    println!("===================");
    println!("Solved: {}/{}", progress.total_solved, progress.total_attempted);
    println!("Success rate: {:.0}%", progress.success_rate() * 100.0);
    println!("Streak: {} day(s)", progress.streak_days);
    match progress.last_played {
        Some(last) => println!("Last played: {}", last.to_rfc3339()),
        None => println!("Last played: never"),
    }
    println!();
    println!("Difficulty: {:.2}", controller.current());
    println!(
        "Recent score average: {:.2} over {} outcome(s)",
        controller.success_rate(),
        controller.history().len()
    );

    if !progress.per_kind.is_empty() {
        println!();
        println!("By kind:");
        for (kind, stats) in &progress.per_kind {
            println!(
                "  {:<20} {}/{} solved, avg {:.1}s",
                kind.display_name(),
                stats.solved,
                stats.attempted,
                stats.average_time_ms / 1000.0
            );
        }
    }

    Ok(())
}
