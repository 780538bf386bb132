use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use tokio::time::sleep;

use waitwise_detector::{
    DetectorConfig, DetectorEvent, DetectorRunner, LoadingDetector, ScriptedProbe,
};
use waitwise_event_bus::to_mpsc;

use waitwise_store::{MemoryStore, Storage};

use crate::cli::runtime::parse_platform;
use crate::session::SessionCoordinator;

#[derive(Args, Clone, Debug)]
pub struct WatchArgs {
    /// Platform profile to run (chatgpt, claude, gemini, deepseek,
    /// perplexity, generic)
    #[arg(short, long, default_value = "generic")]
    pub platform: String,

    /// Number of simulated loading episodes
    #[arg(short, long, default_value_t = 3)]
    pub episodes: u32,

    /// Simulated loading duration per episode, in milliseconds
    #[arg(long, default_value_t = 4_000)]
    pub episode_ms: u64,

    /// Minimum loading time before a puzzle is offered, in milliseconds
    #[arg(long)]
    pub trigger_delay_ms: Option<u64>,
}

/// Run the detector against a scripted page that alternates between idle
/// and streaming, printing every event. A stand-in for a real DOM probe;
/// it exercises the full detect-trigger-serve path. Puzzles and outcomes
/// stay in memory so a demo never touches stored progress.
pub async fn cmd_watch(args: WatchArgs, _data_dir: Option<&PathBuf>) -> Result<()> {
    let platform = parse_platform(&args.platform)?;
    let storage = Storage::new(Arc::new(MemoryStore::new()));
    let coordinator = SessionCoordinator::open(storage).await?;

    let mut config = DetectorConfig::default();
    config.min_trigger_delay = Duration::from_millis(
        args.trigger_delay_ms
            .unwrap_or(coordinator.settings().trigger_delay_ms),
    );

    let probe = Arc::new(ScriptedProbe::new(false));
    let detector = LoadingDetector::with_config(platform, config);
    let runner = DetectorRunner::new(detector, Arc::clone(&probe) as _);
    let mut events = to_mpsc(runner.bus(), 16);
    runner.start();

    println!(
        "Watching {} for {} episode(s) of {}ms...",
        platform.name(),
        args.episodes,
        args.episode_ms
    );

    let episode = Duration::from_millis(args.episode_ms);
    let gap = Duration::from_millis(500);
    let driver = tokio::spawn(async move {
        for _ in 0..args.episodes {
            sleep(gap).await;
            probe.set_loading(true);
            sleep(episode).await;
            probe.set_loading(false);
        }
        // Let the final complete event drain before the runner stops.
        sleep(gap).await;
    });

    loop {
        match tokio::time::timeout(Duration::from_millis(200), events.recv()).await {
            Ok(Some(event)) => {
                match &event {
                    DetectorEvent::LoadingStarted => println!("  loading started"),
                    DetectorEvent::TriggerPuzzle => {}
                    DetectorEvent::LoadingComplete { duration } => {
                        println!("  loading complete after {:.1}s", duration.as_secs_f64());
                    }
                }
                if let Some(puzzle) = coordinator.handle_event(&event).await? {
                    println!("  puzzle offered: {}", puzzle.prompt());
                    // The demo never collects an answer; close it out.
                    coordinator
                        .report_abandoned(&puzzle, Duration::from_secs(0))
                        .await?;
                }
            }
            Ok(None) => break,
            Err(_) if driver.is_finished() => break,
            Err(_) => {}
        }
    }
    driver.await?;

    runner.stop();
    Ok(())
}
