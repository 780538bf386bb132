use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Args;

use waitwise_puzzles::PuzzleBody;

use crate::cli::runtime::{open_storage, parse_kind};
use crate::session::SessionCoordinator;

#[derive(Args, Clone, Debug)]
pub struct SolveArgs {
    /// Puzzle kind (riddle, quick_math, word_anagram, word_ladder,
    /// pattern_recognition); random from the enabled set when omitted
    #[arg(short, long)]
    pub kind: Option<String>,

    /// Number of puzzles to serve
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: u32,
}

pub async fn cmd_solve(args: SolveArgs, data_dir: Option<&PathBuf>) -> Result<()> {
    let storage = open_storage(data_dir);
    let coordinator = SessionCoordinator::open(storage).await?;
    let kind = args.kind.as_deref().map(parse_kind).transpose()?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    for round in 1..=args.count {
        let puzzle = match kind {
            Some(kind) => coordinator.puzzle_of_kind(kind).await?,
            None => coordinator.next_puzzle().await?,
        };

        println!();
        println!(
            "[{round}/{}] {} (difficulty {:.2})",
            args.count,
            puzzle.kind.display_name(),
            puzzle.difficulty
        );
        println!("{}", puzzle.prompt());
        if let PuzzleBody::QuickMath { options, .. } | PuzzleBody::Pattern { options, .. } =
            &puzzle.body
        {
            let rendered: Vec<String> = options.iter().map(|o| o.to_string()).collect();
            println!("Options: {}", rendered.join("  "));
        }
        print!("> ");
        io::stdout().flush()?;

        let started = Instant::now();
        let Some(input) = lines.next().transpose()? else {
            println!("(no input, stopping)");
            break;
        };
        let time_spent = started.elapsed();

        let report = coordinator.report_answer(&puzzle, &input, time_spent).await?;
        if report.verdict.correct {
            println!("Correct in {:.1}s!", time_spent.as_secs_f64());
        } else {
            println!("Not quite.");
            for problem in &report.verdict.problems {
                println!("  - {problem}");
            }
        }
        println!(
            "Next difficulty: {:.2} | streak: {} day(s)",
            report.next_difficulty, report.streak_days
        );
    }

    Ok(())
}
