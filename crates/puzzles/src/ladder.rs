//! Word ladders from a static table of chains with known solutions.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use waitwise_core_types::{PuzzleId, PuzzleKind};

use crate::{Puzzle, PuzzleBody, Verdict};

struct LadderEntry {
    start: &'static str,
    end: &'static str,
    steps: usize,
    solution: &'static [&'static str],
    difficulty: f64,
}

const LADDERS: &[LadderEntry] = &[
    LadderEntry {
        start: "cat",
        end: "dog",
        steps: 3,
        solution: &["cat", "cot", "dot", "dog"],
        difficulty: 0.3,
    },
    LadderEntry {
        start: "boy",
        end: "man",
        steps: 3,
        solution: &["boy", "bay", "may", "man"],
        difficulty: 0.3,
    },
    LadderEntry {
        start: "love",
        end: "hate",
        steps: 3,
        solution: &["love", "hove", "have", "hate"],
        difficulty: 0.4,
    },
    LadderEntry {
        start: "cold",
        end: "warm",
        steps: 4,
        solution: &["cold", "cord", "word", "worm", "warm"],
        difficulty: 0.5,
    },
    LadderEntry {
        start: "lead",
        end: "gold",
        steps: 3,
        solution: &["lead", "load", "goad", "gold"],
        difficulty: 0.6,
    },
    LadderEntry {
        start: "head",
        end: "tail",
        steps: 5,
        solution: &["head", "heal", "teal", "tell", "tall", "tail"],
        difficulty: 0.7,
    },
    LadderEntry {
        start: "poor",
        end: "rich",
        steps: 6,
        solution: &["poor", "boor", "book", "rook", "rock", "rick", "rich"],
        difficulty: 0.8,
    },
    LadderEntry {
        start: "hot",
        end: "ice",
        steps: 8,
        solution: &["hot", "hat", "oat", "opt", "apt", "art", "are", "ace", "ice"],
        difficulty: 0.9,
    },
];

/// Ladders within this distance of the requested difficulty are candidates.
const DIFFICULTY_BAND: f64 = 0.25;
const SECS_PER_STEP: u64 = 15;

pub fn generate(difficulty: f64, rng: &mut impl Rng) -> Puzzle {
    let suitable: Vec<&LadderEntry> = LADDERS
        .iter()
        .filter(|l| (l.difficulty - difficulty).abs() <= DIFFICULTY_BAND)
        .collect();
    let entry = suitable
        .choose(rng)
        .copied()
        .or_else(|| LADDERS.choose(rng))
        .unwrap_or(&LADDERS[0]);

    Puzzle {
        id: PuzzleId::new(),
        kind: PuzzleKind::WordLadder,
        difficulty: entry.difficulty,
        expected_time: Duration::from_secs(entry.steps as u64 * SECS_PER_STEP),
        body: PuzzleBody::WordLadder {
            start: entry.start.to_string(),
            end: entry.end.to_string(),
            steps: entry.steps,
            solution: entry.solution.iter().map(|w| w.to_string()).collect(),
        },
    }
}

/// Validate a user-submitted path: must start and end with the given words
/// and change exactly one letter per step. Every violation is reported.
pub fn validate_path(start: &str, end: &str, path: &[String]) -> Verdict {
    let mut problems = Vec::new();

    if path
        .first()
        .map(|w| !w.eq_ignore_ascii_case(start))
        .unwrap_or(true)
    {
        problems.push(format!("must start with {start:?}"));
    }
    if path
        .last()
        .map(|w| !w.eq_ignore_ascii_case(end))
        .unwrap_or(true)
    {
        problems.push(format!("must end with {end:?}"));
    }

    for (i, pair) in path.windows(2).enumerate() {
        let current = pair[0].to_ascii_lowercase();
        let next = pair[1].to_ascii_lowercase();
        if current.chars().count() != next.chars().count() {
            problems.push(format!("words must be the same length (step {})", i + 1));
            continue;
        }
        let differences = current
            .chars()
            .zip(next.chars())
            .filter(|(a, b)| a != b)
            .count();
        if differences != 1 {
            problems.push(format!("change exactly one letter per step (step {})", i + 1));
        }
    }

    Verdict {
        correct: problems.is_empty(),
        problems,
    }
}

/// Hint for the next rung: which letter of the current word to change.
pub fn next_step_hint(solution: &[String], current_step: usize) -> String {
    if current_step + 1 >= solution.len() {
        return "you're at the last step".to_string();
    }
    let current = &solution[current_step];
    let next = &solution[current_step + 1];
    for (i, (a, b)) in current.chars().zip(next.chars()).enumerate() {
        if a != b {
            return format!("try changing letter {} to {b:?}", i + 1);
        }
    }
    format!("next word: {next}")
}
