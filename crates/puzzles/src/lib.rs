//! Puzzle generation and answer checking.
//!
//! Generators are parametrized by the difficulty scalar in `[0, 1]` coming
//! out of the difficulty controller: it selects number ranges, sequence
//! lengths and content buckets. Static content (riddles, word lists,
//! ladders) lives in per-module tables — data, not types.

pub mod anagram;
pub mod ladder;
pub mod math;
pub mod pattern;
pub mod riddles;

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use waitwise_core_types::{PuzzleId, PuzzleKind};

/// One generated puzzle, self-contained: everything needed to render it,
/// check an answer and score the outcome.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: PuzzleId,
    pub kind: PuzzleKind,
    /// Difficulty the puzzle was generated at (content difficulty for
    /// table-backed kinds may differ slightly from the requested value).
    pub difficulty: f64,
    /// Expected solve time; answering faster earns a score bonus.
    pub expected_time: Duration,
    pub body: PuzzleBody,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PuzzleBody {
    Riddle {
        question: String,
        answer: String,
        hints: Vec<String>,
        category: String,
    },
    QuickMath {
        question: String,
        answer: i64,
        options: Vec<i64>,
    },
    WordAnagram {
        scrambled: String,
        answer: String,
        hint: String,
    },
    WordLadder {
        start: String,
        end: String,
        steps: usize,
        solution: Vec<String>,
    },
    Pattern {
        sequence: Vec<i64>,
        answer: i64,
        options: Vec<i64>,
    },
}

/// Outcome of checking an answer. `problems` is populated for word-ladder
/// submissions, where each rule violation is reported individually.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Verdict {
    pub correct: bool,
    pub problems: Vec<String>,
}

impl Verdict {
    fn correct() -> Self {
        Self {
            correct: true,
            problems: Vec::new(),
        }
    }

    fn incorrect() -> Self {
        Self::default()
    }
}

impl Puzzle {
    /// Check a raw text answer. Numeric kinds parse the input; word kinds
    /// compare trimmed and case-insensitively; ladder input is a path of
    /// words split on whitespace and commas.
    pub fn check_text(&self, input: &str) -> Verdict {
        match &self.body {
            PuzzleBody::Riddle { answer, .. } | PuzzleBody::WordAnagram { answer, .. } => {
                if input.trim().eq_ignore_ascii_case(answer) {
                    Verdict::correct()
                } else {
                    Verdict::incorrect()
                }
            }
            PuzzleBody::QuickMath { answer, .. } | PuzzleBody::Pattern { answer, .. } => {
                match input.trim().parse::<i64>() {
                    Ok(n) if n == *answer => Verdict::correct(),
                    _ => Verdict::incorrect(),
                }
            }
            PuzzleBody::WordLadder { start, end, .. } => {
                let path: Vec<String> = input
                    .split(|c: char| c.is_whitespace() || c == ',')
                    .filter(|w| !w.is_empty())
                    .map(|w| w.to_ascii_lowercase())
                    .collect();
                ladder::validate_path(start, end, &path)
            }
        }
    }

    /// Question text as presented to the user.
    pub fn prompt(&self) -> String {
        match &self.body {
            PuzzleBody::Riddle { question, .. } => question.clone(),
            PuzzleBody::QuickMath { question, .. } => format!("{question} = ?"),
            PuzzleBody::WordAnagram { scrambled, hint, .. } => {
                format!("Unscramble: {scrambled} (hint: {hint})")
            }
            PuzzleBody::WordLadder { start, end, steps, .. } => format!(
                "Turn {start:?} into {end:?} in {steps} steps, changing one letter at a time"
            ),
            PuzzleBody::Pattern { sequence, .. } => {
                let terms: Vec<String> = sequence.iter().map(|n| n.to_string()).collect();
                format!("What comes next: {}, ...?", terms.join(", "))
            }
        }
    }
}

/// Generate a puzzle of the given kind at the given difficulty.
pub fn generate(kind: PuzzleKind, difficulty: f64, rng: &mut impl Rng) -> Puzzle {
    let difficulty = difficulty.clamp(0.0, 1.0);
    match kind {
        PuzzleKind::Riddle => riddles::generate(difficulty, rng),
        PuzzleKind::QuickMath => math::generate(difficulty, rng),
        PuzzleKind::WordAnagram => anagram::generate(difficulty, rng),
        PuzzleKind::WordLadder => ladder::generate(difficulty, rng),
        PuzzleKind::PatternRecognition => pattern::generate(difficulty, rng),
    }
}

/// Pick a random kind from the enabled set; an empty set falls back to
/// riddles rather than failing.
pub fn select_random_kind(enabled: &[PuzzleKind], rng: &mut impl Rng) -> PuzzleKind {
    enabled.choose(rng).copied().unwrap_or(PuzzleKind::Riddle)
}

/// Synthesize plausible wrong answers around the correct one: off-by-one
/// slips and wider miscalculations, deduplicated, shuffled, four total.
pub(crate) fn multiple_choice(answer: i64, variance: i64, rng: &mut impl Rng) -> Vec<i64> {
    let variance = variance.max(3);
    let mut options = vec![answer];
    let mut guard = 0;
    while options.len() < 4 && guard < 256 {
        guard += 1;
        let wrong = if rng.gen_bool(0.5) {
            answer + if rng.gen_bool(0.5) { 1 } else { -1 }
        } else {
            answer + rng.gen_range(-variance..=variance)
        };
        if wrong > 0 && !options.contains(&wrong) {
            options.push(wrong);
        }
    }
    // Degenerate small answers may not admit four positive distinct options.
    let mut filler = answer + variance;
    while options.len() < 4 {
        filler += 1;
        if !options.contains(&filler) {
            options.push(filler);
        }
    }
    options.shuffle(rng);
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn every_kind_generates() {
        let mut rng = rng();
        for kind in PuzzleKind::ALL {
            for difficulty in [0.0, 0.25, 0.5, 0.75, 1.0] {
                let puzzle = generate(kind, difficulty, &mut rng);
                assert_eq!(puzzle.kind, kind);
                assert!(puzzle.expected_time > Duration::ZERO);
                assert!(!puzzle.prompt().is_empty());
            }
        }
    }

    #[test]
    fn out_of_range_difficulty_is_clamped() {
        let mut rng = rng();
        let puzzle = generate(PuzzleKind::QuickMath, 7.5, &mut rng);
        assert!(puzzle.difficulty <= 1.0);
    }

    #[test]
    fn multiple_choice_is_unique_positive_and_contains_answer() {
        let mut rng = rng();
        for answer in [1, 2, 17, 400] {
            let options = multiple_choice(answer, answer / 3, &mut rng);
            assert_eq!(options.len(), 4);
            assert!(options.contains(&answer));
            assert!(options.iter().all(|o| *o > 0));
            let mut dedup = options.clone();
            dedup.sort_unstable();
            dedup.dedup();
            assert_eq!(dedup.len(), 4);
        }
    }

    #[test]
    fn empty_kind_set_falls_back_to_riddle() {
        let mut rng = rng();
        assert_eq!(select_random_kind(&[], &mut rng), PuzzleKind::Riddle);
    }

    #[test]
    fn text_answers_are_forgiving_about_case_and_whitespace() {
        let mut rng = rng();
        let puzzle = generate(PuzzleKind::WordAnagram, 0.1, &mut rng);
        let PuzzleBody::WordAnagram { answer, .. } = &puzzle.body else {
            panic!("wrong body");
        };
        assert!(puzzle.check_text(&format!("  {}  ", answer.to_uppercase())).correct);
        assert!(!puzzle.check_text("definitely-wrong").correct);
    }
}
