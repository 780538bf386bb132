//! Number-sequence puzzles: spot the rule, name the next term.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use waitwise_core_types::{PuzzleId, PuzzleKind};

use crate::{multiple_choice, Puzzle, PuzzleBody};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rule {
    Arithmetic,
    Geometric,
    Fibonacci,
    Squares,
    Alternating,
}

/// Harder rules only become available as difficulty rises.
fn available_rules(difficulty: f64) -> &'static [Rule] {
    if difficulty < 0.3 {
        &[Rule::Arithmetic, Rule::Geometric]
    } else if difficulty < 0.6 {
        &[Rule::Arithmetic, Rule::Geometric, Rule::Squares]
    } else {
        &[
            Rule::Arithmetic,
            Rule::Geometric,
            Rule::Fibonacci,
            Rule::Squares,
            Rule::Alternating,
        ]
    }
}

pub fn generate(difficulty: f64, rng: &mut impl Rng) -> Puzzle {
    let rule = *available_rules(difficulty)
        .choose(rng)
        .unwrap_or(&Rule::Arithmetic);

    let shown = 4 + (difficulty * 2.0) as usize;
    let (sequence, answer, variance, expected_secs) = match rule {
        Rule::Arithmetic => {
            let start = rng.gen_range(1..=20);
            let step = rng.gen_range(2..=(3 + (difficulty * 9.0) as i64));
            let terms: Vec<i64> = (0..shown as i64).map(|i| start + i * step).collect();
            let next = start + shown as i64 * step;
            (terms, next, step, 25)
        }
        Rule::Geometric => {
            let start = rng.gen_range(1..=5);
            let ratio: i64 = rng.gen_range(2..=3);
            let terms: Vec<i64> = (0..shown as u32).map(|i| start * ratio.pow(i)).collect();
            let next = start * ratio.pow(shown as u32);
            (terms, next, next / 4, 35)
        }
        Rule::Fibonacci => {
            let mut a = rng.gen_range(1..=3);
            let mut b = rng.gen_range(1..=4);
            let mut terms = Vec::with_capacity(shown);
            for _ in 0..shown {
                terms.push(a);
                let sum = a + b;
                a = b;
                b = sum;
            }
            // After the loop `a` is the first unshown term.
            let variance = a / 3;
            (terms, a, variance, 45)
        }
        Rule::Squares => {
            let offset = rng.gen_range(1..=4);
            let terms: Vec<i64> = (0..shown as i64).map(|i| (i + offset).pow(2)).collect();
            let next = (shown as i64 + offset).pow(2);
            (terms, next, next / 4, 40)
        }
        Rule::Alternating => {
            // Two interleaved arithmetic sequences with distinct steps.
            let start_a = rng.gen_range(1..=10);
            let start_b = rng.gen_range(1..=10);
            let step_a = rng.gen_range(2..=5);
            let step_b = rng.gen_range(2..=5);
            let terms: Vec<i64> = (0..shown as i64)
                .map(|i| {
                    if i % 2 == 0 {
                        start_a + (i / 2) * step_a
                    } else {
                        start_b + (i / 2) * step_b
                    }
                })
                .collect();
            let i = shown as i64;
            let next = if i % 2 == 0 {
                start_a + (i / 2) * step_a
            } else {
                start_b + (i / 2) * step_b
            };
            (terms, next, step_a.max(step_b), 50)
        }
    };

    let options = multiple_choice(answer, variance, rng);

    Puzzle {
        id: PuzzleId::new(),
        kind: PuzzleKind::PatternRecognition,
        difficulty,
        expected_time: Duration::from_secs(expected_secs),
        body: PuzzleBody::Pattern {
            sequence,
            answer,
            options,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn body(puzzle: &Puzzle) -> (&Vec<i64>, i64, &Vec<i64>) {
        let PuzzleBody::Pattern {
            sequence,
            answer,
            options,
        } = &puzzle.body
        else {
            panic!("wrong body");
        };
        (sequence, *answer, options)
    }

    /// The answer must continue the sequence under one of the known rules.
    fn continues(sequence: &[i64], answer: i64) -> bool {
        let full: Vec<i64> = sequence.iter().copied().chain([answer]).collect();
        let n = full.len();

        let arithmetic = full.windows(2).map(|w| w[1] - w[0]).collect::<Vec<_>>();
        if arithmetic.windows(2).all(|w| w[0] == w[1]) {
            return true;
        }
        if full
            .windows(2)
            .all(|w| w[0] != 0 && w[1] % w[0] == 0 && w[1] / w[0] == full[1] / full[0])
        {
            return true;
        }
        if n >= 3 && full.windows(3).all(|w| w[2] == w[0] + w[1]) {
            return true;
        }
        let root = (full[0] as f64).sqrt().round() as i64;
        if full
            .iter()
            .enumerate()
            .all(|(i, t)| *t == (root + i as i64).pow(2))
        {
            return true;
        }
        // Alternating: both even-index and odd-index subsequences arithmetic.
        let evens: Vec<i64> = full.iter().step_by(2).copied().collect();
        let odds: Vec<i64> = full.iter().skip(1).step_by(2).copied().collect();
        let steady = |s: &[i64]| {
            s.windows(2)
                .map(|w| w[1] - w[0])
                .collect::<Vec<_>>()
                .windows(2)
                .all(|w| w[0] == w[1])
        };
        steady(&evens) && steady(&odds)
    }

    #[test]
    fn answer_continues_the_sequence() {
        let mut rng = StdRng::seed_from_u64(41);
        for difficulty in [0.0, 0.4, 0.8, 1.0] {
            for _ in 0..50 {
                let puzzle = generate(difficulty, &mut rng);
                let (sequence, answer, _) = body(&puzzle);
                assert!(
                    continues(sequence, answer),
                    "{:?} then {answer}",
                    sequence
                );
            }
        }
    }

    #[test]
    fn easy_sequences_use_simple_rules() {
        // At low difficulty every sequence must be arithmetic or geometric.
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let puzzle = generate(0.1, &mut rng);
            let (sequence, answer, _) = body(&puzzle);
            let full: Vec<i64> = sequence.iter().copied().chain([answer]).collect();
            let diffs: Vec<i64> = full.windows(2).map(|w| w[1] - w[0]).collect();
            let arithmetic = diffs.windows(2).all(|w| w[0] == w[1]);
            let geometric = full
                .windows(2)
                .all(|w| w[0] != 0 && w[1] % w[0] == 0 && w[1] / w[0] == full[1] / full[0]);
            assert!(arithmetic || geometric, "{full:?}");
        }
    }

    #[test]
    fn longer_sequences_at_high_difficulty() {
        let mut rng = StdRng::seed_from_u64(43);
        let easy = generate(0.0, &mut rng);
        let hard = generate(1.0, &mut rng);
        let (easy_seq, _, _) = body(&easy);
        let (hard_seq, _, _) = body(&hard);
        assert_eq!(easy_seq.len(), 4);
        assert_eq!(hard_seq.len(), 6);
    }

    #[test]
    fn options_include_the_answer() {
        let mut rng = StdRng::seed_from_u64(44);
        for _ in 0..20 {
            let puzzle = generate(0.7, &mut rng);
            let (_, answer, options) = body(&puzzle);
            assert_eq!(options.len(), 4);
            assert!(options.contains(&answer));
        }
    }
}
