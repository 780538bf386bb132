//! Quick mental-arithmetic puzzles, generated closed-form.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use waitwise_core_types::{PuzzleId, PuzzleKind};

use crate::{multiple_choice, Puzzle, PuzzleBody};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

pub fn generate(difficulty: f64, rng: &mut impl Rng) -> Puzzle {
    // Addition and subtraction only at the easy end.
    let operators: &[Operator] = if difficulty < 0.3 {
        &[Operator::Add, Operator::Sub]
    } else {
        &[Operator::Add, Operator::Sub, Operator::Mul, Operator::Div]
    };
    let operator = *operators.choose(rng).unwrap_or(&Operator::Add);

    // Operand range grows with difficulty: 10..=100.
    let max_num = 10 + (difficulty * 90.0) as i64;
    // Multiplication and division stay small enough for mental math: 5..=20.
    let max_small = 5 + (difficulty * 15.0) as i64;

    let (question, answer, variance) = match operator {
        Operator::Add => {
            let a = rng.gen_range(1..=max_num);
            let b = rng.gen_range(1..=max_num);
            (format!("{a} + {b}"), a + b, (a + b) / 3)
        }
        Operator::Sub => {
            let mut a = rng.gen_range(1..=max_num);
            let mut b = rng.gen_range(1..=max_num);
            if b > a {
                std::mem::swap(&mut a, &mut b);
            }
            (format!("{a} - {b}"), a - b, max_num / 3)
        }
        Operator::Mul => {
            let a = rng.gen_range(1..=max_small);
            let b = rng.gen_range(1..=max_small);
            (format!("{a} × {b}"), a * b, (a * b) / 3)
        }
        Operator::Div => {
            // Constructed from whole quotients so the answer is exact.
            let quotient = rng.gen_range(1..=max_small);
            let divisor = rng.gen_range(1..=max_small);
            let dividend = quotient * divisor;
            (format!("{dividend} ÷ {divisor}"), quotient, max_small / 2)
        }
    };

    let options = multiple_choice(answer, variance, rng);
    let expected_time = Duration::from_millis(20_000 + (difficulty * 40_000.0) as u64);

    Puzzle {
        id: PuzzleId::new(),
        kind: PuzzleKind::QuickMath,
        difficulty,
        expected_time,
        body: PuzzleBody::QuickMath {
            question,
            answer,
            options,
        },
    }
}
