//! Riddle puzzles from a static table, bucketed by difficulty.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use waitwise_core_types::{PuzzleId, PuzzleKind};

use crate::{Puzzle, PuzzleBody};

struct RiddleEntry {
    question: &'static str,
    answer: &'static str,
    hints: [&'static str; 3],
    difficulty: f64,
    category: &'static str,
    expected_secs: u64,
}

const RIDDLES: &[RiddleEntry] = &[
    RiddleEntry {
        question: "I speak without a mouth and hear without ears. I have no body, but I come alive with wind. What am I?",
        answer: "echo",
        hints: ["I repeat what you say", "I'm found in caves and mountains", "Sound is key to my existence"],
        difficulty: 0.3,
        category: "nature",
        expected_secs: 45,
    },
    RiddleEntry {
        question: "The more you take, the more you leave behind. What am I?",
        answer: "footsteps",
        hints: ["Think about walking", "You create me as you move", "I'm left on the ground"],
        difficulty: 0.2,
        category: "logic",
        expected_secs: 30,
    },
    RiddleEntry {
        question: "What has keys but no locks, space but no room, and you can enter but can't go inside?",
        answer: "keyboard",
        hints: ["It's something you use every day", "Related to computers", "You're probably looking at one now"],
        difficulty: 0.4,
        category: "objects",
        expected_secs: 60,
    },
    RiddleEntry {
        question: "I'm tall when I'm young and short when I'm old. What am I?",
        answer: "candle",
        hints: ["I provide light", "I get consumed as I work", "You light me with fire"],
        difficulty: 0.3,
        category: "objects",
        expected_secs: 45,
    },
    RiddleEntry {
        question: "What can travel around the world while staying in a corner?",
        answer: "stamp",
        hints: ["I'm small and stuck to something", "I'm related to mail", "I help letters reach their destination"],
        difficulty: 0.5,
        category: "objects",
        expected_secs: 75,
    },
    RiddleEntry {
        question: "I have cities, but no houses. I have mountains, but no trees. I have water, but no fish. What am I?",
        answer: "map",
        hints: ["I show locations", "I'm made of paper or digital", "I help people navigate"],
        difficulty: 0.4,
        category: "objects",
        expected_secs: 60,
    },
    RiddleEntry {
        question: "What gets wet while drying?",
        answer: "towel",
        hints: ["It's in your bathroom", "You use it after a shower", "It absorbs water"],
        difficulty: 0.2,
        category: "objects",
        expected_secs: 30,
    },
    RiddleEntry {
        question: "I'm light as a feather, yet the strongest person can't hold me for five minutes. What am I?",
        answer: "breath",
        hints: ["Everyone does this constantly", "You need me to live", "You can control me temporarily"],
        difficulty: 0.5,
        category: "nature",
        expected_secs: 75,
    },
    RiddleEntry {
        question: "What has a head and a tail but no body?",
        answer: "coin",
        hints: ["You use me to buy things", "I'm made of metal", "I can be flipped"],
        difficulty: 0.3,
        category: "objects",
        expected_secs: 45,
    },
    RiddleEntry {
        question: "What runs but never walks, has a mouth but never talks, has a bed but never sleeps?",
        answer: "river",
        hints: ["I'm found in nature", "Fish live in me", "I flow continuously"],
        difficulty: 0.6,
        category: "nature",
        expected_secs: 90,
    },
    RiddleEntry {
        question: "The more of this there is, the less you see. What is it?",
        answer: "darkness",
        hints: ["Opposite of light", "It happens at night", "You need light to dispel me"],
        difficulty: 0.4,
        category: "abstract",
        expected_secs: 60,
    },
    RiddleEntry {
        question: "What can fill a room but takes up no space?",
        answer: "light",
        hints: ["You flip a switch for me", "I help you see", "I travel very fast"],
        difficulty: 0.5,
        category: "abstract",
        expected_secs: 75,
    },
    RiddleEntry {
        question: "I have branches, but no fruit, trunk or leaves. What am I?",
        answer: "bank",
        hints: ["You visit me for money", "I'm a business", "I have multiple locations"],
        difficulty: 0.6,
        category: "wordplay",
        expected_secs: 90,
    },
    RiddleEntry {
        question: "What goes up but never comes down?",
        answer: "age",
        hints: ["Everyone experiences this", "It happens with time", "You celebrate it yearly"],
        difficulty: 0.3,
        category: "abstract",
        expected_secs: 45,
    },
    RiddleEntry {
        question: "I'm always hungry and must be fed. The finger I touch will soon turn red. What am I?",
        answer: "fire",
        hints: ["I'm hot and dangerous", "I need fuel to survive", "I can cook food"],
        difficulty: 0.4,
        category: "nature",
        expected_secs: 60,
    },
];

/// Band around the requested difficulty a riddle may be drawn from.
const DIFFICULTY_BAND: f64 = 0.2;

pub fn generate(difficulty: f64, rng: &mut impl Rng) -> Puzzle {
    let candidates: Vec<&RiddleEntry> = RIDDLES
        .iter()
        .filter(|r| (r.difficulty - difficulty).abs() <= DIFFICULTY_BAND)
        .collect();
    let entry = candidates
        .choose(rng)
        .copied()
        .or_else(|| RIDDLES.choose(rng))
        .unwrap_or(&RIDDLES[0]);

    Puzzle {
        id: PuzzleId::new(),
        kind: PuzzleKind::Riddle,
        difficulty: entry.difficulty,
        expected_time: Duration::from_secs(entry.expected_secs),
        body: PuzzleBody::Riddle {
            question: entry.question.to_string(),
            answer: entry.answer.to_string(),
            hints: entry.hints.iter().map(|h| h.to_string()).collect(),
            category: entry.category.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_riddle_stays_near_requested_difficulty() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let puzzle = generate(0.3, &mut rng);
            assert!((puzzle.difficulty - 0.3).abs() <= DIFFICULTY_BAND);
        }
    }

    #[test]
    fn extreme_difficulty_still_yields_a_riddle() {
        // Nothing in the table is tagged 1.0; the generator falls back to
        // the whole table instead of failing.
        let mut rng = StdRng::seed_from_u64(12);
        let puzzle = generate(1.0, &mut rng);
        assert!(matches!(puzzle.body, PuzzleBody::Riddle { .. }));
    }

    #[test]
    fn answers_check_case_insensitively() {
        let mut rng = StdRng::seed_from_u64(13);
        let puzzle = generate(0.4, &mut rng);
        let PuzzleBody::Riddle { answer, .. } = &puzzle.body else {
            panic!("wrong body");
        };
        assert!(puzzle.check_text(&answer.to_uppercase()).correct);
    }
}
