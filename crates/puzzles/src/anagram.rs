//! Word anagrams: scramble a word from a difficulty-bucketed list.

use std::collections::BTreeSet;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use waitwise_core_types::{PuzzleId, PuzzleKind};

use crate::{Puzzle, PuzzleBody};

const EASY: &[(&str, &str)] = &[
    ("listen", "Not speaking"),
    ("silent", "Without sound"),
    ("earth", "Our planet"),
    ("heart", "Organ that pumps blood"),
    ("tea", "Hot beverage"),
    ("eat", "Consume food"),
    ("night", "When it's dark"),
    ("thing", "An object"),
    ("stop", "Don't go"),
    ("pots", "Cooking containers"),
    ("star", "Celestial body"),
    ("rats", "Small rodents"),
    ("arts", "Creative works"),
    ("horse", "Animal you can ride"),
    ("shore", "Beach edge"),
];

const MEDIUM: &[(&str, &str)] = &[
    ("triangle", "Three-sided shape"),
    ("integral", "Essential part"),
    ("players", "Game participants"),
    ("parsley", "Herb garnish"),
    ("replays", "Watch again"),
    ("section", "Part of something"),
    ("notices", "Observes"),
    ("kitchen", "Where you cook"),
    ("thicken", "Make more dense"),
    ("bedroom", "Where you sleep"),
    ("boredom", "State of being uninterested"),
    ("teacher", "Educator"),
    ("cheater", "One who breaks rules"),
    ("create", "Make something new"),
];

const HARD: &[(&str, &str)] = &[
    ("aspired", "Had ambitions"),
    ("despair", "Loss of hope"),
    ("praised", "Complimented"),
    ("asteroid", "Space rock"),
    ("organise", "Put in order (British spelling)"),
    ("moonlight", "Nighttime illumination"),
    ("customers", "People who buy"),
    ("struggling", "Having difficulty"),
    ("percussion", "Drum instruments"),
    ("supersonic", "Faster than sound"),
    ("astronomer", "Studies stars"),
    ("conversational", "Relating to dialogue"),
    ("conservation", "Preservation"),
];

/// Fisher-Yates scramble, retried until the result differs from the input
/// (words of three letters or fewer may come back unchanged).
fn scramble(word: &str, rng: &mut impl Rng) -> String {
    let mut letters: Vec<char> = word.chars().collect();
    for _ in 0..16 {
        letters.shuffle(rng);
        let scrambled: String = letters.iter().collect();
        if scrambled != word || word.len() <= 3 {
            return scrambled;
        }
    }
    letters.iter().collect()
}

pub fn generate(difficulty: f64, rng: &mut impl Rng) -> Puzzle {
    let list = if difficulty < 0.35 {
        EASY
    } else if difficulty < 0.7 {
        MEDIUM
    } else {
        HARD
    };
    let (word, hint) = *list.choose(rng).unwrap_or(&EASY[0]);
    let scrambled = scramble(word, rng);

    // Roughly three seconds per letter, stretched 80%-120% by difficulty.
    let base_ms = word.len() as f64 * 3_000.0;
    let expected_time = Duration::from_millis((base_ms * (0.8 + difficulty * 0.4)) as u64);

    Puzzle {
        id: PuzzleId::new(),
        kind: PuzzleKind::WordAnagram,
        difficulty,
        expected_time,
        body: PuzzleBody::WordAnagram {
            scrambled,
            answer: word.to_string(),
            hint: hint.to_string(),
        },
    }
}

/// Reveal one more letter position, returning the partially-revealed answer
/// in `a _ e` form. With every position revealed, returns the answer.
pub fn letter_hint(answer: &str, revealed: &mut BTreeSet<usize>, rng: &mut impl Rng) -> String {
    let available: Vec<usize> = (0..answer.chars().count())
        .filter(|i| !revealed.contains(i))
        .collect();
    if let Some(position) = available.choose(rng) {
        revealed.insert(*position);
    } else {
        return answer.to_string();
    }
    answer
        .chars()
        .enumerate()
        .map(|(i, letter)| {
            if revealed.contains(&i) {
                letter.to_string()
            } else {
                "_".to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn scrambled_word_is_permutation_of_answer() {
        let mut rng = StdRng::seed_from_u64(21);
        for difficulty in [0.1, 0.5, 0.9] {
            let puzzle = generate(difficulty, &mut rng);
            let PuzzleBody::WordAnagram { scrambled, answer, .. } = &puzzle.body else {
                panic!("wrong body");
            };
            let mut a: Vec<char> = scrambled.chars().collect();
            let mut b: Vec<char> = answer.chars().collect();
            a.sort_unstable();
            b.sort_unstable();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn longer_words_do_not_come_back_unscrambled() {
        let mut rng = StdRng::seed_from_u64(22);
        for _ in 0..50 {
            let puzzle = generate(0.9, &mut rng);
            let PuzzleBody::WordAnagram { scrambled, answer, .. } = &puzzle.body else {
                panic!("wrong body");
            };
            assert_ne!(scrambled, answer);
        }
    }

    #[test]
    fn difficulty_selects_word_bucket() {
        let mut rng = StdRng::seed_from_u64(23);
        let easy = generate(0.1, &mut rng);
        let hard = generate(0.95, &mut rng);
        let PuzzleBody::WordAnagram { answer: easy_word, .. } = &easy.body else {
            panic!("wrong body");
        };
        let PuzzleBody::WordAnagram { answer: hard_word, .. } = &hard.body else {
            panic!("wrong body");
        };
        assert!(EASY.iter().any(|(w, _)| w == easy_word));
        assert!(HARD.iter().any(|(w, _)| w == hard_word));
    }

    #[test]
    fn letter_hints_reveal_progressively() {
        let mut rng = StdRng::seed_from_u64(24);
        let mut revealed = BTreeSet::new();
        let answer = "earth";
        for step in 1..=answer.len() {
            let hint = letter_hint(answer, &mut revealed, &mut rng);
            assert_eq!(revealed.len(), step);
            let shown = hint.split(' ').filter(|c| *c != "_").count();
            assert_eq!(shown, step);
        }
        // Everything revealed: the hint is the answer itself.
        assert_eq!(letter_hint(answer, &mut revealed, &mut rng), answer);
    }
}
