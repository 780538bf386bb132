//! Adaptive difficulty controller.
//!
//! Converts a stream of puzzle outcomes into a difficulty scalar in `[0, 1]`,
//! nudging it so the user's rolling success rate stays near 70% — the
//! "flow channel" band where puzzles are neither trivial nor frustrating.

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

const TARGET_SUCCESS_RATE: f64 = 0.7;
const TOLERANCE: f64 = 0.1;
const INCREASE_RATE: f64 = 0.05;
// Steeper than the increase so the controller backs off from frustration
// faster than it escalates challenge.
const DECREASE_RATE: f64 = 0.08;
const HISTORY_SIZE: usize = 10;

const DEFAULT_DIFFICULTY: f64 = 0.5;

/// Persistable controller state: `{ difficulty, history }`.
///
/// Reconstruction through [`AdaptiveDifficulty::from_snapshot`] clamps the
/// difficulty and truncates the history the same way construction does, so a
/// blob written by an older or corrupted store still yields a valid
/// controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultySnapshot {
    pub difficulty: f64,
    pub history: Vec<f64>,
}

/// Rolling-average difficulty controller.
#[derive(Debug)]
pub struct AdaptiveDifficulty {
    history: VecDeque<f64>,
    current: f64,
}

impl Default for AdaptiveDifficulty {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptiveDifficulty {
    /// Fresh controller: mid-scale difficulty, empty history.
    pub fn new() -> Self {
        Self {
            history: VecDeque::with_capacity(HISTORY_SIZE),
            current: DEFAULT_DIFFICULTY,
        }
    }

    /// Build a controller from an initial difficulty and prior history.
    /// Difficulty is clamped to `[0, 1]`; only the most recent
    /// `HISTORY_SIZE` samples are kept.
    pub fn with_state(initial: f64, history: impl IntoIterator<Item = f64>) -> Self {
        let samples: Vec<f64> = history.into_iter().collect();
        let start = samples.len().saturating_sub(HISTORY_SIZE);
        Self {
            history: samples[start..].iter().copied().collect(),
            current: initial.clamp(0.0, 1.0),
        }
    }

    /// Score one puzzle outcome.
    ///
    /// Incorrect answers score 0. Correct answers score at least 0.7 — a
    /// correct-but-slow answer still counts as baseline success — with a
    /// speed bonus up to 1.0. A zero `expected` duration fails soft to the
    /// baseline rather than dividing by zero.
    fn score(correct: bool, time_spent: Duration, expected: Duration) -> f64 {
        if !correct {
            return 0.0;
        }
        let expected_ms = expected.as_millis() as f64;
        let time_ratio = if expected_ms <= 0.0 {
            0.0
        } else {
            let spent_ms = time_spent.as_millis() as f64;
            ((expected_ms - spent_ms) / expected_ms).max(0.0)
        };
        0.7 + 0.3 * time_ratio
    }

    /// Record one completed (or abandoned, with `correct = false`) puzzle
    /// outcome and return the updated difficulty.
    pub fn update(&mut self, correct: bool, time_spent: Duration, expected: Duration) -> f64 {
        let score = Self::score(correct, time_spent, expected);

        if self.history.len() == HISTORY_SIZE {
            self.history.pop_front();
        }
        self.history.push_back(score);

        let recent_avg = self.success_rate();

        if recent_avg > TARGET_SUCCESS_RATE + TOLERANCE {
            self.current = (self.current + INCREASE_RATE).min(1.0);
        } else if recent_avg < TARGET_SUCCESS_RATE - TOLERANCE {
            self.current = (self.current - DECREASE_RATE).max(0.0);
        }
        // Inside the dead band the difficulty holds steady.

        self.current
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    /// Defensive copy of the recent score history, oldest first.
    pub fn history(&self) -> Vec<f64> {
        self.history.iter().copied().collect()
    }

    /// Mean of the recent history, or 0 when no outcomes have been recorded.
    pub fn success_rate(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }
        self.history.iter().sum::<f64>() / self.history.len() as f64
    }

    /// Back to mid-scale difficulty with an empty history.
    pub fn reset(&mut self) {
        self.current = DEFAULT_DIFFICULTY;
        self.history.clear();
    }

    pub fn snapshot(&self) -> DifficultySnapshot {
        DifficultySnapshot {
            difficulty: self.current,
            history: self.history(),
        }
    }

    pub fn from_snapshot(snapshot: DifficultySnapshot) -> Self {
        Self::with_state(snapshot.difficulty, snapshot.history)
    }
}
