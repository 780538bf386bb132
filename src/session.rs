//! Session coordination: glue between the detector, the difficulty
//! controller, puzzle generation and persistence.

use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use waitwise_core_types::{PuzzleKind, WaitError};
use waitwise_detector::{DetectorEvent, DetectorRunner};
use waitwise_difficulty::AdaptiveDifficulty;
use waitwise_puzzles::{self as puzzles, Puzzle, Verdict};
use waitwise_store::{DifficultyMode, PuzzleSession, Settings, Storage};

/// Outcome of one answered puzzle, as reported back to the caller.
#[derive(Clone, Debug)]
pub struct OutcomeReport {
    pub verdict: Verdict,
    /// Difficulty the next puzzle will be generated at.
    pub next_difficulty: f64,
    pub streak_days: u32,
}

/// Serves puzzles during loading episodes and feeds outcomes back into the
/// difficulty controller and the progress store.
pub struct SessionCoordinator {
    storage: Storage,
    settings: Settings,
    controller: Mutex<AdaptiveDifficulty>,
    rng: Mutex<StdRng>,
}

impl SessionCoordinator {
    /// Load settings and the difficulty snapshot; absent or corrupt state
    /// starts fresh. A puzzle session left open by a previous run is
    /// recorded as abandoned.
    pub async fn open(storage: Storage) -> Result<Self, WaitError> {
        let settings = storage.load_settings().await?;
        let controller = match storage.load_difficulty().await? {
            Some(snapshot) => AdaptiveDifficulty::from_snapshot(snapshot),
            None => AdaptiveDifficulty::new(),
        };
        let coordinator = Self {
            storage,
            settings,
            controller: Mutex::new(controller),
            rng: Mutex::new(StdRng::from_entropy()),
        };

        if let Some(stale) = coordinator.storage.load_session().await? {
            warn!(
                target: "session.coordinator",
                kind = %stale.kind,
                "unfinished puzzle from a previous run, recording as abandoned"
            );
            let elapsed = (Utc::now() - stale.started_at)
                .to_std()
                .unwrap_or(Duration::ZERO);
            coordinator
                .record_outcome(stale.kind, Verdict::default(), elapsed, Duration::ZERO)
                .await?;
        }

        debug!(
            target: "session.coordinator",
            difficulty = coordinator.controller.lock().current(),
            "coordinator ready"
        );
        Ok(coordinator)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Persist new settings and apply them to this session; a running
    /// detector picks up the new trigger delay immediately.
    pub async fn update_settings(
        &mut self,
        settings: Settings,
        runner: Option<&DetectorRunner>,
    ) -> Result<(), WaitError> {
        self.storage.save_settings(&settings).await?;
        if let Some(runner) = runner {
            runner.update_trigger_delay(Duration::from_millis(settings.trigger_delay_ms));
        }
        self.settings = settings;
        Ok(())
    }

    /// Difficulty the next puzzle will be generated at.
    pub fn difficulty(&self) -> f64 {
        match self.settings.difficulty_mode {
            DifficultyMode::Adaptive => self.controller.lock().current(),
            DifficultyMode::Fixed { value } => value.clamp(0.0, 1.0),
        }
    }

    /// React to a detector event: a trigger opens a puzzle when automatic
    /// activation is on, everything else is a no-op.
    pub async fn handle_event(
        &self,
        event: &DetectorEvent,
    ) -> Result<Option<Puzzle>, WaitError> {
        match event {
            DetectorEvent::TriggerPuzzle if self.settings.auto_activation => {
                Ok(Some(self.next_puzzle().await?))
            }
            _ => Ok(None),
        }
    }

    /// Generate and open the next puzzle from the enabled kinds.
    pub async fn next_puzzle(&self) -> Result<Puzzle, WaitError> {
        let kind = {
            let mut rng = self.rng.lock();
            puzzles::select_random_kind(&self.settings.enabled_kinds, &mut *rng)
        };
        self.puzzle_of_kind(kind).await
    }

    pub async fn puzzle_of_kind(&self, kind: PuzzleKind) -> Result<Puzzle, WaitError> {
        let difficulty = self.difficulty();
        let puzzle = {
            let mut rng = self.rng.lock();
            puzzles::generate(kind, difficulty, &mut *rng)
        };
        self.storage
            .save_session(&PuzzleSession {
                id: puzzle.id.clone(),
                kind: puzzle.kind,
                started_at: Utc::now(),
            })
            .await?;
        debug!(
            target: "session.coordinator",
            kind = %puzzle.kind,
            difficulty,
            "puzzle issued"
        );
        Ok(puzzle)
    }

    /// Check an answer and close the session: the outcome feeds the
    /// controller (when adaptive) and progress, streak and the controller
    /// snapshot are persisted.
    pub async fn report_answer(
        &self,
        puzzle: &Puzzle,
        input: &str,
        time_spent: Duration,
    ) -> Result<OutcomeReport, WaitError> {
        let verdict = puzzle.check_text(input);
        self.record_outcome(puzzle.kind, verdict, time_spent, puzzle.expected_time)
            .await
    }

    /// Close the session without an answer; counts as an incorrect outcome.
    pub async fn report_abandoned(
        &self,
        puzzle: &Puzzle,
        time_spent: Duration,
    ) -> Result<OutcomeReport, WaitError> {
        self.record_outcome(puzzle.kind, Verdict::default(), time_spent, puzzle.expected_time)
            .await
    }

    async fn record_outcome(
        &self,
        kind: PuzzleKind,
        verdict: Verdict,
        time_spent: Duration,
        expected_time: Duration,
    ) -> Result<OutcomeReport, WaitError> {
        if self.settings.difficulty_mode == DifficultyMode::Adaptive {
            let snapshot = {
                let mut controller = self.controller.lock();
                controller.update(verdict.correct, time_spent, expected_time);
                controller.snapshot()
            };
            self.storage.save_difficulty(&snapshot).await?;
        }

        let mut progress = self.storage.load_progress().await?;
        progress.record_attempt(kind, verdict.correct, time_spent, Utc::now());
        self.storage.save_progress(&progress).await?;
        self.storage.clear_session().await?;

        let next_difficulty = self.difficulty();
        info!(
            target: "session.coordinator",
            kind = %kind,
            correct = verdict.correct,
            next_difficulty,
            "outcome recorded"
        );
        Ok(OutcomeReport {
            verdict,
            next_difficulty,
            streak_days: progress.streak_days,
        })
    }
}
