//! Lifetime progress: solve counts, per-kind stats and the daily streak.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use waitwise_core_types::PuzzleKind;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindStats {
    pub attempted: u64,
    pub solved: u64,
    /// Running average solve time, updated incrementally.
    pub average_time_ms: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    pub total_attempted: u64,
    pub total_solved: u64,
    /// Consecutive days with at least one attempt.
    pub streak_days: u32,
    pub last_played: Option<DateTime<Utc>>,
    pub per_kind: BTreeMap<PuzzleKind, KindStats>,
}

impl Progress {
    /// Record one attempt. The streak grows on the first attempt of a day
    /// that directly follows the previous played day, resets after a gap,
    /// and is untouched by further attempts on the same day.
    pub fn record_attempt(
        &mut self,
        kind: PuzzleKind,
        correct: bool,
        time_spent: Duration,
        now: DateTime<Utc>,
    ) {
        self.total_attempted += 1;
        if correct {
            self.total_solved += 1;
        }

        let stats = self.per_kind.entry(kind).or_default();
        stats.attempted += 1;
        if correct {
            stats.solved += 1;
        }
        let t = time_spent.as_millis() as f64;
        stats.average_time_ms += (t - stats.average_time_ms) / stats.attempted as f64;

        self.streak_days = match self.last_played {
            None => 1,
            Some(last) => {
                let gap = now.date_naive() - last.date_naive();
                match gap.num_days() {
                    0 => self.streak_days,
                    1 => self.streak_days + 1,
                    _ => 1,
                }
            }
        };
        self.last_played = Some(now);
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_attempted == 0 {
            return 0.0;
        }
        self.total_solved as f64 / self.total_attempted as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn first_attempt_starts_the_streak() {
        let mut progress = Progress::default();
        progress.record_attempt(PuzzleKind::Riddle, true, Duration::from_secs(30), day(1));
        assert_eq!(progress.streak_days, 1);
        assert_eq!(progress.total_solved, 1);
    }

    #[test]
    fn consecutive_days_extend_the_streak() {
        let mut progress = Progress::default();
        progress.record_attempt(PuzzleKind::Riddle, true, Duration::from_secs(30), day(1));
        progress.record_attempt(PuzzleKind::Riddle, false, Duration::from_secs(30), day(2));
        progress.record_attempt(PuzzleKind::QuickMath, true, Duration::from_secs(10), day(3));
        assert_eq!(progress.streak_days, 3);
    }

    #[test]
    fn same_day_leaves_the_streak_alone() {
        let mut progress = Progress::default();
        progress.record_attempt(PuzzleKind::Riddle, true, Duration::from_secs(30), day(1));
        progress.record_attempt(PuzzleKind::Riddle, true, Duration::from_secs(30), day(1));
        assert_eq!(progress.streak_days, 1);
    }

    #[test]
    fn a_gap_resets_the_streak_to_one() {
        let mut progress = Progress::default();
        progress.record_attempt(PuzzleKind::Riddle, true, Duration::from_secs(30), day(1));
        progress.record_attempt(PuzzleKind::Riddle, true, Duration::from_secs(30), day(2));
        progress.record_attempt(PuzzleKind::Riddle, true, Duration::from_secs(30), day(9));
        assert_eq!(progress.streak_days, 1);
    }

    #[test]
    fn per_kind_average_is_a_running_mean() {
        let mut progress = Progress::default();
        progress.record_attempt(PuzzleKind::QuickMath, true, Duration::from_secs(10), day(1));
        progress.record_attempt(PuzzleKind::QuickMath, true, Duration::from_secs(30), day(1));
        let stats = progress.per_kind[&PuzzleKind::QuickMath];
        assert_eq!(stats.attempted, 2);
        assert!((stats.average_time_ms - 20_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn progress_round_trips_through_json() {
        let mut progress = Progress::default();
        progress.record_attempt(PuzzleKind::WordAnagram, false, Duration::from_secs(45), day(5));
        let raw = serde_json::to_string(&progress).unwrap();
        assert_eq!(serde_json::from_str::<Progress>(&raw).unwrap(), progress);
    }
}
