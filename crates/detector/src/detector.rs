//! Debounced loading-state machine.
//!
//! [`LoadingDetector::poll`] is a pure-ish step function: hand it a probe and
//! the current instant, get back at most one event. The runner drives it from
//! a timer; tests drive it with synthetic instants.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, trace};

use waitwise_core_types::Platform;

use crate::probe::DomProbe;
use crate::profile::SelectorProfile;

/// Events with per-episode ordering: `LoadingStarted`, at most one
/// `TriggerPuzzle`, then exactly one `LoadingComplete`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetectorEvent {
    LoadingStarted,
    LoadingComplete { duration: Duration },
    TriggerPuzzle,
}

#[derive(Clone, Copy, Debug)]
pub struct DetectorConfig {
    /// Loading must persist this long before a puzzle is surfaced; quick
    /// responses should not interrupt the user.
    pub min_trigger_delay: Duration,
    /// Floor between two DOM scans. The driving loop may tick faster; polls
    /// inside the window are no-ops.
    pub check_interval: Duration,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_trigger_delay: Duration::from_millis(1500),
            check_interval: Duration::from_millis(250),
        }
    }
}

/// Patterns suggesting an extended-thinking affordance, checked on every
/// platform in addition to its profile.
const THINKING_PATTERNS: [&str; 3] = [
    r#"[class*="thinking" i]"#,
    r#"[aria-label*="Thinking" i]"#,
    r#"[data-extended="true"]"#,
];

/// Some platforms render thinking status as bare text; any visible element
/// with text under this length containing "thinking" counts as a signal.
const THINKING_TEXT_MAX_LEN: usize = 100;
const THINKING_NEEDLE: &str = "thinking";

pub struct LoadingDetector {
    platform: Platform,
    profile: &'static SelectorProfile,
    config: DetectorConfig,
    is_loading: bool,
    loading_start: Option<Instant>,
    puzzle_triggered: bool,
    last_check: Option<Instant>,
}

impl LoadingDetector {
    pub fn new(platform: Platform) -> Self {
        Self::with_config(platform, DetectorConfig::default())
    }

    pub fn with_config(platform: Platform, config: DetectorConfig) -> Self {
        debug!(
            target: "waitwise.detector",
            %platform,
            "detector initialized"
        );
        Self {
            platform,
            profile: SelectorProfile::for_platform(platform),
            config,
            is_loading: false,
            loading_start: None,
            puzzle_triggered: false,
            last_check: None,
        }
    }

    /// Construct from a page host name, classifying the platform once.
    pub fn from_host(host: &str) -> Self {
        Self::new(Platform::from_host(host))
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn min_trigger_delay(&self) -> Duration {
        self.config.min_trigger_delay
    }

    /// Live configuration update. Applies to the in-progress episode and all
    /// future ones; an episode whose trigger already fired is not re-fired.
    pub fn set_min_trigger_delay(&mut self, delay: Duration) {
        debug!(
            target: "waitwise.detector",
            delay_ms = delay.as_millis() as u64,
            "trigger delay updated"
        );
        self.config.min_trigger_delay = delay;
    }

    /// Evaluate one pattern, treating any probe failure as a non-match.
    fn check(&self, probe: &dyn DomProbe, pattern: &str) -> bool {
        match probe.exists(pattern) {
            Ok(hit) => hit,
            Err(err) => {
                trace!(
                    target: "waitwise.detector",
                    pattern,
                    %err,
                    "pattern skipped"
                );
                false
            }
        }
    }

    fn extended_thinking(&self, probe: &dyn DomProbe) -> bool {
        if THINKING_PATTERNS
            .iter()
            .any(|pattern| self.check(probe, pattern))
        {
            return true;
        }
        match probe.short_visible_text_contains(THINKING_NEEDLE, THINKING_TEXT_MAX_LEN) {
            Ok(hit) => hit,
            Err(err) => {
                trace!(target: "waitwise.detector", %err, "text scan skipped");
                false
            }
        }
    }

    /// The sampling predicate: OR over the profile's signal groups plus the
    /// extended-thinking heuristic. Read-only; never mutates the page.
    pub fn sample(&self, probe: &dyn DomProbe) -> bool {
        let profile = self.profile;

        let stop_button = profile
            .stop_button
            .iter()
            .any(|pattern| self.check(probe, pattern));

        let streaming = profile
            .streaming_class
            .map(|class| self.check(probe, &format!(".{class}")))
            .unwrap_or(false);

        let loading = profile
            .loading_indicator
            .iter()
            .any(|pattern| self.check(probe, pattern));

        let send_disabled = profile
            .send_button_disabled
            .map(|pattern| self.check(probe, pattern))
            .unwrap_or(false);

        stop_button || streaming || loading || send_disabled || self.extended_thinking(probe)
    }

    /// One evaluation step. Returns the event for any state transition, or
    /// `None` in steady state or while inside the throttle window.
    pub fn poll(&mut self, probe: &dyn DomProbe, now: Instant) -> Option<DetectorEvent> {
        if let Some(last) = self.last_check {
            if now.duration_since(last) < self.config.check_interval {
                return None;
            }
        }
        self.last_check = Some(now);

        let now_loading = self.sample(probe);

        if now_loading && !self.is_loading {
            self.is_loading = true;
            self.loading_start = Some(now);
            self.puzzle_triggered = false;
            debug!(target: "waitwise.detector", platform = %self.platform, "loading started");
            Some(DetectorEvent::LoadingStarted)
        } else if !now_loading && self.is_loading {
            let duration = self
                .loading_start
                .take()
                .map(|start| now.duration_since(start))
                .unwrap_or_default();
            self.is_loading = false;
            debug!(
                target: "waitwise.detector",
                duration_ms = duration.as_millis() as u64,
                "loading complete"
            );
            Some(DetectorEvent::LoadingComplete { duration })
        } else if now_loading && !self.puzzle_triggered {
            let elapsed = self
                .loading_start
                .map(|start| now.duration_since(start))
                .unwrap_or_default();
            if elapsed >= self.config.min_trigger_delay {
                self.puzzle_triggered = true;
                debug!(
                    target: "waitwise.detector",
                    elapsed_ms = elapsed.as_millis() as u64,
                    "puzzle trigger"
                );
                Some(DetectorEvent::TriggerPuzzle)
            } else {
                None
            }
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProbeError;
    use crate::probe::{DomProbe, ElementRecord, PageSnapshot, ScriptedProbe, SnapshotProbe};

    const TICK: Duration = Duration::from_millis(250);

    fn detector() -> LoadingDetector {
        LoadingDetector::new(Platform::Generic)
    }

    /// Probe whose every query fails, exercising the error policy.
    struct BrokenProbe;

    impl DomProbe for BrokenProbe {
        fn exists(&self, _pattern: &str) -> Result<bool, ProbeError> {
            Err(ProbeError::internal("boom"))
        }

        fn short_visible_text_contains(
            &self,
            _needle: &str,
            _max_len: usize,
        ) -> Result<bool, ProbeError> {
            Err(ProbeError::internal("boom"))
        }
    }

    #[test]
    fn edge_triggering_fires_one_start_and_one_complete() {
        let mut det = detector();
        let probe = ScriptedProbe::new(false);
        let base = Instant::now();

        // [false, true, true, true, false] sampled once per tick.
        let script = [false, true, true, true, false];
        let mut events = Vec::new();
        for (i, loading) in script.iter().enumerate() {
            probe.set_loading(*loading);
            if let Some(ev) = det.poll(&probe, base + TICK * i as u32) {
                events.push(ev);
            }
        }

        assert_eq!(
            events,
            vec![
                DetectorEvent::LoadingStarted,
                DetectorEvent::LoadingComplete {
                    duration: TICK * 3
                },
            ]
        );
        assert!(!det.is_loading());
    }

    #[test]
    fn one_trigger_per_episode() {
        let mut det = detector();
        let probe = ScriptedProbe::new(true);
        let base = Instant::now();

        // 5000ms episode sampled every 250ms, min delay 1500ms.
        let mut triggers = Vec::new();
        for i in 0..20 {
            let now = base + TICK * i;
            if det.poll(&probe, now) == Some(DetectorEvent::TriggerPuzzle) {
                triggers.push(now.duration_since(base));
            }
        }
        assert_eq!(triggers.len(), 1);
        assert!(triggers[0] >= Duration::from_millis(1500));
    }

    #[test]
    fn live_delay_update_applies_to_current_episode() {
        let mut det = detector();
        let probe = ScriptedProbe::new(true);
        let base = Instant::now();

        assert_eq!(det.poll(&probe, base), Some(DetectorEvent::LoadingStarted));
        assert_eq!(det.poll(&probe, base + TICK), None);

        det.set_min_trigger_delay(Duration::from_millis(500));
        assert_eq!(
            det.poll(&probe, base + TICK * 2),
            Some(DetectorEvent::TriggerPuzzle)
        );
    }

    #[test]
    fn trigger_does_not_refire_after_delay_shrinks_further() {
        let mut det = detector();
        let probe = ScriptedProbe::new(true);
        let base = Instant::now();

        det.poll(&probe, base);
        for i in 1..10 {
            det.poll(&probe, base + TICK * i);
        }
        // Trigger already fired; shrinking the delay must not re-fire it.
        det.set_min_trigger_delay(Duration::from_millis(1));
        assert_eq!(det.poll(&probe, base + TICK * 10), None);
    }

    #[test]
    fn throttle_suppresses_fast_polls() {
        let mut det = detector();
        let probe = ScriptedProbe::new(true);
        let base = Instant::now();

        assert_eq!(det.poll(&probe, base), Some(DetectorEvent::LoadingStarted));
        probe.set_loading(false);
        // Inside the 250ms window: no sampling, no transition.
        assert_eq!(det.poll(&probe, base + Duration::from_millis(100)), None);
        assert!(det.is_loading());
        assert_eq!(
            det.poll(&probe, base + TICK),
            Some(DetectorEvent::LoadingComplete { duration: TICK })
        );
    }

    #[test]
    fn probe_failures_read_as_idle() {
        let mut det = detector();
        assert!(!det.sample(&BrokenProbe));
        assert_eq!(det.poll(&BrokenProbe, Instant::now()), None);
        assert!(!det.is_loading());
    }

    #[test]
    fn stop_resume_keeps_episode_state() {
        // stop() merely halts polling; a later poll resumes the same episode.
        let mut det = detector();
        let probe = ScriptedProbe::new(true);
        let base = Instant::now();

        assert_eq!(det.poll(&probe, base), Some(DetectorEvent::LoadingStarted));
        // Long gap, as if the tab had been hidden.
        let resumed = base + Duration::from_secs(30);
        assert_eq!(det.poll(&probe, resumed), Some(DetectorEvent::TriggerPuzzle));
        probe.set_loading(false);
        assert!(matches!(
            det.poll(&probe, resumed + TICK),
            Some(DetectorEvent::LoadingComplete { .. })
        ));
    }

    #[test]
    fn snapshot_probe_drives_real_profiles() {
        let mut det = LoadingDetector::new(Platform::ChatGpt);
        let probe = SnapshotProbe::empty();
        let base = Instant::now();

        assert_eq!(det.poll(&probe, base), None);

        probe.set_snapshot(PageSnapshot::new(vec![ElementRecord::new("button")
            .with_attr("aria-label", "Stop generating")
            .with_size(32.0, 32.0)]));
        assert_eq!(
            det.poll(&probe, base + TICK),
            Some(DetectorEvent::LoadingStarted)
        );

        probe.set_snapshot(PageSnapshot::default());
        assert_eq!(
            det.poll(&probe, base + TICK * 2),
            Some(DetectorEvent::LoadingComplete { duration: TICK })
        );
    }

    #[test]
    fn claude_stop_button_reads_as_loading() {
        // Claude's patterns carry quoted values and the ` i` flag; a
        // visible stop button must still register.
        let mut det = LoadingDetector::new(Platform::Claude);
        let probe = SnapshotProbe::new(PageSnapshot::new(vec![ElementRecord::new("button")
            .with_attr("aria-label", "stop response")
            .with_size(28.0, 28.0)]));
        assert_eq!(
            det.poll(&probe, Instant::now()),
            Some(DetectorEvent::LoadingStarted)
        );
    }

    #[test]
    fn thinking_text_counts_as_loading_on_any_platform() {
        let mut det = LoadingDetector::new(Platform::DeepSeek);
        let probe = SnapshotProbe::new(PageSnapshot::new(vec![ElementRecord::new("span")
            .with_text("Thinking deeply…")
            .with_size(80.0, 16.0)]));
        assert_eq!(
            det.poll(&probe, Instant::now()),
            Some(DetectorEvent::LoadingStarted)
        );
    }
}
