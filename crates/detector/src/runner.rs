//! Cancellable polling loop around [`LoadingDetector`].
//!
//! Stands in for the page's per-frame scheduling primitive: a repeating
//! tokio task with an explicit tick interval. The detector throttles actual
//! sampling to its own check interval, so the frame interval only bounds
//! reaction latency.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use waitwise_event_bus::InMemoryBus;

use crate::detector::{DetectorEvent, LoadingDetector};
use crate::probe::DomProbe;

const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(50);
const BUS_CAPACITY: usize = 64;

/// Optional per-event hooks, mirroring the bus events for callers that want
/// direct callbacks instead of a subscription.
#[derive(Default)]
pub struct DetectorCallbacks {
    pub on_start: Option<Box<dyn Fn() + Send + Sync>>,
    pub on_complete: Option<Box<dyn Fn(Duration) + Send + Sync>>,
    pub on_trigger: Option<Box<dyn Fn() + Send + Sync>>,
}

impl DetectorCallbacks {
    fn fire(&self, event: &DetectorEvent) {
        match event {
            DetectorEvent::LoadingStarted => {
                if let Some(cb) = &self.on_start {
                    cb();
                }
            }
            DetectorEvent::LoadingComplete { duration } => {
                if let Some(cb) = &self.on_complete {
                    cb(*duration);
                }
            }
            DetectorEvent::TriggerPuzzle => {
                if let Some(cb) = &self.on_trigger {
                    cb();
                }
            }
        }
    }
}

pub struct DetectorRunner {
    detector: Arc<Mutex<LoadingDetector>>,
    probe: Arc<dyn DomProbe>,
    bus: Arc<InMemoryBus<DetectorEvent>>,
    callbacks: Arc<DetectorCallbacks>,
    frame_interval: Duration,
    running: Mutex<Option<(CancellationToken, JoinHandle<()>)>>,
}

impl DetectorRunner {
    pub fn new(detector: LoadingDetector, probe: Arc<dyn DomProbe>) -> Self {
        Self::with_callbacks(detector, probe, DetectorCallbacks::default())
    }

    pub fn with_callbacks(
        detector: LoadingDetector,
        probe: Arc<dyn DomProbe>,
        callbacks: DetectorCallbacks,
    ) -> Self {
        Self {
            detector: Arc::new(Mutex::new(detector)),
            probe,
            bus: InMemoryBus::new(BUS_CAPACITY),
            callbacks: Arc::new(callbacks),
            frame_interval: DEFAULT_FRAME_INTERVAL,
            running: Mutex::new(None),
        }
    }

    pub fn set_frame_interval(&mut self, frame_interval: Duration) {
        self.frame_interval = frame_interval.max(Duration::from_millis(1));
    }

    /// Bus carrying every emitted [`DetectorEvent`].
    pub fn bus(&self) -> Arc<InMemoryBus<DetectorEvent>> {
        Arc::clone(&self.bus)
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.detector.lock().is_loading()
    }

    /// Forwarded live configuration update (settings-changed path).
    pub fn update_trigger_delay(&self, delay: Duration) {
        self.detector.lock().set_min_trigger_delay(delay);
    }

    /// Begin polling. Idempotent: calling `start` while the loop is live is
    /// a no-op, never a second loop.
    pub fn start(&self) {
        let mut running = self.running.lock();
        if running.is_some() {
            debug!(target: "waitwise.runner", "start ignored: already running");
            return;
        }

        let token = CancellationToken::new();
        let child = token.clone();
        let detector = Arc::clone(&self.detector);
        let probe = Arc::clone(&self.probe);
        let bus = Arc::clone(&self.bus);
        let callbacks = Arc::clone(&self.callbacks);
        let frame_interval = self.frame_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = interval(frame_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = ticker.tick() => {
                        let event = detector.lock().poll(probe.as_ref(), Instant::now());
                        if let Some(event) = event {
                            callbacks.fire(&event);
                            bus.publish_lossy(event);
                        }
                    }
                }
            }
        });

        info!(target: "waitwise.runner", "detector loop started");
        *running = Some((token, handle));
    }

    /// Cancel the pending tick. Detector state is left untouched, so a later
    /// `start()` resumes the same episode (visibility pause/resume).
    pub fn stop(&self) {
        if let Some((token, _handle)) = self.running.lock().take() {
            token.cancel();
            info!(target: "waitwise.runner", "detector loop stopped");
        }
    }
}

impl Drop for DetectorRunner {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ScriptedProbe;
    use waitwise_core_types::Platform;
    use waitwise_event_bus::EventBus;

    #[tokio::test]
    async fn start_is_idempotent() {
        let probe = Arc::new(ScriptedProbe::new(false));
        let runner = DetectorRunner::new(LoadingDetector::new(Platform::Generic), probe);
        runner.start();
        runner.start();
        assert!(runner.is_running());
        runner.stop();
        assert!(!runner.is_running());
        // Stopping twice is harmless.
        runner.stop();
    }

    #[tokio::test]
    async fn loop_publishes_transitions() {
        let probe = Arc::new(ScriptedProbe::new(false));
        let mut runner = DetectorRunner::new(
            LoadingDetector::with_config(
                Platform::Generic,
                crate::detector::DetectorConfig {
                    min_trigger_delay: Duration::from_millis(40),
                    check_interval: Duration::from_millis(10),
                },
            ),
            Arc::clone(&probe) as Arc<dyn DomProbe>,
        );
        runner.set_frame_interval(Duration::from_millis(5));
        let mut rx = runner.bus().subscribe();

        runner.start();
        probe.set_loading(true);
        assert_eq!(rx.recv().await.unwrap(), DetectorEvent::LoadingStarted);
        assert_eq!(rx.recv().await.unwrap(), DetectorEvent::TriggerPuzzle);
        probe.set_loading(false);
        assert!(matches!(
            rx.recv().await.unwrap(),
            DetectorEvent::LoadingComplete { .. }
        ));
        runner.stop();
    }

    #[tokio::test]
    async fn stop_then_start_resumes_episode() {
        let probe = Arc::new(ScriptedProbe::new(true));
        let mut runner = DetectorRunner::new(
            LoadingDetector::with_config(
                Platform::Generic,
                crate::detector::DetectorConfig {
                    min_trigger_delay: Duration::from_secs(3600),
                    check_interval: Duration::from_millis(5),
                },
            ),
            Arc::clone(&probe) as Arc<dyn DomProbe>,
        );
        runner.set_frame_interval(Duration::from_millis(2));
        let mut rx = runner.bus().subscribe();

        runner.start();
        assert_eq!(rx.recv().await.unwrap(), DetectorEvent::LoadingStarted);
        runner.stop();
        assert!(runner.is_loading());

        // Resume: same episode, so no second LoadingStarted; the completion
        // still carries the full episode duration.
        runner.start();
        probe.set_loading(false);
        assert!(matches!(
            rx.recv().await.unwrap(),
            DetectorEvent::LoadingComplete { .. }
        ));
        runner.stop();
    }
}
