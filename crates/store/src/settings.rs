//! User-facing settings with forgiving deserialization: unknown fields are
//! ignored and missing ones take their defaults, so older store files keep
//! loading after upgrades.

use serde::{Deserialize, Serialize};

use waitwise_core_types::{Platform, PuzzleKind};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum DifficultyMode {
    /// Difficulty follows the adaptive controller.
    Adaptive,
    /// Difficulty pinned to a fixed value.
    Fixed { value: f64 },
}

impl Default for DifficultyMode {
    fn default() -> Self {
        Self::Adaptive
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Start watching for loading states as soon as a session opens.
    pub auto_activation: bool,
    /// Minimum loading time before a puzzle is offered, in milliseconds.
    pub trigger_delay_ms: u64,
    pub enabled_kinds: Vec<PuzzleKind>,
    pub difficulty_mode: DifficultyMode,
    pub enabled_platforms: Vec<Platform>,
    pub sound_effects: bool,
    pub streak_notifications: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_activation: true,
            trigger_delay_ms: 2_500,
            enabled_kinds: PuzzleKind::ALL.to_vec(),
            difficulty_mode: DifficultyMode::default(),
            enabled_platforms: Platform::ALL.to_vec(),
            sound_effects: false,
            streak_notifications: true,
        }
    }
}

impl Settings {
    pub fn platform_enabled(&self, platform: Platform) -> bool {
        self.enabled_platforms.contains(&platform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_everything() {
        let settings = Settings::default();
        assert!(settings.auto_activation);
        assert_eq!(settings.trigger_delay_ms, 2_500);
        assert_eq!(settings.enabled_kinds.len(), PuzzleKind::ALL.len());
        assert_eq!(settings.difficulty_mode, DifficultyMode::Adaptive);
        assert!(settings.platform_enabled(Platform::Claude));
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"trigger_delay_ms": 1000, "sound_effects": true}"#).unwrap();
        assert_eq!(settings.trigger_delay_ms, 1_000);
        assert!(settings.sound_effects);
        assert!(settings.auto_activation);
        assert!(settings.streak_notifications);
    }

    #[test]
    fn difficulty_mode_round_trips() {
        let fixed = DifficultyMode::Fixed { value: 0.4 };
        let raw = serde_json::to_string(&fixed).unwrap();
        assert_eq!(serde_json::from_str::<DifficultyMode>(&raw).unwrap(), fixed);
    }
}
