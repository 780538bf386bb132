//! Per-platform selector profiles.
//!
//! Plain configuration records keyed by [`Platform`]; adding a platform
//! means adding a table entry, not a type. Patterns a probe cannot parse
//! (e.g. the `:has(...)` entries) simply never match — the sampling loop
//! swallows them.

use waitwise_core_types::Platform;

/// Signal groups used to infer "generating a response" for one platform.
/// Every group is optional; a missing group contributes nothing.
#[derive(Clone, Copy, Debug)]
pub struct SelectorProfile {
    /// Loading if ANY of these matches: a visible stop/cancel affordance.
    pub stop_button: &'static [&'static str],
    /// Marker class present while tokens stream in.
    pub streaming_class: Option<&'static str>,
    /// Spinner / shimmer style indicators.
    pub loading_indicator: &'static [&'static str],
    /// Submit control disabled while the model responds.
    pub send_button_disabled: Option<&'static str>,
}

const CHATGPT: SelectorProfile = SelectorProfile {
    stop_button: &[
        r#"button[aria-label="Stop generating"]"#,
        r#"button[aria-label*="Stop"]"#,
        r#"button[data-testid="stop-button"]"#,
        r#"button[data-testid="fruitjuice-stop-button"]"#,
        // Unsupported by the matcher; kept for probes with a fuller engine.
        r#"button:has(svg):not([disabled])"#,
    ],
    streaming_class: Some("result-streaming"),
    loading_indicator: &[],
    send_button_disabled: Some(
        r#"button[data-testid="send-button"]:disabled, button[data-testid="fruitjuice-send-button"]:disabled"#,
    ),
};

const CLAUDE: SelectorProfile = SelectorProfile {
    stop_button: &[
        r#"button[aria-label*="Stop" i]"#,
        r#"button[aria-label*="Cancel" i]"#,
        r#"button[title*="Stop" i]"#,
        r#"button.stop-button"#,
    ],
    streaming_class: None,
    loading_indicator: &[
        r#"[class*="loading" i]"#,
        r#"[class*="thinking" i]"#,
        r#"[class*="generating" i]"#,
    ],
    send_button_disabled: Some(r#"button[type="submit"]:disabled, button[disabled]"#),
};

const GEMINI: SelectorProfile = SelectorProfile {
    stop_button: &[r#"button[aria-label*="Stop" i]"#],
    streaming_class: None,
    loading_indicator: &[
        r#".loading-line"#,
        r#"[class*="animate-loading" i]"#,
        r#"[class*="response-loading" i]"#,
        r#"[class*="generating" i]"#,
    ],
    send_button_disabled: Some(r#"button[disabled]"#),
};

const DEEPSEEK: SelectorProfile = SelectorProfile {
    stop_button: &[
        r#"button[aria-label*="Stop" i]"#,
        r#"button[title*="Stop" i]"#,
    ],
    streaming_class: Some("streaming"),
    loading_indicator: &[],
    send_button_disabled: Some(r#"button[type="submit"]:disabled"#),
};

const PERPLEXITY: SelectorProfile = SelectorProfile {
    stop_button: &[r#"button[aria-label*="Stop" i]"#],
    streaming_class: None,
    loading_indicator: &[r#"[class*="loading" i]"#, r#"[class*="searching" i]"#],
    send_button_disabled: Some(r#"button[disabled]"#),
};

const GENERIC: SelectorProfile = SelectorProfile {
    stop_button: &[r#"button[aria-label*="Stop" i]"#],
    streaming_class: None,
    loading_indicator: &[r#"[class*="loading" i]"#],
    send_button_disabled: Some(r#"button:disabled"#),
};

impl SelectorProfile {
    pub fn for_platform(platform: Platform) -> &'static SelectorProfile {
        match platform {
            Platform::ChatGpt => &CHATGPT,
            Platform::Claude => &CLAUDE,
            Platform::Gemini => &GEMINI,
            Platform::DeepSeek => &DEEPSEEK,
            Platform::Perplexity => &PERPLEXITY,
            Platform::Generic => &GENERIC,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::Matcher;

    #[test]
    fn every_platform_has_a_profile_with_a_stop_signal() {
        for platform in Platform::ALL {
            let profile = SelectorProfile::for_platform(platform);
            assert!(
                !profile.stop_button.is_empty(),
                "{platform} profile has no stop-button patterns"
            );
        }
    }

    #[test]
    fn profile_patterns_parse_except_flagged_ones() {
        let mut unsupported = 0;
        for platform in Platform::ALL {
            let profile = SelectorProfile::for_platform(platform);
            let mut all: Vec<&str> = profile.stop_button.to_vec();
            all.extend(profile.loading_indicator);
            if let Some(p) = profile.send_button_disabled {
                all.push(p);
            }
            for pattern in all {
                if Matcher::parse(pattern).is_err() {
                    unsupported += 1;
                }
            }
        }
        // Only the chatgpt `:has(...)` entry falls outside the matcher.
        assert_eq!(unsupported, 1);
    }
}
