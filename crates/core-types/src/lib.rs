use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Shared error type for the waitwise kernel crates.
#[derive(Debug, Error, Clone)]
pub enum WaitError {
    #[error("{message}")]
    Message { message: String },
}

impl WaitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

/// Chat platform the detector is attached to. Chosen once from the page
/// host name at construction and immutable afterwards.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    ChatGpt,
    Claude,
    Gemini,
    DeepSeek,
    Perplexity,
    Generic,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::ChatGpt,
        Platform::Claude,
        Platform::Gemini,
        Platform::DeepSeek,
        Platform::Perplexity,
        Platform::Generic,
    ];

    /// Classify a page host name. Unknown hosts map to `Generic`.
    pub fn from_host(host: &str) -> Self {
        let host = host.to_ascii_lowercase();
        if host.contains("chatgpt") || host.contains("openai") {
            Platform::ChatGpt
        } else if host.contains("claude") {
            Platform::Claude
        } else if host.contains("gemini") {
            Platform::Gemini
        } else if host.contains("deepseek") {
            Platform::DeepSeek
        } else if host.contains("perplexity") {
            Platform::Perplexity
        } else {
            Platform::Generic
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Platform::ChatGpt => "chatgpt",
            Platform::Claude => "claude",
            Platform::Gemini => "gemini",
            Platform::DeepSeek => "deepseek",
            Platform::Perplexity => "perplexity",
            Platform::Generic => "generic",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The puzzle families waitwise can serve while a response streams.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleKind {
    Riddle,
    QuickMath,
    WordAnagram,
    WordLadder,
    PatternRecognition,
}

impl PuzzleKind {
    pub const ALL: [PuzzleKind; 5] = [
        PuzzleKind::Riddle,
        PuzzleKind::QuickMath,
        PuzzleKind::WordAnagram,
        PuzzleKind::WordLadder,
        PuzzleKind::PatternRecognition,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PuzzleKind::Riddle => "riddle",
            PuzzleKind::QuickMath => "quick_math",
            PuzzleKind::WordAnagram => "word_anagram",
            PuzzleKind::WordLadder => "word_ladder",
            PuzzleKind::PatternRecognition => "pattern_recognition",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PuzzleKind::Riddle => "Riddle",
            PuzzleKind::QuickMath => "Quick Math",
            PuzzleKind::WordAnagram => "Word Anagram",
            PuzzleKind::WordLadder => "Word Ladder",
            PuzzleKind::PatternRecognition => "Pattern Recognition",
        }
    }
}

impl fmt::Display for PuzzleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PuzzleId(pub String);

impl PuzzleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for PuzzleId {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_classification_matches_known_platforms() {
        assert_eq!(Platform::from_host("chatgpt.com"), Platform::ChatGpt);
        assert_eq!(Platform::from_host("chat.openai.com"), Platform::ChatGpt);
        assert_eq!(Platform::from_host("claude.ai"), Platform::Claude);
        assert_eq!(Platform::from_host("gemini.google.com"), Platform::Gemini);
        assert_eq!(Platform::from_host("chat.deepseek.com"), Platform::DeepSeek);
        assert_eq!(Platform::from_host("www.perplexity.ai"), Platform::Perplexity);
        assert_eq!(Platform::from_host("example.com"), Platform::Generic);
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(Platform::from_host("Claude.AI"), Platform::Claude);
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
        assert_ne!(PuzzleId::new(), PuzzleId::new());
    }
}
