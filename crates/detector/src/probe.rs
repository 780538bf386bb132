//! DOM inspection as an injected capability.
//!
//! The detector never touches a page directly; it asks a [`DomProbe`] two
//! questions: "does anything match this pattern?" and "is there a short,
//! visible piece of text containing this substring?". That keeps the
//! debounce and edge-detection logic unit-testable without a browser, and
//! confines every page-shaped dependency to probe implementations.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::errors::ProbeError;
use crate::selector::Matcher;

/// Read-only view of one rendered element, as much of it as the matcher
/// needs: tag, classes, attributes, text content and the rendered box.
#[derive(Clone, Debug, Default)]
pub struct ElementRecord {
    pub tag: String,
    pub classes: Vec<String>,
    pub attrs: HashMap<String, String>,
    pub text: String,
    pub width: f32,
    pub height: f32,
    pub disabled: bool,
}

impl ElementRecord {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Attribute lookup as the matcher sees it: `class` reflects the class
    /// list, `disabled` is present whenever the element is disabled.
    pub fn attr(&self, name: &str) -> Option<String> {
        match name {
            "class" if !self.classes.is_empty() => Some(self.classes.join(" ")),
            "disabled" if self.disabled => Some(String::new()),
            _ => self.attrs.get(name).cloned(),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Flat snapshot of the elements currently rendered on a page.
#[derive(Clone, Debug, Default)]
pub struct PageSnapshot {
    pub elements: Vec<ElementRecord>,
}

impl PageSnapshot {
    pub fn new(elements: Vec<ElementRecord>) -> Self {
        Self { elements }
    }
}

/// Capability interface the detector samples through.
///
/// Implementations must be cheap to call several times per evaluation and
/// must surface pattern problems as `Err` rather than panicking; the
/// detector maps every error to "did not match".
pub trait DomProbe: Send + Sync {
    /// Does any rendered element match the query pattern?
    fn exists(&self, pattern: &str) -> Result<bool, ProbeError>;

    /// Is there a visible element (non-zero rendered box) whose text is
    /// shorter than `max_len` and contains `needle` case-insensitively?
    /// Short-circuits on the first qualifying element.
    fn short_visible_text_contains(&self, needle: &str, max_len: usize)
        -> Result<bool, ProbeError>;
}

/// Probe over an in-memory [`PageSnapshot`]. Used by tests and by the CLI
/// page simulator; a real-browser probe would implement the same trait over
/// a live document.
pub struct SnapshotProbe {
    snapshot: RwLock<PageSnapshot>,
}

impl SnapshotProbe {
    pub fn new(snapshot: PageSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
        }
    }

    pub fn empty() -> Self {
        Self::new(PageSnapshot::default())
    }

    /// Swap in a new rendered state, e.g. between simulated frames.
    pub fn set_snapshot(&self, snapshot: PageSnapshot) {
        *self.snapshot.write() = snapshot;
    }
}

// Only div/span/p text is scanned for the thinking heuristic; status lines
// on the supported platforms render as one of these.
const TEXT_SCAN_TAGS: [&str; 3] = ["div", "span", "p"];

impl DomProbe for SnapshotProbe {
    fn exists(&self, pattern: &str) -> Result<bool, ProbeError> {
        let matcher = Matcher::parse(pattern)?;
        let snapshot = self.snapshot.read();
        Ok(snapshot.elements.iter().any(|el| matcher.matches(el)))
    }

    fn short_visible_text_contains(
        &self,
        needle: &str,
        max_len: usize,
    ) -> Result<bool, ProbeError> {
        let needle = needle.to_ascii_lowercase();
        let snapshot = self.snapshot.read();
        Ok(snapshot.elements.iter().any(|el| {
            TEXT_SCAN_TAGS.contains(&el.tag.as_str())
                && el.text.len() < max_len
                && el.is_visible()
                && el.text.to_ascii_lowercase().contains(&needle)
        }))
    }
}

/// Probe that answers every pattern query with a single scripted flag.
/// Lets state-machine tests drive loading/idle sequences without building
/// page snapshots.
pub struct ScriptedProbe {
    loading: AtomicBool,
}

impl ScriptedProbe {
    pub fn new(loading: bool) -> Self {
        Self {
            loading: AtomicBool::new(loading),
        }
    }

    pub fn set_loading(&self, loading: bool) {
        self.loading.store(loading, Ordering::SeqCst);
    }
}

impl DomProbe for ScriptedProbe {
    fn exists(&self, _pattern: &str) -> Result<bool, ProbeError> {
        Ok(self.loading.load(Ordering::SeqCst))
    }

    fn short_visible_text_contains(
        &self,
        _needle: &str,
        _max_len: usize,
    ) -> Result<bool, ProbeError> {
        Ok(false)
    }
}
