pub mod detector;
pub mod errors;
pub mod probe;
pub mod profile;
pub mod runner;
pub mod selector;

pub use detector::{DetectorConfig, DetectorEvent, LoadingDetector};
pub use errors::{ProbeError, SelectorError};
pub use probe::{DomProbe, ElementRecord, PageSnapshot, ScriptedProbe, SnapshotProbe};
pub use profile::SelectorProfile;
pub use runner::{DetectorCallbacks, DetectorRunner};
pub use selector::Matcher;
