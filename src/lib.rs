//! Waitwise: cognitive micro-puzzles while AI chat responses stream.
//!
//! The detection kernel lives in the member crates; this crate adds the
//! session coordinator and the CLI surface.

pub mod cli;
pub mod session;

pub use session::{OutcomeReport, SessionCoordinator};
