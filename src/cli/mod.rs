pub mod reset;
pub mod runtime;
pub mod solve;
pub mod stats;
pub mod watch;

pub use reset::{cmd_reset, ResetArgs};
pub use solve::{cmd_solve, SolveArgs};
pub use stats::cmd_stats;
pub use watch::{cmd_watch, WatchArgs};
