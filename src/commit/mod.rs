// src/commit/mod.rs
mod policy;
mod signal;

pub use policy::should_commit;
pub use signal::{signal_line, write_github_output, CommitSink, SignalError, StepOutput, OUTPUT_KEY};
