//! Runtime module - threads and the host-facing engine
//!
//! - `worker` - the outline build thread and the build pipeline it runs
//! - `engine` - `OutlineEngine`, which drives `update` and performs commands

mod engine;
mod worker;

pub use engine::{BuildTicket, EngineError, OutlineEngine};
pub use worker::{run_build, BuildJob, OutlineWorker};
