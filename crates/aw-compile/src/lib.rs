//! Orchestration layer wiring C1 through C9 (spec §2, §6): the single
//! `compile` entry point a CLI or test harness calls.

mod file;
mod options;
mod pipeline;

pub use file::compile_file;
pub use options::CompileOptions;
pub use pipeline::{CompiledWorkflow, compile};
