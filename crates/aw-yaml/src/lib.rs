//! YAML emitter (spec §4.8, component C8): turns a built [`aw_model::WorkflowData`]
//! and its planned [`aw_jobs::JobPlan`] into the final `.lock.yml` text.

mod banner;
mod emit;
mod ordering;
mod postprocess;

pub use banner::{ImportRecord, PromptComponent, render_banner};
pub use emit::{EmitContext, emit};
pub use ordering::{JOB_ORDER, STEP_ORDER, TOP_LEVEL_ORDER, reorder};
pub use postprocess::postprocess;
