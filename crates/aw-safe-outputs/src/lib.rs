//! Safe-outputs planner and runtime-request validator (spec §4.7,
//! component C7): plans the handler jobs a `safe-outputs:` block needs
//! at compile time, and validates the JSON-Lines requests an agent
//! writes to `GH_AW_SAFE_OUTPUTS` at run time.

mod planner;
mod request;
mod validate;

pub use planner::{HandlerJob, permissions_for, plan_handlers};
pub use request::{RequestError, SafeOutputRequest, parse_all, parse_line};
pub use validate::{LabelFilterOutcome, ValidationContext, ValidationError, filter_labels, validate};
