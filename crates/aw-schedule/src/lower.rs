//! Applies [`fuzzy::resolve_schedule`] and [`stop_after::resolve_stop_after`]
//! to every event in a built [`WorkflowData`] (component C5, spec §4.5).

use aw_core::diag::{Diagnostic, Diagnostics};
use aw_model::WorkflowData;
use chrono::Utc;

use crate::fuzzy::resolve_schedule;
use crate::stop_after::resolve_stop_after;

/// Lower every `schedule:` event's fuzzy expression to a concrete cron
/// string, and every `stop-after:` expression to an absolute instant
/// (stored back as an RFC 3339 string on the event, ready for the `if:`
/// guard C6 builds for the activation job).
pub fn lower_schedules(data: &mut WorkflowData, diagnostics: &mut Diagnostics) {
    let path = data.source_path.clone();
    for event in &mut data.on {
        if let Some(raw) = event.raw_schedule.clone() {
            match resolve_schedule(&raw, &path) {
                Ok(cron) => event.cron = Some(cron),
                Err(err) => {
                    diagnostics.push(Diagnostic::error("schedule-error", err.to_string()).with_file(&path));
                }
            }
        }
        if let Some(raw) = event.stop_after.clone() {
            match resolve_stop_after(&raw, Utc::now()) {
                Ok(resolved) => event.stop_after = Some(resolved.to_rfc3339()),
                Err(err) => {
                    diagnostics.push(Diagnostic::error("schedule-error", err.to_string()).with_file(&path));
                }
            }
        }
    }
}
