use crate::common::types::FlareEvent;
use crate::pipeline::severity::SeverityRange;
use tracing::{debug, warn};

/// Keeps events whose magnitude lies within the range, inclusive at both ends.
///
/// Input order is preserved. An inverted range selects nothing.
pub fn select(events: &[FlareEvent], range: &SeverityRange) -> Vec<FlareEvent> {
    if range.is_inverted() {
        warn!(
            "Severity range {}..{} is inverted; no events will be selected",
            range.min, range.max
        );
    }

    let selected: Vec<FlareEvent> = events
        .iter()
        .filter(|event| range.contains(&event.class))
        .cloned()
        .collect();

    debug!(
        "Selected {} of {} events in range {}..{}",
        selected.len(),
        events.len(),
        range.min,
        range.max
    );
    selected
}
