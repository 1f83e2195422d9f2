//! Material change detection between scene snapshots.
//!
//! The drawing surface reports a change on every re-render, including ones
//! whose only difference is floating-point noise in coordinates. These
//! checks decide whether a snapshot is worth persisting.

use crate::element::SceneElement;
use std::collections::HashMap;

/// Position and size deltas at or below this are render jitter. The check is
/// a strict comparison on the computed `f64` difference.
pub const GEOMETRY_TOLERANCE: f64 = 0.01;

/// Whether `current` differs materially from `previous`.
pub fn has_changed(previous: &[SceneElement], current: &[SceneElement]) -> bool {
    has_changed_with_tolerance(previous, current, GEOMETRY_TOLERANCE)
}

/// [`has_changed`] with an explicit geometry tolerance.
///
/// Stops at the first difference found. Duplicate identifiers in either
/// snapshot always count as a change.
pub fn has_changed_with_tolerance(
    previous: &[SceneElement],
    current: &[SceneElement],
    tolerance: f64,
) -> bool {
    if previous.len() != current.len() {
        log::debug!(
            "Scene changed: element count {} -> {}",
            previous.len(),
            current.len()
        );
        return true;
    }

    let previous_by_id = index_by_id(previous);
    let current_by_id = index_by_id(current);

    if previous_by_id.len() != current_by_id.len() {
        log::warn!("Snapshot contains duplicate element ids, treating as changed");
        return true;
    }

    for (id, current_element) in &current_by_id {
        let Some(previous_element) = previous_by_id.get(id) else {
            log::debug!("Scene changed: new element {}", id);
            return true;
        };

        if element_changed(previous_element, current_element, tolerance) {
            log::debug!("Scene changed: element {} modified", id);
            return true;
        }
    }

    false
}

fn index_by_id(elements: &[SceneElement]) -> HashMap<&str, &SceneElement> {
    elements
        .iter()
        .map(|element| (element.id.as_str(), element))
        .collect()
}

fn element_changed(previous: &SceneElement, current: &SceneElement, tolerance: f64) -> bool {
    if previous.version != current.version || previous.is_deleted != current.is_deleted {
        return true;
    }

    let moved =
        exceeds(previous.x, current.x, tolerance) || exceeds(previous.y, current.y, tolerance);
    let resized = exceeds(previous.width, current.width, tolerance)
        || exceeds(previous.height, current.height, tolerance);

    moved || resized
}

fn exceeds(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() > tolerance
}
