//! Replaying recorded drawing-surface notifications through a session.

use serde::Deserialize;
use sketchsync_core::storage::StorageError;
use sketchsync_core::{AppState, BoardStorage, SceneElement, WhiteboardSession};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid event on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid {what} in {path}: {source}")]
    Parse {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode board: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// One recorded `onChange` notification.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    /// Milliseconds since the start of the recording.
    #[serde(default)]
    pub at_ms: u64,
    pub elements: Vec<SceneElement>,
    #[serde(default)]
    pub app_state: AppState,
}

/// Parse a JSON-lines recording. Blank lines are skipped.
pub fn parse_events(input: &str) -> Result<Vec<ChangeEvent>, ReplayError> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| ReplayError::Json {
                line: index + 1,
                source,
            })
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub notifications: usize,
    pub changes: usize,
    pub saves: usize,
}

/// Feed `events` to `session` on a simulated clock starting at `start`.
///
/// Saves that come due between events are dispatched before the next event
/// is delivered; a trailing save is flushed once the last quiet interval
/// has passed.
pub fn replay<S: BoardStorage + 'static>(
    session: &mut WhiteboardSession<S>,
    events: &[ChangeEvent],
    start: Instant,
) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    let mut clock = start;

    for event in events {
        let at = start + Duration::from_millis(event.at_ms);
        if at < clock {
            log::warn!("Event at {}ms is out of order, delivering it late", event.at_ms);
        }
        clock = clock.max(at);

        if let Some(save) = session.tick_at(clock) {
            pollster::block_on(save);
            summary.saves += 1;
        }

        summary.notifications += 1;
        if session.on_change_at(clock, &event.elements, event.app_state.clone()) {
            summary.changes += 1;
        }
    }

    let quiet = clock + session.config().debounce();
    if let Some(save) = session.tick_at(quiet) {
        pollster::block_on(save);
        summary.saves += 1;
    }

    summary
}
