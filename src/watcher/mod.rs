//! Task watching.
//!
//! [`watch`] blocks the calling task until a snapshot of the watched job
//! reaches a finished status, while surfacing progress. It is a two-state
//! machine:
//!
//! ```text
//! WAITING --(matching snapshot, status DONE|ERROR)--> TERMINAL
//!    ^  |
//!    +--+ (non-task event, other job's event, or unfinished snapshot)
//! ```
//!
//! A message that names the watched job but does not decode as a task
//! fails the watch with [`Error::Decode`] rather than being skipped.
//!
//! There is no retry and no reconnection: a dropped channel fails the watch
//! with [`Error::Channel`]. Without [`WatchOptions::max_wait`] the wait is
//! unbounded.

mod channel;
mod progress;

pub use channel::{TaskChannel, WebSocketChannel};
pub use progress::{NoProgress, ProgressBarSink, ProgressSink, RecordingProgress};

use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio::time::Instant;

use crate::error::{Error, Result};
use crate::models::{Task, TaskStatus};

/// Knobs for a single watch. The default is an unbounded wait that stops
/// on `DONE` or `ERROR` only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchOptions {
    /// Give up with [`Error::WatchTimeout`] after this long.
    pub max_wait: Option<Duration>,
    /// Also stop on `INTERRUPTED`.
    pub stop_on_interrupted: bool,
}

impl WatchOptions {
    fn stops_on(&self, status: TaskStatus) -> bool {
        status.is_finished() || (self.stop_on_interrupted && status == TaskStatus::Interrupted)
    }
}

/// Extract the `entity` object of one channel message.
///
/// Messages are JSON envelopes whose `entity` field is the snapshot.
/// Keep-alives and malformed frames yield `None`.
pub fn event_entity(message: &str) -> Option<Value> {
    let mut envelope: Value = serde_json::from_str(message).ok()?;
    match envelope.get_mut("entity")?.take() {
        entity @ Value::Object(_) => Some(entity),
        _ => None,
    }
}

/// The `(id, kind)` pair an event entity belongs to. Entities other than
/// tasks carry no `kind` and yield `None`.
pub fn event_job(entity: &Value) -> Option<(&str, &str)> {
    let id = entity.get("id")?.as_str()?;
    let kind = entity.get("kind")?.as_str()?;
    Some((id, kind))
}

/// Wait until a snapshot of `initial`'s job reaches a stop status.
///
/// Snapshots of other jobs are discarded. Every accepted snapshot is reported
/// to `progress`, and the one that ends the wait is returned. If `initial`
/// itself already has a stop status it is returned without reading the
/// channel.
///
/// The channel is left open; closing it is the caller's job.
pub async fn watch<C, P>(
    initial: Task,
    channel: &mut C,
    progress: &mut P,
    options: WatchOptions,
) -> Result<Task>
where
    C: TaskChannel + ?Sized,
    P: ProgressSink + ?Sized,
{
    let deadline = options.max_wait.map(|wait| Instant::now() + wait);
    let mut current = initial;

    while !options.stops_on(current.status) {
        let message = match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, channel.recv())
                .await
                .map_err(|_| Error::WatchTimeout {
                    waited: options.max_wait.unwrap_or_default(),
                })??,
            None => channel.recv().await?,
        };

        let Some(message) = message else {
            return Err(Error::channel(format!(
                "channel closed before task {} ({}) finished; last status {}",
                current.id, current.kind, current.status
            )));
        };

        let Some(entity) = event_entity(&message) else {
            tracing::debug!("Skipping non-task event");
            continue;
        };
        let Some((id, kind)) = event_job(&entity) else {
            tracing::debug!("Skipping non-task event");
            continue;
        };
        if id != current.id || kind != current.kind.as_str() {
            tracing::debug!(id, kind, "Skipping event for another task");
            continue;
        }

        current = Task::deserialize(&entity).map_err(|err| {
            Error::decode(format!(
                "undecodable snapshot for task {} ({}): {err}",
                current.id, current.kind
            ))
        })?;
        progress.update(&current);
    }

    tracing::info!(
        id = %current.id,
        kind = %current.kind,
        status = %current.status,
        "Task finished"
    );
    progress.finish(&current);
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_job_requires_task_entity() {
        let ok = json!({
            "event": "task_status_changed",
            "entity": {"id": "t", "kind": "parse", "status": "WEIRD"}
        });
        let entity = event_entity(&ok.to_string()).unwrap();
        assert_eq!(event_job(&entity), Some(("t", "parse")));

        assert!(event_entity("not json").is_none());
        assert!(event_entity(&json!({"event": "ping"}).to_string()).is_none());
        assert!(event_entity(&json!({"entity": null}).to_string()).is_none());

        let dataset = json!({"id": "d", "name": "dataset", "status": "BUILT"});
        assert!(event_job(&dataset).is_none());
    }

    #[test]
    fn stop_set_depends_on_options() {
        let default = WatchOptions::default();
        assert!(default.stops_on(TaskStatus::Done));
        assert!(default.stops_on(TaskStatus::Error));
        assert!(!default.stops_on(TaskStatus::Interrupted));

        let opted_in = WatchOptions {
            stop_on_interrupted: true,
            ..WatchOptions::default()
        };
        assert!(opted_in.stops_on(TaskStatus::Interrupted));
        assert!(!opted_in.stops_on(TaskStatus::Running));
    }
}
