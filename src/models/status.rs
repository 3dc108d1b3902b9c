//! Status enumerations shared by entities and tasks.
//!
//! Both enumerations decode strictly: a status string the client does not
//! know is a [`Error::Decode`], never a silent default. An unknown value means
//! client and service disagree on the schema.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Build status of a Source, Dataset or Model artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityStatus {
    /// Artifact is being built.
    Building,
    /// Artifact is ready.
    Built,
    /// Build failed.
    Failed,
    /// Artifact is stale and can be refreshed.
    Outdated,
}

impl EntityStatus {
    /// All defined statuses, in declaration order.
    pub const ALL: [Self; 4] = [Self::Building, Self::Built, Self::Failed, Self::Outdated];

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Building => "BUILDING",
            Self::Built => "BUILT",
            Self::Failed => "FAILED",
            Self::Outdated => "OUTDATED",
        }
    }

    /// Returns `true` when the artifact can be used by downstream jobs.
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Built | Self::Outdated)
    }
}

impl fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for EntityStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::decode(format!("unknown entity status '{s}'")))
    }
}

/// Lifecycle status of a remote task.
///
/// ```text
/// PENDING -> SCHEDULED -> RUNNING -> DONE | ERROR | INTERRUPTED
/// ```
///
/// Only `DONE` and `ERROR` end a watch by default, see
/// [`TaskStatus::is_finished`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Accepted, not yet scheduled.
    Pending,
    /// Waiting for a worker.
    Scheduled,
    /// Executing.
    Running,
    /// Completed successfully.
    Done,
    /// Failed.
    Error,
    /// Stopped on request.
    Interrupted,
}

impl TaskStatus {
    /// All defined statuses, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Scheduled,
        Self::Running,
        Self::Done,
        Self::Error,
        Self::Interrupted,
    ];

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Scheduled => "SCHEDULED",
            Self::Running => "RUNNING",
            Self::Done => "DONE",
            Self::Error => "ERROR",
            Self::Interrupted => "INTERRUPTED",
        }
    }

    /// Returns `true` for the statuses that end a watch: `DONE` and `ERROR`.
    ///
    /// `INTERRUPTED` is deliberately excluded; whether the service ever sends
    /// a later `DONE`/`ERROR` for an interrupted task is unconfirmed. Callers
    /// that want to stop on it use
    /// [`WatchOptions::stop_on_interrupted`](crate::watcher::WatchOptions).
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::decode(format!("unknown task status '{s}'")))
    }
}
