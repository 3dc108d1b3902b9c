//! Remote task snapshots and their per-kind variants.
//!
//! A [`Task`] is what the service returns from every launch call and what
//! the push channel carries. The client never mutates one; it only keeps
//! the latest snapshot it observed.
//!
//! [`TaskVariant::from_task`] narrows a generic task into the variant for
//! its kind. Narrow variants know which entity the job produces and can
//! resolve it once the task is `DONE`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::status::TaskStatus;
use crate::error::{Error, Result};

/// Kind of remote job.
///
/// Unrecognized kinds decode to [`TaskKind::Other`] so that a newer service
/// does not break listing or watching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskKind {
    Parse,
    Preprocess,
    Optimize,
    Train,
    OptimizeTrain,
    Retrain,
    Refresh,
    CustomConfig,
    Other(String),
}

impl TaskKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Parse => "parse",
            Self::Preprocess => "preprocess",
            Self::Optimize => "optimize",
            Self::Train => "train",
            Self::OptimizeTrain => "optimize_train",
            Self::Retrain => "retrain",
            Self::Refresh => "refresh",
            Self::CustomConfig => "custom_config",
            Self::Other(kind) => kind,
        }
    }
}

impl From<String> for TaskKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "parse" => Self::Parse,
            "preprocess" => Self::Preprocess,
            "optimize" => Self::Optimize,
            "train" => Self::Train,
            "optimize_train" => Self::OptimizeTrain,
            "retrain" => Self::Retrain,
            "refresh" => Self::Refresh,
            "custom_config" => Self::CustomConfig,
            _ => Self::Other(raw),
        }
    }
}

impl From<TaskKind> for String {
    fn from(kind: TaskKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Snapshot of a remote unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub kind: TaskKind,
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_step: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_step: u32,
    #[serde(default)]
    pub step_description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Free-form execution details; produced entity ids live here.
    #[serde(default, deserialize_with = "null_as_default")]
    pub execution_info: Map<String, Value>,
}

/// The service sends `null` for counters and details it has not filled yet.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Task {
    /// Decode a task payload.
    pub fn from_value(raw: &Value) -> Result<Self> {
        Ok(Self::deserialize(raw)?)
    }

    /// Returns `true` if `other` is a snapshot of the same logical job.
    pub fn same_job(&self, other: &Task) -> bool {
        self.id == other.id && self.kind == other.kind
    }

    /// String field of `execution_info`.
    pub fn info_str(&self, key: &str) -> Option<&str> {
        self.execution_info.get(key).and_then(Value::as_str)
    }

    /// Id of the entity this task produced, read from `execution_info[key]`.
    ///
    /// Fails unless the task is `DONE` and the id is present.
    fn produced_id(&self, key: &str) -> Result<&str> {
        if self.status != TaskStatus::Done {
            return Err(Error::consistency(format!(
                "task {} ({}) is {}, its result can only be resolved once DONE",
                self.id, self.kind, self.status
            )));
        }
        self.info_str(key).ok_or_else(|| {
            Error::consistency(format!(
                "task {} ({}) is DONE but execution_info has no {key}",
                self.id, self.kind
            ))
        })
    }
}

macro_rules! narrow_task {
    ($(#[$doc:meta])* $name:ident, [$($kind:ident),+], $id_key:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name(Task);

        impl $name {
            /// The underlying snapshot.
            pub fn task(&self) -> &Task {
                &self.0
            }

            pub fn into_task(self) -> Task {
                self.0
            }

            /// Id of the entity produced by this task.
            pub fn produced_id(&self) -> Result<&str> {
                self.0.produced_id($id_key)
            }
        }

        impl TryFrom<Task> for $name {
            type Error = Error;

            fn try_from(task: Task) -> Result<Self> {
                match task.kind {
                    $(TaskKind::$kind)|+ => Ok(Self(task)),
                    ref other => Err(Error::consistency(format!(
                        concat!("cannot build ", stringify!($name), " from a task of kind '{}'"),
                        other
                    ))),
                }
            }
        }
    };
}

narrow_task!(
    /// Upload-and-parse job; produces a Source.
    ParseTask, [Parse], "source_id"
);
narrow_task!(
    /// Preprocessing job; produces a Dataset.
    PreprocessTask, [Preprocess], "dataset_id"
);
narrow_task!(
    /// Hyperparameter search; attaches configurations to a Dataset.
    OptimizeTask, [Optimize, OptimizeTrain], "dataset_id"
);
narrow_task!(
    /// Training, retraining or custom-configuration evaluation; produces a Model.
    TrainTask, [Train, Retrain, CustomConfig], "model_id"
);
narrow_task!(
    /// Rebuild of an outdated Dataset.
    RefreshTask, [Refresh], "dataset_id"
);

/// A task narrowed to its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskVariant {
    Parse(ParseTask),
    Preprocess(PreprocessTask),
    Optimize(OptimizeTask),
    Train(TrainTask),
    Refresh(RefreshTask),
    /// Kind with no dedicated variant.
    Generic(Task),
}

impl TaskVariant {
    /// Dispatch on `task.kind`.
    ///
    /// # Examples
    ///
    /// ```
    /// use automl::models::{Task, TaskVariant};
    /// use serde_json::json;
    ///
    /// let task = Task::from_value(&json!({
    ///     "id": "t1", "kind": "preprocess", "status": "PENDING"
    /// })).unwrap();
    /// assert!(matches!(TaskVariant::from_task(task), TaskVariant::Preprocess(_)));
    /// ```
    pub fn from_task(task: Task) -> Self {
        // Each arm's kind is accepted by the matching TryFrom.
        match task.kind {
            TaskKind::Parse => Self::Parse(ParseTask(task)),
            TaskKind::Preprocess => Self::Preprocess(PreprocessTask(task)),
            TaskKind::Optimize | TaskKind::OptimizeTrain => Self::Optimize(OptimizeTask(task)),
            TaskKind::Train | TaskKind::Retrain | TaskKind::CustomConfig => {
                Self::Train(TrainTask(task))
            },
            TaskKind::Refresh => Self::Refresh(RefreshTask(task)),
            TaskKind::Other(_) => Self::Generic(task),
        }
    }

    pub fn task(&self) -> &Task {
        match self {
            Self::Parse(t) => t.task(),
            Self::Preprocess(t) => t.task(),
            Self::Optimize(t) => t.task(),
            Self::Train(t) => t.task(),
            Self::Refresh(t) => t.task(),
            Self::Generic(t) => t,
        }
    }

    pub fn into_task(self) -> Task {
        match self {
            Self::Parse(t) => t.into_task(),
            Self::Preprocess(t) => t.into_task(),
            Self::Optimize(t) => t.into_task(),
            Self::Train(t) => t.into_task(),
            Self::Refresh(t) => t.into_task(),
            Self::Generic(t) => t,
        }
    }
}

impl From<Task> for TaskVariant {
    fn from(task: Task) -> Self {
        Self::from_task(task)
    }
}
