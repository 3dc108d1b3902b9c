//! Typed views over the service's JSON payloads.

mod dataset;
mod model;
mod page;
mod source;
mod status;
mod task;

pub use dataset::Dataset;
pub use model::Model;
pub use page::{Page, PageMetadata};
pub use source::Source;
pub use status::{EntityStatus, TaskStatus};
pub use task::{
    OptimizeTask, ParseTask, PreprocessTask, RefreshTask, Task, TaskKind, TaskVariant, TrainTask,
};
