//! Progress reporting for watched tasks.
//!
//! Purely observational: nothing here affects when a watch stops.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::models::{Task, TaskStatus};

/// Receives every accepted snapshot of a watched task.
pub trait ProgressSink: Send {
    /// Called with every accepted snapshot, in arrival order.
    fn update(&mut self, task: &Task);

    /// Called once with the snapshot that ended the watch.
    fn finish(&mut self, task: &Task);
}

/// Discards progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn update(&mut self, _task: &Task) {}

    fn finish(&mut self, _task: &Task) {}
}

/// Terminal progress bar showing `current_step / total_step` and the step
/// description.
pub struct ProgressBarSink {
    bar: ProgressBar,
}

impl ProgressBarSink {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }
}

impl Default for ProgressBarSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ProgressBarSink {
    fn update(&mut self, task: &Task) {
        self.bar.set_length(u64::from(task.total_step));
        self.bar.set_position(u64::from(task.current_step));
        self.bar.set_message(describe(task));
    }

    fn finish(&mut self, task: &Task) {
        self.update(task);
        match task.status {
            TaskStatus::Done => self.bar.finish_with_message(format!("{} done", task.kind)),
            _ => self.bar.abandon_with_message(format!("{} {}", task.kind, task.status)),
        }
    }
}

fn describe(task: &Task) -> String {
    match &task.step_description {
        Some(step) => format!("{} [{}] {step}", task.kind, task.status),
        None => format!("{} [{}]", task.kind, task.status),
    }
}

/// Records every reported `current_step`, for tests and scripted callers.
#[derive(Debug, Default, Clone)]
pub struct RecordingProgress {
    pub steps: Vec<u32>,
    pub finished: Option<Task>,
}

impl ProgressSink for RecordingProgress {
    fn update(&mut self, task: &Task) {
        self.steps.push(task.current_step);
    }

    fn finish(&mut self, task: &Task) {
        self.finished = Some(task.clone());
    }
}
