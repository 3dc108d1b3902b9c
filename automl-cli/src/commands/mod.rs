//! Command implementations.
//!
//! Every command builds at most one [`Client`] and runs its async work on a
//! runtime created for that command alone.

pub mod config;
pub mod delete;
pub mod get;
pub mod interrupt;
pub mod predict;
pub mod start;
pub mod wait;

use anyhow::{bail, Context, Result};
use automl::models::{Task, TaskStatus, TaskVariant};
use automl::watcher::{NoProgress, ProgressBarSink, ProgressSink, TaskChannel, WatchOptions};
use automl::Client;
use colored::Colorize;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

use crate::app::{call, App};
use crate::render;

pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("Failed to start the async runtime")
}

pub(crate) fn watch_options(max_wait: Option<u64>, stop_on_interrupted: bool) -> WatchOptions {
    WatchOptions {
        max_wait: max_wait.map(Duration::from_secs),
        stop_on_interrupted,
    }
}

pub(crate) fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Open the push channel, then [`follow_on`] it.
pub(crate) async fn follow(
    app: &App,
    client: &Client,
    task: Task,
    options: WatchOptions,
) -> Result<()> {
    let mut channel = call(client, client.open_channel()).await?;
    follow_on(app, client, task, &mut channel, options).await
}

/// Watch `task` to the end over `channel`, then show what it produced.
///
/// The channel is closed before returning. Fails when the task finished in
/// `ERROR`.
pub(crate) async fn follow_on<C>(
    app: &App,
    client: &Client,
    task: Task,
    channel: &mut C,
    options: WatchOptions,
) -> Result<()>
where
    C: TaskChannel + ?Sized,
{
    if !app.global.json {
        println!(
            "  {} Waiting for {} task {}",
            "→".blue(),
            task.kind,
            task.id.bright_white()
        );
    }

    let mut progress: Box<dyn ProgressSink> = if app.global.json {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressBarSink::new())
    };
    let last = call(
        client,
        client.wait_on(task, channel, progress.as_mut(), options),
    )
    .await?;

    match last.status {
        TaskStatus::Done => show_result(app, client, last).await,
        status => {
            if app.global.json {
                render::print_json(&last)?;
            }
            bail!(
                "task {} ({}) finished with status {}{}",
                last.id,
                last.kind,
                status,
                last.step_description
                    .as_deref()
                    .map(|d| format!(": {d}"))
                    .unwrap_or_default()
            )
        },
    }
}

/// Fetch and show the entity a finished task produced.
async fn show_result(app: &App, client: &Client, task: Task) -> Result<()> {
    let repository = client.repository();
    let as_json = app.global.json;
    if !as_json {
        println!("{} {} task {} done", "✓".green(), task.kind, task.id);
    }
    match TaskVariant::from_task(task) {
        TaskVariant::Parse(t) => render::show(&call(client, t.resolve(&repository)).await?, as_json),
        TaskVariant::Preprocess(t) => {
            render::show(&call(client, t.resolve(&repository)).await?, as_json)
        },
        TaskVariant::Optimize(t) => {
            render::show(&call(client, t.resolve(&repository)).await?, as_json)
        },
        TaskVariant::Train(t) => render::show(&call(client, t.resolve(&repository)).await?, as_json),
        TaskVariant::Refresh(t) => {
            render::show(&call(client, t.resolve(&repository)).await?, as_json)
        },
        TaskVariant::Generic(t) => render::show(&t, as_json),
    }
}
