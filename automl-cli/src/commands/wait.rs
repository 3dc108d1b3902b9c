//! `automl wait`: follow a task launched earlier.
//!
//! The channel is opened before the task is fetched, so a transition that
//! happens between the two is still delivered.

use anyhow::Result;
use automl::models::Task;
use automl::watcher::{TaskChannel, WatchOptions};

use crate::app::{call, App};
use crate::commands::{follow_on, runtime};

pub fn execute(app: &App, task_id: String, options: WatchOptions) -> Result<()> {
    let client = app.client()?;
    runtime()?.block_on(async {
        let mut channel = call(&client, client.open_channel()).await?;
        let task = match call(&client, client.repository().get::<Task>(&task_id)).await {
            Ok(task) => task,
            Err(err) => {
                if let Err(close) = channel.close().await {
                    tracing::debug!(error = %close, "Closing push channel failed");
                }
                return Err(err);
            },
        };
        follow_on(app, &client, task, &mut channel, options).await
    })
}
