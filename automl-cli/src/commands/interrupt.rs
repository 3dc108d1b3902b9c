//! `automl interrupt`.

use anyhow::Result;
use colored::Colorize;

use crate::app::{call, App};
use crate::commands::runtime;
use crate::render;

pub fn execute(app: &App, task_id: String) -> Result<()> {
    let client = app.client()?;
    let task = runtime()?.block_on(call(&client, client.launcher().interrupt(&task_id)))?;

    if app.global.json {
        return render::print_json(&task);
    }
    println!(
        "{} Interrupt requested for {} task {} (now {})",
        "✓".green(),
        task.kind,
        task.id,
        render::task_status(task.status)
    );
    Ok(())
}
