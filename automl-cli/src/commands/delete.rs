//! `automl delete`.

use anyhow::Result;
use automl::models::{Dataset, Model, Source};
use colored::Colorize;
use serde_json::json;

use crate::app::{call, App};
use crate::cli::DeletableKind;
use crate::commands::runtime;
use crate::render;

pub fn execute(app: &App, entity: DeletableKind, id: String) -> Result<()> {
    let client = app.client()?;
    let repository = client.repository();
    runtime()?.block_on(async {
        match entity {
            DeletableKind::Source => call(&client, repository.delete::<Source>(&id)).await,
            DeletableKind::Dataset => call(&client, repository.delete::<Dataset>(&id)).await,
            DeletableKind::Model => call(&client, repository.delete::<Model>(&id)).await,
        }
    })?;

    if app.global.json {
        return render::print_json(&json!({ "deleted": id }));
    }
    println!("{} Deleted {}", "✓".green(), id);
    Ok(())
}
