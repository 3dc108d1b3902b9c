//! `automl get`: show one entity or list a page.

use anyhow::Result;
use automl::models::{Dataset, Model, Source, Task};
use automl::{Client, Entity, PageRequest};

use crate::app::{call, App};
use crate::cli::EntityKind;
use crate::commands::runtime;
use crate::render::{self, Render};

pub fn execute(
    app: &App,
    entity: EntityKind,
    id: Option<String>,
    page: PageRequest,
) -> Result<()> {
    let client = app.client()?;
    runtime()?.block_on(async {
        match entity {
            EntityKind::Source => fetch::<Source>(app, &client, id.as_deref(), page).await,
            EntityKind::Dataset => fetch::<Dataset>(app, &client, id.as_deref(), page).await,
            EntityKind::Model => fetch::<Model>(app, &client, id.as_deref(), page).await,
            EntityKind::Task => fetch::<Task>(app, &client, id.as_deref(), page).await,
        }
    })
}

async fn fetch<E: Entity + Render>(
    app: &App,
    client: &Client,
    id: Option<&str>,
    page: PageRequest,
) -> Result<()> {
    let repository = client.repository();
    match id {
        Some(id) => {
            let entity = call(client, repository.get::<E>(id)).await?;
            render::show(&entity, app.global.json)
        },
        None => {
            let page = call(client, repository.list::<E>(page)).await?;
            render::show_page(&page, app.global.json)
        },
    }
}
