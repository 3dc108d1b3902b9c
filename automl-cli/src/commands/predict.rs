//! `automl predict`: JSON in, JSON out.

use anyhow::Result;
use std::path::PathBuf;

use crate::app::{call, App};
use crate::commands::{read_json, runtime};
use crate::render;

pub fn execute(app: &App, model_id: String, input: PathBuf) -> Result<()> {
    let input = read_json(&input)?;
    let client = app.client()?;
    let output = runtime()?.block_on(call(&client, client.launcher().predict(&model_id, input)))?;
    render::print_json(&output)
}
