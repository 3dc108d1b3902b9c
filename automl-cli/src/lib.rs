//! Command line client for the AutoML service.
//!
//! The binary is a thin wrapper over [`execute`]; commands live in
//! [`commands`] and all terminal output goes through [`render`].

pub mod app;
pub mod cli;
pub mod commands;
pub mod logging;
pub mod render;

use anyhow::Result;
use automl::PageRequest;

pub use app::{App, Surfaced};
pub use cli::Cli;

use cli::Commands;

/// Load configuration, set up logging and run one command.
pub fn execute(cli: Cli) -> Result<()> {
    let verbose = cli.global.verbose;
    let app = match App::load(cli.global) {
        Ok(app) => app,
        Err(err) => {
            logging::init(verbose, "warn");
            return Err(err);
        },
    };
    logging::init(verbose, &app.config.settings.verbosity);
    tracing::debug!(path = %app.config_path.display(), "Configuration loaded");

    match cli.command {
        Commands::Config { command } => commands::config::execute(app, command),
        Commands::Get {
            entity,
            id,
            page,
            per_page,
        } => commands::get::execute(&app, entity, id, PageRequest { page, per_page }),
        Commands::Start {
            job,
            detach,
            max_wait,
        } => commands::start::execute(
            &app,
            job,
            detach,
            commands::watch_options(max_wait, false),
        ),
        Commands::Wait {
            task_id,
            max_wait,
            stop_on_interrupted,
        } => commands::wait::execute(
            &app,
            task_id,
            commands::watch_options(max_wait, stop_on_interrupted),
        ),
        Commands::Interrupt { task_id } => commands::interrupt::execute(&app, task_id),
        Commands::Delete { entity, id } => commands::delete::execute(&app, entity, id),
        Commands::Predict { model_id, input } => commands::predict::execute(&app, model_id, input),
    }
}
