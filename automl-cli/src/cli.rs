//! Command line definition.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command line client for the AutoML service
#[derive(Debug, Parser)]
#[command(name = "automl")]
#[command(about = "Launch, watch and inspect AutoML jobs", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Profile to use instead of the current one
    #[arg(long, global = true, env = "AUTOML_PROFILE")]
    pub profile: Option<String>,

    /// Configuration file (defaults to <config dir>/automl/config.yaml)
    #[arg(long, global = true, env = "AUTOML_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage profiles and settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Show one entity, or list a page of them when no id is given
    Get {
        /// Entity type
        #[arg(value_enum)]
        entity: EntityKind,

        /// Entity id
        id: Option<String>,

        /// Page to list (1-based)
        #[arg(long, default_value = "1")]
        page: u32,

        /// Elements per page
        #[arg(long, default_value = "20")]
        per_page: u32,
    },

    /// Launch a job
    ///
    /// Waits for the job to finish with a progress bar unless --detach is given.
    Start {
        #[command(subcommand)]
        job: StartCommand,

        /// Print the launched task and return without waiting
        #[arg(long, global = true)]
        detach: bool,

        /// Give up waiting after this many seconds
        #[arg(long, global = true)]
        max_wait: Option<u64>,
    },

    /// Wait for an already launched task to finish
    Wait {
        /// Task id
        task_id: String,

        /// Give up waiting after this many seconds
        #[arg(long)]
        max_wait: Option<u64>,

        /// Also stop when the task is interrupted
        #[arg(long)]
        stop_on_interrupted: bool,
    },

    /// Ask the service to stop a task
    Interrupt {
        /// Task id
        task_id: String,
    },

    /// Delete a source, dataset or model
    Delete {
        #[arg(value_enum)]
        entity: DeletableKind,

        /// Entity id
        id: String,
    },

    /// Score JSON input with a served model
    Predict {
        #[arg(long)]
        model_id: String,

        /// JSON file with the model input
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the configuration with tokens masked
    Show,

    /// Add or replace a profile
    SetProfile {
        /// Profile name
        name: String,

        #[arg(long, env = "AUTOML_TOKEN", hide_env_values = true)]
        token: String,

        #[arg(long)]
        api_url: String,

        #[arg(long)]
        websocket_url: String,

        #[arg(long)]
        serving_url: String,

        /// Defaults to <api-url>/admin
        #[arg(long)]
        admin_url: Option<String>,
    },

    /// Select the current profile
    Use {
        name: String,
    },

    /// Remove a profile
    Remove {
        name: String,
    },

    /// Update a global setting (timeout, verbosity, error-policy)
    Set {
        key: String,
        value: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum StartCommand {
    /// Upload files and parse them into a source
    Parse {
        #[arg(long)]
        name: String,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Build a dataset from a source
    Preprocess {
        #[arg(long)]
        source_id: String,

        #[arg(long)]
        name: String,

        /// Target column
        #[arg(long)]
        label: String,

        #[arg(long)]
        folds: Option<u32>,
    },

    /// Search hyperparameter configurations for a dataset
    Optimize {
        #[arg(long)]
        dataset_id: String,

        #[arg(long)]
        budget: Option<u32>,
    },

    /// Train a model from a configuration file
    Train {
        #[arg(long)]
        dataset_id: String,

        #[arg(long)]
        name: String,

        /// JSON file with the model configuration
        #[arg(long = "config-file")]
        config_file: PathBuf,
    },

    /// Search configurations, then train the best one
    OptimizeTrain {
        #[arg(long)]
        dataset_id: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        budget: Option<u32>,
    },

    /// Retrain an existing model
    Retrain {
        #[arg(long)]
        model_id: String,
    },

    /// Rebuild an outdated dataset
    Refresh {
        #[arg(long)]
        dataset_id: String,
    },

    /// Evaluate a custom configuration against a dataset
    Evaluate {
        #[arg(long)]
        dataset_id: String,

        /// JSON file with the configuration
        #[arg(long = "config-file")]
        config_file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntityKind {
    Source,
    Dataset,
    Model,
    Task,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeletableKind {
    Source,
    Dataset,
    Model,
}
