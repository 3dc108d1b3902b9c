//! `automl start`: launch a job and, unless detached, follow it.

use anyhow::Result;
use automl::launcher::{
    OptimizeRequest, OptimizeTrainRequest, ParseRequest, PreprocessRequest, TrainRequest,
};
use automl::models::Task;
use automl::watcher::WatchOptions;
use automl::Client;
use colored::Colorize;

use crate::app::{call, App};
use crate::cli::StartCommand;
use crate::commands::{follow, read_json, runtime};
use crate::render;

pub fn execute(app: &App, job: StartCommand, detach: bool, options: WatchOptions) -> Result<()> {
    let client = app.client()?;
    runtime()?.block_on(async {
        let task = launch(&client, job).await?;
        if detach {
            return print_launched(app, &task);
        }
        follow(app, &client, task, options).await
    })
}

async fn launch(client: &Client, job: StartCommand) -> Result<Task> {
    let launcher = client.launcher();
    let task = match job {
        StartCommand::Parse { name, files } => {
            let request = ParseRequest { name, files };
            call(client, launcher.start_parse(&request)).await?.into_task()
        },
        StartCommand::Preprocess {
            source_id,
            name,
            label,
            folds,
        } => {
            let request = PreprocessRequest {
                source_id,
                name,
                label,
                folds,
            };
            call(client, launcher.start_preprocess(&request)).await?.into_task()
        },
        StartCommand::Optimize { dataset_id, budget } => {
            let request = OptimizeRequest { budget };
            call(client, launcher.start_optimize(&dataset_id, &request))
                .await?
                .into_task()
        },
        StartCommand::Train {
            dataset_id,
            name,
            config_file,
        } => {
            let request = TrainRequest {
                name,
                configuration: read_json(&config_file)?,
            };
            call(client, launcher.start_train(&dataset_id, &request))
                .await?
                .into_task()
        },
        StartCommand::OptimizeTrain {
            dataset_id,
            name,
            budget,
        } => {
            let request = OptimizeTrainRequest { name, budget };
            call(client, launcher.start_optimize_train(&dataset_id, &request))
                .await?
                .into_task()
        },
        StartCommand::Retrain { model_id } => {
            call(client, launcher.start_retrain(&model_id)).await?.into_task()
        },
        StartCommand::Refresh { dataset_id } => {
            call(client, launcher.start_refresh(&dataset_id)).await?.into_task()
        },
        StartCommand::Evaluate {
            dataset_id,
            config_file,
        } => {
            let configuration = read_json(&config_file)?;
            call(client, launcher.evaluate_custom_config(&dataset_id, configuration))
                .await?
                .into_task()
        },
    };
    Ok(task)
}

fn print_launched(app: &App, task: &Task) -> Result<()> {
    if app.global.json {
        return render::print_json(task);
    }
    println!(
        "{} Launched {} task {} ({})",
        "✓".green(),
        task.kind,
        task.id.bright_white(),
        render::task_status(task.status)
    );
    println!("  Follow it with: automl wait {}", task.id);
    Ok(())
}
