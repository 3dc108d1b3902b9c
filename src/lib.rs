//! Client SDK for a remote machine-learning-as-a-service platform.
//!
//! The service owns the heavy lifting: parsing uploaded files into
//! **Sources**, preprocessing them into **Datasets**, searching
//! hyperparameters and training **Models**. Every such operation is
//! asynchronous on the service side and is represented by a **Task**. This
//! crate launches those tasks, watches them to completion over a push
//! channel, and reads back the entities they produce.
//!
//! # Overview
//!
//! ```no_run
//! use automl::launcher::PreprocessRequest;
//! use automl::watcher::{ProgressBarSink, WatchOptions};
//! use automl::{Client, Config};
//!
//! # async fn run() -> automl::Result<()> {
//! let config = Config::load(&Config::default_path()?)?;
//! let client = Client::from_config(&config, None)?;
//!
//! let task = client
//!     .launcher()
//!     .start_preprocess(&PreprocessRequest {
//!         source_id: "src-1".to_string(),
//!         name: "churn".to_string(),
//!         label: "churned".to_string(),
//!         folds: None,
//!     })
//!     .await?;
//!
//! let finished = client
//!     .wait_for(task.into_task(), &mut ProgressBarSink::new(), WatchOptions::default())
//!     .await?;
//! let dataset = automl::models::PreprocessTask::try_from(finished)?
//!     .resolve(&client.repository())
//!     .await?;
//! println!("{} is {}", dataset.id, dataset.status);
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`models`] - Typed entities, task kinds and statuses, pagination
//! - [`watcher`] - The task watcher and its channel and progress seams
//! - [`repository`] - Get, list and delete remote entities
//! - [`launcher`] - Start jobs, interrupt them, request predictions
//! - [`config`] - Profiles and settings stored in `config.yaml`
//! - [`error`] - Error taxonomy and the error policy

pub mod client;
pub mod config;
pub mod error;
pub mod launcher;
pub mod models;
pub mod repository;
pub mod session;
pub mod transport;
pub mod watcher;

pub use client::Client;
pub use config::{Config, Profile, Settings};
pub use error::{render_error, Error, ErrorPolicy, Result, ServerError};
pub use repository::{Entity, PageRequest, Repository};
pub use watcher::{watch, WatchOptions};
