//! Per-invocation context shared by all commands.

use anyhow::Result;
use automl::{Client, Config, ErrorPolicy};
use std::future::Future;
use std::path::PathBuf;

use crate::cli::GlobalArgs;

/// A library error that has already gone through the error policy.
///
/// `printed` is `true` when the policy wrote it to stderr, so the binary
/// must not print it a second time.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct Surfaced {
    #[source]
    pub error: automl::Error,
    pub printed: bool,
}

impl Surfaced {
    fn new(policy: ErrorPolicy, error: automl::Error) -> Self {
        Self {
            printed: policy == ErrorPolicy::Print,
            error: policy.surface(error),
        }
    }
}

/// Loaded configuration plus the global flags.
pub struct App {
    pub config_path: PathBuf,
    pub config: Config,
    pub global: GlobalArgs,
}

impl App {
    /// Resolve the configuration path and load it.
    pub fn load(global: GlobalArgs) -> Result<Self> {
        let config_path = match &global.config {
            Some(path) => path.clone(),
            None => Config::default_path().map_err(|e| Surfaced::new(ErrorPolicy::Print, e))?,
        };
        let config =
            Config::load(&config_path).map_err(|e| Surfaced::new(ErrorPolicy::Print, e))?;
        Ok(Self {
            config_path,
            config,
            global,
        })
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.config.settings.error_policy
    }

    /// Route a library result through the configured error policy.
    pub fn surface<T>(&self, result: automl::Result<T>) -> Result<T> {
        result.map_err(|e| Surfaced::new(self.policy(), e).into())
    }

    /// Client for `--profile` or the current profile.
    pub fn client(&self) -> Result<Client> {
        self.surface(Client::from_config(
            &self.config,
            self.global.profile.as_deref(),
        ))
    }

    pub fn save(&self) -> Result<()> {
        self.surface(self.config.save(&self.config_path))
    }
}

/// Await a library call through the client's error policy.
pub async fn call<T, F>(client: &Client, op: F) -> Result<T>
where
    F: Future<Output = automl::Result<T>>,
{
    let printed = client.policy() == ErrorPolicy::Print;
    client
        .call(op)
        .await
        .map_err(|error| Surfaced { error, printed }.into())
}
