//! The client facade.
//!
//! A [`Client`] bundles the transport for one profile with the push channel
//! URL and the configured [`ErrorPolicy`]. Build one per process and pass it
//! by reference.

use std::future::Future;

use crate::config::{Config, Profile, Settings};
use crate::error::{Error, ErrorPolicy, Result};
use crate::launcher::Launcher;
use crate::models::Task;
use crate::repository::Repository;
use crate::session::Session;
use crate::transport::{Endpoints, Transport};
use crate::watcher::{watch, ProgressSink, TaskChannel, WatchOptions, WebSocketChannel};

/// Entry point to the remote service.
#[derive(Debug, Clone)]
pub struct Client {
    transport: Transport,
    websocket_url: String,
    policy: ErrorPolicy,
}

impl Client {
    /// Build a client for `profile` with the global `settings`.
    pub fn new(profile: &Profile, settings: &Settings) -> Result<Self> {
        profile.validate()?;
        let transport = Transport::new(
            Endpoints::from_profile(profile),
            profile.token.clone(),
            settings.request_timeout(),
        )?;
        Ok(Self {
            transport,
            websocket_url: profile.websocket_url.clone(),
            policy: settings.error_policy,
        })
    }

    /// Build a client for the named profile, or the current one.
    pub fn from_config(config: &Config, profile: Option<&str>) -> Result<Self> {
        let (name, profile) = config.profile(profile)?;
        tracing::debug!(profile = name, "Using profile");
        Self::new(profile, &config.settings)
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    pub fn repository(&self) -> Repository<'_> {
        Repository::new(&self.transport)
    }

    pub fn launcher(&self) -> Launcher<'_> {
        Launcher::new(&self.transport)
    }

    /// Hand `err` to the error policy.
    pub fn surface(&self, err: Error) -> Error {
        self.policy.surface(err)
    }

    /// Await `op`, surfacing its error through the policy.
    ///
    /// ```no_run
    /// # async fn run(client: &automl::Client) -> automl::Result<()> {
    /// use automl::models::Source;
    /// use automl::PageRequest;
    ///
    /// let page = client
    ///     .call(client.repository().list::<Source>(PageRequest::default()))
    ///     .await?;
    /// println!("{} sources", page.metadata.total_elements);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call<T, F>(&self, op: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        op.await.map_err(|err| self.surface(err))
    }

    /// Open the push channel: log in for a session cookie, then connect.
    pub async fn open_channel(&self) -> Result<WebSocketChannel> {
        let session = Session::login(&self.transport).await?;
        WebSocketChannel::connect(&self.websocket_url, &session).await
    }

    /// Block until `task` finishes, reporting progress on the way.
    ///
    /// The channel is opened for this wait only and closed afterwards,
    /// whatever the outcome.
    pub async fn wait_for<P>(&self, task: Task, progress: &mut P, options: WatchOptions) -> Result<Task>
    where
        P: ProgressSink + ?Sized,
    {
        let mut channel = self.open_channel().await?;
        self.wait_on(task, &mut channel, progress, options).await
    }

    /// Like [`Client::wait_for`] over an already open channel, which is
    /// closed before returning.
    pub async fn wait_on<C, P>(
        &self,
        task: Task,
        channel: &mut C,
        progress: &mut P,
        options: WatchOptions,
    ) -> Result<Task>
    where
        C: TaskChannel + ?Sized,
        P: ProgressSink + ?Sized,
    {
        let outcome = watch(task, channel, progress, options).await;
        if let Err(err) = channel.close().await {
            tracing::debug!(error = %err, "Closing push channel failed");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            token: "secret".to_string(),
            api_url: "https://api.example.com".to_string(),
            admin_url: None,
            websocket_url: "wss://api.example.com/ws".to_string(),
            serving_url: "https://serving.example.com".to_string(),
        }
    }

    #[test]
    fn test_client_takes_policy_from_settings() {
        let settings = Settings {
            error_policy: ErrorPolicy::Silent,
            ..Settings::default()
        };
        let client = Client::new(&profile(), &settings).unwrap();
        assert_eq!(client.policy(), ErrorPolicy::Silent);
        assert_eq!(
            client.transport().endpoints().admin,
            "https://api.example.com/admin"
        );
    }

    #[test]
    fn test_client_rejects_invalid_profile() {
        let mut bad = profile();
        bad.api_url = "not a url".to_string();
        assert!(matches!(
            Client::new(&bad, &Settings::default()),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_from_config_without_profiles() {
        assert!(matches!(
            Client::from_config(&Config::default(), None),
            Err(Error::Config { .. })
        ));
    }

    #[tokio::test]
    async fn test_call_returns_error_under_silent_policy() {
        let settings = Settings {
            error_policy: ErrorPolicy::Silent,
            ..Settings::default()
        };
        let client = Client::new(&profile(), &settings).unwrap();
        let result: Result<()> = client
            .call(async { Err(Error::from_status(404, None)) })
            .await;
        assert!(matches!(result, Err(Error::Server(_))));
    }
}
