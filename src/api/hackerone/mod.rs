pub mod reports;
pub mod types;

use crate::api::transport::{Connector, HttpConnector};
use crate::config::{Config, Credentials};
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

/// HackerOne API client.
///
/// Cloning is cheap and every clone (including [`HackerOneClient::for_program`]
/// copies) shares one lazily built connection.
pub struct HackerOneClient<C: Connector = HttpConnector> {
    pub(crate) config: Arc<Config>,
    pub(crate) program: Option<String>,
    pub(crate) retry: RetryPolicy,
    credentials: Option<Credentials>,
    connector: Arc<C>,
    connection: Arc<OnceCell<C::Transport>>,
}

impl<C: Connector> Clone for HackerOneClient<C> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            program: self.program.clone(),
            retry: self.retry.clone(),
            credentials: self.credentials.clone(),
            connector: self.connector.clone(),
            connection: self.connection.clone(),
        }
    }
}

impl HackerOneClient<HttpConnector> {
    /// Client against the public API using credentials from the environment.
    pub fn new(config: Arc<Config>) -> Self {
        Self::with_connector(config, Credentials::from_env(), HttpConnector::default())
    }
}

impl<C: Connector> HackerOneClient<C> {
    pub fn with_connector(config: Arc<Config>, credentials: Option<Credentials>, connector: C) -> Self {
        Self {
            config,
            program: None,
            retry: RetryPolicy::default(),
            credentials,
            connector: Arc::new(connector),
            connection: Arc::new(OnceCell::new()),
        }
    }

    /// Copy of this client scoped to `program`, sharing the same connection.
    pub fn for_program(&self, program: impl Into<String>) -> Self {
        Self {
            program: Some(program.into()),
            ..self.clone()
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The program override, or the configured program when none was given.
    pub fn program(&self) -> Option<&str> {
        self.program.as_deref().or_else(|| self.config.program())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Connection shared by every clone, built on first use. Missing credentials
    /// fail before anything touches the network, and the failure is not cached.
    pub(crate) async fn connection(&self) -> Result<&C::Transport> {
        self.connection
            .get_or_try_init(|| async move {
                let credentials = self.credentials.as_ref().ok_or_else(|| {
                    Error::NotConfigured(format!(
                        "{} {} environment variables must be set",
                        crate::config::TOKEN_NAME_VAR,
                        crate::config::TOKEN_VAR
                    ))
                })?;
                info!(token_name = %credentials.token_name, "Opening HackerOne API connection");
                self.connector.connect(credentials)
            })
            .await
    }
}
