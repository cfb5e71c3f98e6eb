//! The generic client root.

use std::sync::Arc;
use std::time::Duration;

use oceanic_define::ApiDefinition;
use tracing::debug;
use url::Url;

use crate::dispatch::Dispatcher;
use crate::endpoint::Endpoint;
use crate::error::{ApiError, ConfigError};
use crate::naming::camel_case;
use crate::token::TokenStore;
use crate::transport::{HttpTransport, ReqwestTransport};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// `User-Agent` sent by the default transport.
const DEFAULT_USER_AGENT: &str = concat!("oceanic/", env!("CARGO_PKG_VERSION"));

/// Builder for configuring a [`Client`].
#[derive(Debug)]
pub struct ClientBuilder {
    definition: ApiDefinition,
    base_url: Option<String>,
    token: Option<String>,
    token_from_env: bool,
    transport: Option<Arc<dyn HttpTransport>>,
    timeout: Duration,
    user_agent: String,
}

impl ClientBuilder {
    fn new(definition: ApiDefinition) -> Self {
        Self {
            definition,
            base_url: None,
            token: None,
            token_from_env: false,
            transport: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Overrides the definition's base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the bearer token. Takes precedence over the environment.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Reads the token from the first set variable of the definition's
    /// `env_auth` chain.
    pub fn token_from_env(mut self) -> Self {
        self.token_from_env = true;
        self
    }

    /// Injects the HTTP transport. `timeout` and `user_agent` only apply to
    /// the default transport.
    pub fn transport(mut self, transport: impl HttpTransport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Sets the request timeout of the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the `User-Agent` of the default transport.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Compiles every resource of the definition into an [`Endpoint`].
    ///
    /// ## Errors
    ///
    /// Returns an error if the base URL does not parse or the default
    /// transport cannot be constructed.
    pub fn build(self) -> Result<Client, ApiError> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| self.definition.base_url.clone());
        Url::parse(&base_url).map_err(ConfigError::InvalidUrl)?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                ReqwestTransport::builder()
                    .timeout(self.timeout)
                    .user_agent(&self.user_agent)?
                    .build()?,
            ),
        };

        let token = if self.token_from_env {
            TokenStore::from_env(self.definition.env_auth.as_slice())
        } else {
            TokenStore::default()
        };
        if let Some(value) = self.token {
            token.set(value);
        }

        let dispatcher = Dispatcher::new(transport, base_url, token);
        let endpoints = self
            .definition
            .resources
            .iter()
            .map(|resource| {
                (
                    camel_case(&resource.name, false),
                    Endpoint::new(resource, dispatcher.clone()),
                )
            })
            .collect::<Vec<_>>();

        debug!(
            api = %self.definition.name,
            base_url = dispatcher.base_url(),
            endpoints = endpoints.len(),
            "client ready"
        );

        Ok(Client {
            definition: self.definition,
            dispatcher,
            endpoints,
        })
    }
}

/// A client root compiled from an [`ApiDefinition`].
///
/// Holds the shared token and one [`Endpoint`] per resource, keyed by the
/// normalized resource name.
///
/// ## Examples
///
/// ```
/// use oceanic::Client;
/// use oceanic::transport::RecordingTransport;
/// use oceanic_define::ApiDefinition;
///
/// let definition = ApiDefinition::from_json_str(r##"{
///     "name": "Example",
///     "base_url": "https://api.example.com/v1/",
///     "resources": [
///         {"name": "floating_ips", "methods": {"id": {"endpoint": "{ip}", "param": {"ip": "#"}}}}
///     ]
/// }"##).unwrap();
///
/// let client = Client::builder(definition)
///     .transport(RecordingTransport::new())
///     .build()
///     .unwrap();
///
/// client.set_token("secret");
/// let ips = client.endpoint("floatingIps").unwrap();
/// assert_eq!(ips.noun(), "floating_ips");
/// assert!(client.endpoint("floating_ips").is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    definition: ApiDefinition,
    dispatcher: Dispatcher,
    endpoints: Vec<(String, Endpoint)>,
}

impl Client {
    /// Creates a builder for `definition`.
    pub fn builder(definition: ApiDefinition) -> ClientBuilder {
        ClientBuilder::new(definition)
    }

    /// The definition this client was compiled from.
    pub fn definition(&self) -> &ApiDefinition {
        &self.definition
    }

    /// Sets the token shared by every endpoint, item and page cursor.
    pub fn set_token(&self, token: impl Into<String>) -> &Self {
        self.dispatcher.token().set(token);
        self
    }

    /// Returns the current token.
    pub fn token(&self) -> Option<String> {
        self.dispatcher.token().get()
    }

    /// Looks up an endpoint by raw or normalized resource name.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::UnknownEndpoint`] if no resource has that name.
    pub fn endpoint(&self, name: &str) -> Result<&Endpoint, ApiError> {
        let key = camel_case(name, false);
        self.endpoints
            .iter()
            .find(|(installed, _)| *installed == key)
            .map(|(_, endpoint)| endpoint)
            .ok_or_else(|| {
                ConfigError::UnknownEndpoint {
                    name: name.to_string(),
                }
                .into()
            })
    }

    /// All endpoints with their normalized names, in definition order.
    pub fn endpoints(&self) -> impl Iterator<Item = (&str, &Endpoint)> {
        self.endpoints
            .iter()
            .map(|(name, endpoint)| (name.as_str(), endpoint))
    }
}
