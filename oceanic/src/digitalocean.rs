//! The DigitalOcean v2 client root.

use std::time::Duration;

use oceanic_definitions::define_digitalocean_api;

use crate::client::{Client, ClientBuilder};
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::transport::HttpTransport;

/// DigitalOcean API v2 with one endpoint per resource.
///
/// ## Examples
///
/// ```
/// use oceanic::DigitalOcean;
/// use oceanic::transport::RecordingTransport;
///
/// let api = DigitalOcean::builder()
///     .transport(RecordingTransport::new())
///     .build()
///     .unwrap();
///
/// api.token("dop_v1_secret");
/// assert_eq!(api.floating_ips.noun(), "floating_ips");
/// assert_eq!(api.keys.noun(), "account/keys");
/// ```
#[derive(Debug, Clone)]
pub struct DigitalOcean {
    client: Client,
    /// `actions`
    pub actions: Endpoint,
    /// `domains`, with nested DNS records on each domain.
    pub domains: Endpoint,
    /// `regions`
    pub regions: Endpoint,
    /// `sizes`
    pub sizes: Endpoint,
    /// `droplets`, with per-droplet methods and actions.
    pub droplets: Endpoint,
    /// `images`
    pub images: Endpoint,
    /// SSH keys under `account/keys`.
    pub keys: Endpoint,
    /// `floating_ips`, identified by `ip`.
    pub floating_ips: Endpoint,
}

impl DigitalOcean {
    /// Creates a builder preloaded with the DigitalOcean definition.
    pub fn builder() -> DigitalOceanBuilder {
        DigitalOceanBuilder(Client::builder(define_digitalocean_api()))
    }

    /// Wraps a client compiled from the DigitalOcean definition.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::UnknownEndpoint`](crate::error::ConfigError::UnknownEndpoint)
    /// if the client lacks one of the resources.
    pub fn from_client(client: Client) -> Result<Self, ApiError> {
        let endpoint = |name: &str| client.endpoint(name).cloned();
        Ok(Self {
            actions: endpoint("actions")?,
            domains: endpoint("domains")?,
            regions: endpoint("regions")?,
            sizes: endpoint("sizes")?,
            droplets: endpoint("droplets")?,
            images: endpoint("images")?,
            keys: endpoint("keys")?,
            floating_ips: endpoint("floating_ips")?,
            client,
        })
    }

    /// Sets the token and returns the root for chaining.
    pub fn token(&self, value: impl Into<String>) -> &Self {
        self.client.set_token(value);
        self
    }

    /// Returns the current token.
    pub fn current_token(&self) -> Option<String> {
        self.client.token()
    }

    /// The underlying generic client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Builder for [`DigitalOcean`]; see [`ClientBuilder`] for each option.
#[derive(Debug)]
pub struct DigitalOceanBuilder(ClientBuilder);

impl DigitalOceanBuilder {
    pub fn base_url(self, base_url: impl Into<String>) -> Self {
        Self(self.0.base_url(base_url))
    }

    pub fn token(self, token: impl Into<String>) -> Self {
        Self(self.0.token(token))
    }

    /// Reads `DIGITALOCEAN_TOKEN`, then `DIGITALOCEAN_ACCESS_TOKEN`.
    pub fn token_from_env(self) -> Self {
        Self(self.0.token_from_env())
    }

    pub fn transport(self, transport: impl HttpTransport + 'static) -> Self {
        Self(self.0.transport(transport))
    }

    pub fn timeout(self, timeout: Duration) -> Self {
        Self(self.0.timeout(timeout))
    }

    pub fn user_agent(self, agent: impl Into<String>) -> Self {
        Self(self.0.user_agent(agent))
    }

    /// Builds the client root.
    ///
    /// ## Errors
    ///
    /// See [`ClientBuilder::build`].
    pub fn build(self) -> Result<DigitalOcean, ApiError> {
        DigitalOcean::from_client(self.0.build()?)
    }
}
