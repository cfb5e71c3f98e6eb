//! Request dispatch: URL resolution, auth header and hand-off to the
//! transport.

use std::fmt;
use std::sync::Arc;

use oceanic_define::RestMethod;
use reqwest::header::HeaderValue;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::error::{ApiError, AuthError, ConfigError};
use crate::token::TokenStore;
use crate::transport::{BoxFuture, HttpTransport, TransportRequest};

/// A dispatched request whose reply has not arrived yet.
pub type ReplyFuture = BoxFuture<'static, Result<Value, ApiError>>;

/// Sends requests on behalf of endpoints, items and page cursors.
///
/// Cheap to clone: the transport and token are shared.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    token: TokenStore,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("transport", &self.transport)
            .field("base_url", &self.base_url)
            .field("token", &self.token)
            .finish()
    }
}

impl Dispatcher {
    /// Creates a dispatcher. A trailing `/` is added to `base_url` if absent.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        base_url: impl Into<String>,
        token: TokenStore,
    ) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            transport,
            base_url,
            token,
        }
    }

    /// Returns the base URL relative paths are appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the shared token store.
    pub fn token(&self) -> &TokenStore {
        &self.token
    }

    /// Builds the absolute URL for `path`.
    ///
    /// A path that already carries an `http://` or `https://` scheme is used
    /// unchanged; anything else is appended to the base URL.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] when the result does not parse.
    pub fn url_for(&self, path: &str) -> Result<Url, ApiError> {
        let absolute = if is_absolute(path) {
            path.to_string()
        } else {
            format!("{}{path}", self.base_url)
        };
        Url::parse(&absolute).map_err(|e| ConfigError::InvalidUrl(e).into())
    }

    /// Sends `method path` with `params`.
    ///
    /// Everything up to the transport call happens before this returns: a
    /// missing token or a bad URL is reported as the outer `Err` and the
    /// transport is never touched. The returned future resolves to the
    /// parsed success body or the transport's failure.
    ///
    /// ## Errors
    ///
    /// - [`AuthError::MissingToken`] when no token is set.
    /// - [`AuthError::InvalidTokenFormat`] when the token cannot be carried
    ///   in the `Authorization` header.
    /// - [`ConfigError::InvalidUrl`] when the URL cannot be built.
    pub fn send(
        &self,
        method: RestMethod,
        path: &str,
        params: Map<String, Value>,
    ) -> Result<ReplyFuture, ApiError> {
        let Some(token) = self.token.get() else {
            warn!(%method, path, "refusing to dispatch without a token");
            return Err(AuthError::MissingToken.into());
        };

        let authorization = format!("Bearer {token}");
        if HeaderValue::from_str(&authorization).is_err() {
            warn!(%method, path, "refusing to dispatch with a malformed token");
            return Err(AuthError::InvalidTokenFormat.into());
        }

        let url = self.url_for(path)?;
        debug!(%method, %url, params = params.len(), "dispatching request");

        let request = TransportRequest {
            method,
            url,
            headers: vec![("Authorization".to_string(), authorization)],
            params: (!params.is_empty()).then_some(params),
        };

        let transport = Arc::clone(&self.transport);
        Ok(Box::pin(async move { transport.execute(request).await }))
    }
}

fn is_absolute(path: &str) -> bool {
    let lower = path.get(..8).unwrap_or(path).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RecordingTransport;
    use serde_json::json;

    fn dispatcher(token: Option<&str>) -> (Dispatcher, RecordingTransport) {
        let transport = RecordingTransport::new();
        let store = token.map(TokenStore::new).unwrap_or_default();
        let dispatcher = Dispatcher::new(
            Arc::new(transport.clone()),
            "https://api.digitalocean.com/v2",
            store,
        );
        (dispatcher, transport)
    }

    #[tokio::test]
    async fn relative_path_is_joined_to_base() {
        let (dispatcher, transport) = dispatcher(Some("secret"));
        transport.reply(json!({"ok": true}));

        let reply = dispatcher
            .send(RestMethod::Get, "droplets/1", Map::new())
            .unwrap()
            .await
            .unwrap();

        assert_eq!(reply, json!({"ok": true}));
        let request = transport.last_request().unwrap();
        assert_eq!(
            request.url.as_str(),
            "https://api.digitalocean.com/v2/droplets/1"
        );
        assert_eq!(request.header("Authorization"), Some("Bearer secret"));
        assert!(request.params.is_none());
    }

    #[tokio::test]
    async fn absolute_url_is_used_unchanged() {
        let (dispatcher, transport) = dispatcher(Some("secret"));
        let next = "https://api.digitalocean.com/v2/droplets?page=2&per_page=1";

        dispatcher
            .send(RestMethod::Get, next, Map::new())
            .unwrap()
            .await
            .unwrap();

        assert_eq!(transport.last_request().unwrap().url.as_str(), next);
    }

    #[tokio::test]
    async fn non_empty_params_are_attached() {
        let (dispatcher, transport) = dispatcher(Some("secret"));
        let mut params = Map::new();
        params.insert("name".into(), json!("example.com"));

        dispatcher
            .send(RestMethod::Post, "domains", params.clone())
            .unwrap()
            .await
            .unwrap();

        assert_eq!(transport.last_request().unwrap().params, Some(params));
    }

    #[test]
    #[tracing_test::traced_test]
    fn missing_token_is_logged() {
        let (dispatcher, _) = dispatcher(None);
        assert!(dispatcher.send(RestMethod::Get, "sizes", Map::new()).is_err());
        assert!(logs_contain("refusing to dispatch without a token"));
    }

    #[test]
    fn missing_token_fails_before_transport() {
        let (dispatcher, transport) = dispatcher(None);

        let err = dispatcher
            .send(RestMethod::Get, "regions", Map::new())
            .err()
            .unwrap();

        assert!(err.is_fatal());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn token_set_later_is_seen() {
        let (dispatcher, transport) = dispatcher(None);
        dispatcher.token().set("late");

        dispatcher
            .send(RestMethod::Get, "regions", Map::new())
            .unwrap()
            .await
            .unwrap();
        assert_eq!(
            transport.last_request().unwrap().header("authorization"),
            Some("Bearer late")
        );
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let (dispatcher, _) = dispatcher(None);
        assert_eq!(dispatcher.base_url(), "https://api.digitalocean.com/v2/");
    }

    #[test]
    fn malformed_token_is_rejected_before_transport() {
        let (dispatcher, transport) = dispatcher(Some("line\nbreak"));

        let err = dispatcher.send(RestMethod::Get, "sizes", Map::new()).err().unwrap();

        assert!(matches!(err, ApiError::Auth(AuthError::InvalidTokenFormat)));
        assert!(!err.is_fatal());
        assert!(transport.requests().is_empty());
    }
}
