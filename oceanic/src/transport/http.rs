//! [`HttpTransport`] backed by `reqwest`.

use std::time::Duration;

use oceanic_define::RestMethod;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use serde_json::Value;
use tracing::{Span, instrument};

use super::{BoxFuture, HttpTransport, TransportRequest, query_value};
use crate::error::{ApiError, ClientError, ConfigError, ValidationError};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builder for configuring a [`ReqwestTransport`].
#[derive(Debug)]
pub struct ReqwestTransportBuilder {
    timeout: Duration,
    default_headers: HeaderMap,
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_headers: HeaderMap::new(),
        }
    }
}

impl ReqwestTransportBuilder {
    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a default header to all requests.
    ///
    /// ## Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, ApiError> {
        let (name, value) = header_pair(name.as_ref(), value.as_ref())?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the `User-Agent` sent with every request.
    ///
    /// ## Errors
    ///
    /// Returns an error if the value cannot be carried in a header.
    pub fn user_agent(self, agent: impl AsRef<str>) -> Result<Self, ApiError> {
        self.default_header(USER_AGENT.as_str(), agent)
    }

    /// Builds the [`ReqwestTransport`].
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<ReqwestTransport, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .default_headers(self.default_headers)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| ConfigError::Transport(e.to_string()))?;

        Ok(ReqwestTransport {
            client,
            timeout: self.timeout,
        })
    }
}

/// Async HTTP transport with connection pooling.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a new builder.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }

    /// Creates a transport with default settings.
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self, ApiError> {
        Self::builder().build()
    }

    #[instrument(
        name = "api_request",
        skip(self, request),
        fields(
            http.method = %request.method,
            http.url = %request.url,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    async fn send(&self, request: TransportRequest) -> Result<Value, ApiError> {
        let mut builder = self
            .client
            .request(to_reqwest(request.method), request.url.clone());

        for (name, value) in &request.headers {
            let (name, value) = header_pair(name, value)?;
            builder = builder.header(name, value);
        }

        if let Some(params) = &request.params {
            builder = if request.method.has_body() {
                builder.json(params)
            } else {
                let pairs: Vec<(&str, String)> = params
                    .iter()
                    .map(|(k, v)| (k.as_str(), query_value(v)))
                    .collect();
                builder.query(&pairs)
            };
        }

        let response = builder.send().await.map_err(|e| self.classify(e))?;

        let status = response.status();
        Span::current().record("http.status_code", status.as_u16());

        let text = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            let otel_status = if status.is_server_error() {
                "ERROR"
            } else {
                "UNSET"
            };
            Span::current().record("otel.status_code", otel_status);

            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
            return Err(ClientError::HttpStatus {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        Span::current().record("otel.status_code", "OK");

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        let body = serde_json::from_str(&text).map_err(ValidationError::JsonParse)?;
        Ok(body)
    }

    fn classify(&self, error: reqwest::Error) -> ClientError {
        if error.is_timeout() {
            ClientError::Timeout {
                duration_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else if error.is_connect() {
            ClientError::Connection(error.to_string())
        } else {
            ClientError::Request(error)
        }
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute(&self, request: TransportRequest) -> BoxFuture<'_, Result<Value, ApiError>> {
        Box::pin(self.send(request))
    }
}

fn header_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), ConfigError> {
    let header_name = HeaderName::try_from(name).map_err(|e| ConfigError::InvalidHeader {
        name: name.to_string(),
        message: e.to_string(),
    })?;
    let header_value = HeaderValue::try_from(value).map_err(|e| ConfigError::InvalidHeader {
        name: name.to_string(),
        message: e.to_string(),
    })?;
    Ok((header_name, header_value))
}

fn to_reqwest(method: RestMethod) -> reqwest::Method {
    match method {
        RestMethod::Get => reqwest::Method::GET,
        RestMethod::Post => reqwest::Method::POST,
        RestMethod::Put => reqwest::Method::PUT,
        RestMethod::Patch => reqwest::Method::PATCH,
        RestMethod::Delete => reqwest::Method::DELETE,
        RestMethod::Head => reqwest::Method::HEAD,
        RestMethod::Options => reqwest::Method::OPTIONS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};
    use url::Url;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(method: RestMethod, url: String, params: Option<Value>) -> TransportRequest {
        TransportRequest {
            method,
            url: Url::parse(&url).unwrap(),
            headers: vec![("Authorization".to_string(), "Bearer secret".to_string())],
            params: params.map(|p| p.as_object().cloned().unwrap_or_else(Map::new)),
        }
    }

    #[tokio::test]
    async fn get_sends_params_as_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/droplets"))
            .and(query_param("tag_name", "web"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"droplets": []})))
            .expect(1)
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new().unwrap();
        let body = transport
            .execute(request(
                RestMethod::Get,
                format!("{}/v2/droplets", server.uri()),
                Some(json!({"tag_name": "web"})),
            ))
            .await
            .unwrap();

        assert_eq!(body, json!({"droplets": []}));
    }

    #[tokio::test]
    async fn post_sends_params_as_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/droplets/3/actions"))
            .and(body_json(json!({"id": 3, "type": "reboot"})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"action": {"id": 9}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new().unwrap();
        let body = transport
            .execute(request(
                RestMethod::Post,
                format!("{}/v2/droplets/3/actions", server.uri()),
                Some(json!({"id": 3, "type": "reboot"})),
            ))
            .await
            .unwrap();

        assert_eq!(body["action"]["id"], 9);
    }

    #[tokio::test]
    async fn empty_success_body_is_null() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v2/droplets/3"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new().unwrap();
        let body = transport
            .execute(request(
                RestMethod::Delete,
                format!("{}/v2/droplets/3", server.uri()),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn failure_body_is_forwarded_verbatim() {
        let server = MockServer::start().await;
        let failure = json!({"id": "not_found", "message": "The resource you were accessing could not be found."});
        Mock::given(method("GET"))
            .and(path("/v2/droplets/404"))
            .respond_with(ResponseTemplate::new(404).set_body_json(failure.clone()))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new().unwrap();
        let err = transport
            .execute(request(
                RestMethod::Get,
                format!("{}/v2/droplets/404", server.uri()),
                None,
            ))
            .await
            .unwrap_err();

        match err {
            ApiError::Client(ClientError::HttpStatus { status, body }) => {
                assert_eq!(status, 404);
                assert_eq!(body, failure);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_failure_body_is_kept_as_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new().unwrap();
        let err = transport
            .execute(request(RestMethod::Get, server.uri(), None))
            .await
            .unwrap_err();

        match err {
            ApiError::Client(ClientError::HttpStatus { status, body }) => {
                assert_eq!(status, 502);
                assert_eq!(body, json!("Bad Gateway"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_success_body_is_a_validation_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new().unwrap();
        let err = transport
            .execute(request(RestMethod::Get, server.uri(), None))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Validation(ValidationError::JsonParse(_))));
    }

    #[tokio::test]
    async fn user_agent_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "oceanic-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let transport = ReqwestTransport::builder()
            .user_agent("oceanic-test")
            .unwrap()
            .build()
            .unwrap();
        transport
            .execute(request(RestMethod::Get, server.uri(), None))
            .await
            .unwrap();
    }

    #[test]
    fn invalid_header_is_rejected() {
        let result = ReqwestTransport::builder().default_header("bad header", "x");
        assert!(matches!(
            result,
            Err(ApiError::Config(ConfigError::InvalidHeader { .. }))
        ));
    }
}
