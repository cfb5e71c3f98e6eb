//! The HTTP seam between the dispatcher and the network.
//!
//! The dispatcher builds a fully resolved [`TransportRequest`] (absolute URL,
//! headers, optional parameter object) and hands it to an [`HttpTransport`].
//! The transport reports either a parsed success body or a [`ClientError`]
//! carrying the raw failure body.
//!
//! [`ClientError`]: crate::error::ClientError
//!
//! [`ReqwestTransport`] is the production implementation;
//! [`RecordingTransport`] replays scripted replies for tests.

mod mock;
mod http;

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;

use oceanic_define::RestMethod;
use serde_json::{Map, Value};
use url::Url;

use crate::error::ApiError;

pub use self::http::{ReqwestTransport, ReqwestTransportBuilder};
pub use mock::RecordingTransport;

/// A boxed, sendable future used at the engine's dyn-compatible seams.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A fully resolved request.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: RestMethod,
    /// Absolute URL.
    pub url: Url,
    /// Extra headers, in insertion order.
    pub headers: Vec<(String, String)>,
    /// Remaining parameters. `None` when nothing is left to send.
    ///
    /// Body methods (POST, PUT, PATCH) send this as a JSON body; the others
    /// send it as query pairs.
    pub params: Option<Map<String, Value>>,
}

impl TransportRequest {
    /// Returns the value of the first header called `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Sends resolved requests.
///
/// Implementations must treat any non-success status as a failure and
/// return the response body inside
/// [`ClientError::HttpStatus`](crate::error::ClientError::HttpStatus) unmodified.
pub trait HttpTransport: Send + Sync + Debug {
    /// Sends `request` and returns the parsed success body.
    ///
    /// An empty success body is reported as [`Value::Null`].
    fn execute(&self, request: TransportRequest) -> BoxFuture<'_, Result<Value, ApiError>>;
}

/// Renders a parameter value as a query-string value.
pub(crate) fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
