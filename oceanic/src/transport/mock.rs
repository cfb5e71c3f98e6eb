//! Scripted transport for tests and offline use.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use super::{BoxFuture, HttpTransport, TransportRequest};
use crate::error::{ApiError, ClientError};

/// A transport that records every request and answers from a script.
///
/// Replies are consumed in order; once the script runs out every request
/// succeeds with `null`. Clones share the same script and log.
///
/// ## Examples
///
/// ```
/// use oceanic::transport::RecordingTransport;
/// use serde_json::json;
///
/// let transport = RecordingTransport::new();
/// transport.reply(json!({"regions": []}));
/// transport.fail(404, json!({"id": "not_found"}));
/// assert!(transport.requests().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    script: Arc<Mutex<VecDeque<Result<Value, (u16, Value)>>>>,
    log: Arc<Mutex<Vec<TransportRequest>>>,
}

impl RecordingTransport {
    /// Creates an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a success body.
    pub fn reply(&self, body: Value) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(body));
    }

    /// Queues a failure with `status` and raw `body`.
    pub fn fail(&self, status: u16, body: Value) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err((status, body)));
    }

    /// Returns every request sent so far.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the most recent request.
    pub fn last_request(&self) -> Option<TransportRequest> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl HttpTransport for RecordingTransport {
    fn execute(&self, request: TransportRequest) -> BoxFuture<'_, Result<Value, ApiError>> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        let next = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        Box::pin(async move {
            match next {
                None => Ok(Value::Null),
                Some(Ok(body)) => Ok(body),
                Some(Err((status, body))) => Err(ClientError::HttpStatus { status, body }.into()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oceanic_define::RestMethod;
    use serde_json::json;
    use url::Url;

    fn get(url: &str) -> TransportRequest {
        TransportRequest {
            method: RestMethod::Get,
            url: Url::parse(url).unwrap(),
            headers: Vec::new(),
            params: None,
        }
    }

    #[tokio::test]
    async fn replies_in_order_then_null() {
        let transport = RecordingTransport::new();
        transport.reply(json!({"a": 1}));
        transport.fail(500, json!("down"));

        let first = transport.execute(get("https://x.test/a")).await.unwrap();
        let second = transport.execute(get("https://x.test/b")).await.unwrap_err();
        let third = transport.execute(get("https://x.test/c")).await.unwrap();

        assert_eq!(first, json!({"a": 1}));
        assert!(matches!(
            second,
            ApiError::Client(ClientError::HttpStatus { status: 500, .. })
        ));
        assert_eq!(third, Value::Null);
        assert_eq!(transport.requests().len(), 3);
        assert_eq!(
            transport.last_request().unwrap().url.as_str(),
            "https://x.test/c"
        );
    }

    #[tokio::test]
    async fn clones_share_state() {
        let transport = RecordingTransport::new();
        let clone = transport.clone();
        clone.reply(json!(1));

        assert_eq!(transport.execute(get("https://x.test/")).await.unwrap(), json!(1));
        assert_eq!(clone.requests().len(), 1);
    }
}
