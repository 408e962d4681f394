use crate::{ClientError, ClientIdentity, ClientResult};

use std::time::Duration;

use log::{debug, warn};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, StatusCode};
use serde_json::Value;

/// Thin HTTP client for the storyteller gateway.
///
/// Knows nothing about credentials beyond attaching a bearer token it is
/// handed; refresh and retry policy live in [`crate::SessionManager`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    identity: ClientIdentity,
    timeout: Duration,
    client: ReqwestClient,
}

impl ApiClient {
    /// # Arguments
    /// * `base_url` - Gateway URL (e.g., "http://127.0.0.1:8080")
    /// * `identity` - Platform, version and device id headers
    /// * `timeout` - Upper bound for one request, response body included
    pub fn new(base_url: &str, identity: ClientIdentity, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            identity,
            timeout,
            client: ReqwestClient::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, endpoint);
        self.identity.apply(self.client.request(method, &url))
    }

    /// Send one request and decode the JSON response.
    ///
    /// An empty 2xx body decodes as `Value::Null`. Non-2xx responses become
    /// [`ClientError::Api`] carrying the gateway's `errorCode` and message.
    pub async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        bearer: Option<&str>,
    ) -> ClientResult<Value> {
        let mut req = self.request(method.clone(), endpoint);
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        debug!("{method} {endpoint}");

        let exchange = async {
            let response = req.send().await?;
            let status = response.status();
            let bytes = response.bytes().await?;
            Ok::<_, ClientError>((status, bytes))
        };

        let (status, bytes) = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| {
                warn!("{method} {endpoint} timed out after {:?}", self.timeout);
                ClientError::timeout(endpoint, self.timeout)
            })??;

        if !status.is_success() {
            let err = Self::error_from_body(status, &bytes);
            debug!("{method} {endpoint} -> {}", status.as_u16());
            return Err(err);
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    #[track_caller]
    pub(crate) fn error_from_body(status: StatusCode, bytes: &[u8]) -> ClientError {
        let body: Value = serde_json::from_slice(bytes).unwrap_or(Value::Null);
        let text = |key: &str| {
            body.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let code = text("errorCode").unwrap_or_else(|| format!("HTTP_{}", status.as_u16()));
        let message = text("message")
            .or_else(|| text("error"))
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| String::from("Unknown error"));

        ClientError::api(status.as_u16(), code, message)
    }
}
