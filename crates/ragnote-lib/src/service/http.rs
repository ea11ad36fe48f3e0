use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{RagError, Result};
use crate::service::decode::decode_as;

/// Blocking JSON-over-HTTP client bound to one service base URL.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct ServiceClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl ServiceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| RagError::Transport {
                service: "http client",
                source,
            })?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// POST `body` as JSON to `path` and decode the response.
    pub fn post_json<B, T>(&self, service: &'static str, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.url(path)).json(body);
        self.execute(service, path, request)
    }

    /// GET `path` and decode the response.
    pub fn get_json<T: DeserializeOwned>(&self, service: &'static str, path: &str) -> Result<T> {
        let request = self.http.get(self.url(path));
        self.execute(service, path, request)
    }

    fn execute<T: DeserializeOwned>(
        &self,
        service: &'static str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T> {
        debug!(service, path, timeout = ?self.timeout, "Sending request");

        let response = request
            .timeout(self.timeout)
            .send()
            .map_err(|source| RagError::Transport { service, source })?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|source| RagError::Transport { service, source })?;

        if !status.is_success() {
            return Err(RagError::ServiceStatus {
                service,
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        debug!(service, status = status.as_u16(), bytes = body.len(), "Response received");
        decode_as(&body)
    }
}
