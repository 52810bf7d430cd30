//! Blocking flavor of the request helper.
//!
//! Option resolution and failure signaling are shared with [`crate::call`];
//! only the round-trip is synchronous. Must not be used from inside an async
//! runtime, as with any `reqwest::blocking` client.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use crate::config::RequestConfig;
use crate::error::Error;
use crate::executor::{header_map, resolve_url, response_headers, transport_error};
use crate::request::{build_request, Settlement};
use crate::types::{HttpRequest, HttpResponse, Parsed};

/// Synchronous counterpart of [`crate::HttpExecutor`].
pub trait BlockingExecutor: Send + Sync {
    /// Execute an HTTP request and return the response.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error>;
}

/// Blocking HTTP executor using `reqwest::blocking`.
#[derive(Debug, Clone)]
pub struct ReqwestBlockingExecutor {
    client: Client,
    base_url: Option<Url>,
    default_headers: HashMap<String, String>,
}

impl ReqwestBlockingExecutor {
    /// Create a new executor with the given timeout.
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client))
    }

    /// Create with default timeout of 30 seconds.
    pub fn with_default_timeout() -> Result<Self, Error> {
        Self::new(Duration::from_secs(30))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: None,
            default_headers: HashMap::new(),
        }
    }

    /// Resolve relative addresses against `base_url`.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, Error> {
        self.base_url = Some(Url::parse(base_url)?);
        Ok(self)
    }

    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }
}

impl BlockingExecutor for ReqwestBlockingExecutor {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
        let url = resolve_url(self.base_url.as_ref(), &request.url)?;
        let headers = header_map(&self.default_headers, &request.headers)?;

        let mut req_builder = self
            .client
            .request(request.method.into(), url)
            .headers(headers);

        if let Some(timeout) = request.timeout {
            req_builder = req_builder.timeout(timeout);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.clone());
        }

        let response = req_builder.send().map_err(transport_error)?;

        let status = response.status();
        let resp_headers = response_headers(response.headers());
        let body = response.bytes().map_err(transport_error)?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            headers: resp_headers,
            body,
        })
    }
}

/// Blocking version of [`crate::call`], with the same outcomes.
pub fn call(
    executor: &dyn BlockingExecutor,
    address: &str,
    config: RequestConfig,
) -> Result<Option<Parsed>, Error> {
    let request = build_request(address, &config)?;
    let settlement = Settlement::from_config(config);

    tracing::debug!(method = %request.method, url = %request.url, "sending blocking request");
    let response = executor.execute(&request)?;
    tracing::debug!(status = response.status, "response received");

    settlement.settle(response)
}
