//! HTTP execution abstraction.
//!
//! [`crate::call`] never touches the network itself; it hands a resolved
//! [`HttpRequest`] to an [`HttpExecutor`]. Tests substitute the mock below.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use url::Url;

use crate::error::Error;
use crate::types::{HttpRequest, HttpResponse};

/// Trait for executing HTTP requests.
///
/// Implementations perform exactly one round-trip per call and return the
/// response whatever its status. Only failures that prevent a response
/// (connect, DNS, timeout) are errors.
#[async_trait]
pub trait HttpExecutor: Send + Sync {
    /// Execute an HTTP request and return the response.
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error>;
}

/// Production HTTP executor using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    client: Client,
    base_url: Option<Url>,
    default_headers: HashMap<String, String>,
}

impl ReqwestExecutor {
    /// Create a new executor with the given timeout.
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client))
    }

    /// Create with default timeout of 30 seconds.
    pub fn with_default_timeout() -> Result<Self, Error> {
        Self::new(Duration::from_secs(30))
    }

    /// Wrap an already configured reqwest client
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

    /// Add a default header sent with every request.
    ///
    /// A header of the same name on the request wins.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    fn resolve_url(&self, address: &str) -> Result<Url, Error> {
        resolve_url(self.base_url.as_ref(), address)
    }
}

#[async_trait]
impl HttpExecutor for ReqwestExecutor {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
        let url = self.resolve_url(&request.url)?;
        let headers = header_map(&self.default_headers, &request.headers)?;

        tracing::trace!(
            headers = headers.len(),
            has_body = request.body.is_some(),
            "reqwest executor sending"
        );

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

        let response = req_builder.send().await.map_err(transport_error)?;

        let status = response.status();
        let resp_headers = response_headers(response.headers());
        let body = response.bytes().await.map_err(transport_error)?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            headers: resp_headers,
            body,
        })
    }
}

/// Absolute addresses (any scheme casing) are used as-is; relative ones are
/// joined onto `base_url`.
pub(crate) fn resolve_url(base_url: Option<&Url>, address: &str) -> Result<Url, Error> {
    match Url::parse(address) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => match base_url {
            Some(base) => Ok(base.join(address)?),
            None => Err(Error::InvalidUrl {
                message: format!("relative address '{}' without a base URL", address),
            }),
        },
        Err(e) => Err(e.into()),
    }
}

/// Merge default and per-request headers, the latter taking precedence.
pub(crate) fn header_map(
    defaults: &HashMap<String, String>,
    headers: &HashMap<String, String>,
) -> Result<HeaderMap, Error> {
    let mut map = HeaderMap::new();
    for (name, value) in defaults.iter().chain(headers.iter()) {
        let header_name = HeaderName::try_from(name.as_str())?;
        let header_value = HeaderValue::try_from(value.as_str())?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

pub(crate) fn response_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut resp_headers = HashMap::new();
    for (name, value) in headers {
        if let Ok(v) = value.to_str() {
            resp_headers.insert(name.to_string(), v.to_string());
        }
    }
    resp_headers
}

pub(crate) fn transport_error(error: reqwest::Error) -> Error {
    Error::Transport {
        message: error.to_string(),
    }
}
