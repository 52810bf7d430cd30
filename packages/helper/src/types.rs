use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// HTTP method for requests
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    OPTIONS,
    HEAD,
    CONNECT,
    TRACE,
}

impl Method {
    /// Methods that conventionally carry no request body (GET, OPTIONS, HEAD).
    pub fn is_query_style(self) -> bool {
        matches!(self, Method::GET | Method::OPTIONS | Method::HEAD)
    }

    /// Whether a request with this method may carry a body.
    pub fn allows_body(self) -> bool {
        !self.is_query_style()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::PATCH => "PATCH",
            Method::OPTIONS => "OPTIONS",
            Method::HEAD => "HEAD",
            Method::CONNECT => "CONNECT",
            Method::TRACE => "TRACE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            "PATCH" => Ok(Method::PATCH),
            "OPTIONS" => Ok(Method::OPTIONS),
            "HEAD" => Ok(Method::HEAD),
            "CONNECT" => Ok(Method::CONNECT),
            "TRACE" => Ok(Method::TRACE),
            _ => Err(Error::InvalidMethod {
                method: s.to_string(),
            }),
        }
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => http::Method::GET,
            Method::POST => http::Method::POST,
            Method::PUT => http::Method::PUT,
            Method::DELETE => http::Method::DELETE,
            Method::PATCH => http::Method::PATCH,
            Method::OPTIONS => http::Method::OPTIONS,
            Method::HEAD => http::Method::HEAD,
            Method::CONNECT => http::Method::CONNECT,
            Method::TRACE => http::Method::TRACE,
        }
    }
}

impl TryFrom<http::Method> for Method {
    type Error = Error;

    fn try_from(method: http::Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}

/// Query component appended to the request address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Pre-formatted query string, appended verbatim.
    Text(String),
    /// Key/value pairs, percent-encoded on the way out.
    Pairs(BTreeMap<String, String>),
}

impl Query {
    /// Build a query from pairs whose values are coerced to text.
    pub fn pairs<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        Query::Pairs(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        )
    }
}

impl From<&str> for Query {
    fn from(query: &str) -> Self {
        Query::Text(query.to_string())
    }
}

impl From<String> for Query {
    fn from(query: String) -> Self {
        Query::Text(query)
    }
}

impl From<BTreeMap<String, String>> for Query {
    fn from(pairs: BTreeMap<String, String>) -> Self {
        Query::Pairs(pairs)
    }
}

impl From<HashMap<String, String>> for Query {
    fn from(pairs: HashMap<String, String>) -> Self {
        Query::Pairs(pairs.into_iter().collect())
    }
}

/// Request body as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Sent byte-for-byte as given.
    Text(String),
    /// Serialized to JSON text before sending.
    Json(serde_json::Value),
}

impl Body {
    /// Render the body as the text that goes over the wire.
    pub fn into_payload(self) -> Result<String, Error> {
        match self {
            Body::Text(text) => Ok(text),
            Body::Json(value) => Ok(serde_json::to_string(&value)?),
        }
    }
}

impl From<&str> for Body {
    fn from(body: &str) -> Self {
        Body::Text(body.to_string())
    }
}

impl From<String> for Body {
    fn from(body: String) -> Self {
        Body::Text(body)
    }
}

impl From<serde_json::Value> for Body {
    fn from(body: serde_json::Value) -> Self {
        Body::Json(body)
    }
}

/// How a successful response body is decoded
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Parser {
    #[default]
    Json,
    Text,
}

/// A fully resolved request, ready for an executor.
///
/// Produced by [`crate::build_request`]: the query is already folded into
/// `url` and any structured body is already JSON text.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,

    /// Final address, query included. May be relative if the executor has a
    /// base URL.
    pub url: String,

    pub headers: HashMap<String, String>,

    pub body: Option<String>,

    /// Per-request timeout, handed to the transport untouched
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }
}

/// HTTP response from a request
///
/// The body is held undecoded. [`HttpResponse::text`] and
/// [`HttpResponse::json`] consume the response, so only one of them can run.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,

    /// Status text (e.g., "OK", "Not Found")
    pub status_text: String,

    /// Response headers, names lowercased
    pub headers: HashMap<String, String>,

    /// Raw body bytes
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        let status_text = http::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown")
            .to_string();
        Self {
            status,
            status_text,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Transport-level success indicator: status in [200, 300).
    pub fn ok(&self) -> bool {
        self.is_success()
    }

    /// Check if the response status indicates success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the response status indicates a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if the response status indicates a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Decode the body as UTF-8 text, replacing invalid sequences.
    pub fn text(self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    pub fn json(self) -> Result<serde_json::Value, Error> {
        serde_json::from_slice(&self.body).map_err(Error::Decode)
    }
}

/// A decoded success body
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    Json(serde_json::Value),
    Text(String),
}

impl Parsed {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Parsed::Json(value) => Some(value),
            Parsed::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Parsed::Text(text) => Some(text),
            Parsed::Json(_) => None,
        }
    }

    pub fn into_json(self) -> Option<serde_json::Value> {
        match self {
            Parsed::Json(value) => Some(value),
            Parsed::Text(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Parsed::Text(text) => Some(text),
            Parsed::Json(_) => None,
        }
    }

    /// Deserialize into a concrete type.
    ///
    /// Text bodies are read as a JSON string value.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, Error> {
        let value = match self {
            Parsed::Json(value) => value,
            Parsed::Text(text) => serde_json::Value::String(text),
        };
        serde_json::from_value(value).map_err(Error::Decode)
    }
}
