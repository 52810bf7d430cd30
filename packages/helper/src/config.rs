//! Per-call configuration.
//!
//! One flat struct with optional fields. Nothing here is validated until
//! [`crate::build_request`] resolves it.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::error::Error;
use crate::types::{Body, HttpResponse, Method, Parser, Query};

/// Callback run with the raw failure response before the failure is signaled.
pub type ErrorCallback = Box<dyn FnOnce(&HttpResponse) + Send>;

/// Options handed to the transport without interpretation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportOptions {
    pub headers: HashMap<String, String>,
    pub timeout: Option<Duration>,
}

/// Behavior of a single [`crate::call`].
///
/// ```ignore
/// use reqhelper::{call, Parser, RequestConfig};
///
/// let config = RequestConfig::get()
///     .with_query_pair("limit", 2)
///     .with_header("Accept", "application/json")
///     .parser(Parser::Json);
/// let items = call(&executor, "https://api.test/items", config).await?;
/// ```
pub struct RequestConfig {
    /// Defaults to GET when absent.
    pub method: Option<Method>,
    pub query: Option<Query>,
    pub body: Option<Body>,
    pub parser: Parser,
    /// When false, a non-2xx response yields `Ok(None)` instead of an error.
    pub throw_error: bool,
    pub on_error: Option<ErrorCallback>,
    pub options: TransportOptions,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            method: None,
            query: None,
            body: None,
            parser: Parser::default(),
            throw_error: true,
            on_error: None,
            options: TransportOptions::default(),
        }
    }
}

impl fmt::Debug for RequestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestConfig")
            .field("method", &self.method)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("parser", &self.parser)
            .field("throw_error", &self.throw_error)
            .field("on_error", &self.on_error.as_ref().map(|_| "<callback>"))
            .field("options", &self.options)
            .finish()
    }
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(method: Method) -> Self {
        Self {
            method: Some(method),
            ..Default::default()
        }
    }

    pub fn get() -> Self {
        Self::with_method(Method::GET)
    }

    pub fn post() -> Self {
        Self::with_method(Method::POST)
    }

    pub fn put() -> Self {
        Self::with_method(Method::PUT)
    }

    pub fn patch() -> Self {
        Self::with_method(Method::PATCH)
    }

    pub fn delete() -> Self {
        Self::with_method(Method::DELETE)
    }

    pub fn head() -> Self {
        Self::with_method(Method::HEAD)
    }

    pub fn options() -> Self {
        Self::with_method(Method::OPTIONS)
    }

    /// The method this config resolves to.
    pub fn resolved_method(&self) -> Method {
        self.method.unwrap_or_default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_query(mut self, query: impl Into<Query>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Add one key/value pair, coercing the value to text.
    ///
    /// Replaces a pre-formatted text query if one was set.
    pub fn with_query_pair(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        let mut pairs = match self.query.take() {
            Some(Query::Pairs(pairs)) => pairs,
            Some(Query::Text(text)) => {
                tracing::debug!(query = %text, "text query replaced by key/value pairs");
                Default::default()
            }
            None => Default::default(),
        };
        pairs.insert(name.into(), value.to_string());
        self.query = Some(Query::Pairs(pairs));
        self
    }

    /// Serialize any serde value as the JSON body.
    pub fn with_body(mut self, body: impl Serialize) -> Result<Self, Error> {
        self.body = Some(Body::Json(serde_json::to_value(body)?));
        Ok(self)
    }

    pub fn with_json_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    pub fn with_text_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Body::Text(body.into()));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    pub fn parser(mut self, parser: Parser) -> Self {
        self.parser = parser;
        self
    }

    pub fn throw_error(mut self, throw_error: bool) -> Self {
        self.throw_error = throw_error;
        self
    }

    pub fn on_error(mut self, callback: impl FnOnce(&HttpResponse) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }
}
