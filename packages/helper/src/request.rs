//! The request helper.
//!
//! A call moves through `build_request` (validation, query, body), one
//! executor round-trip, and `settle` (error callback, failure signaling,
//! body decoding). Only the round-trip differs between the async and the
//! blocking flavor.

use url::form_urlencoded;

use crate::config::{ErrorCallback, RequestConfig};
use crate::error::Error;
use crate::executor::HttpExecutor;
use crate::types::{HttpRequest, HttpResponse, Parsed, Parser, Query};

/// Append the query component to `address`.
///
/// Text queries are appended verbatim, pairs are form-urlencoded. Exactly one
/// `?` is added; `address` itself is never inspected.
pub fn build_url(address: &str, query: Option<&Query>) -> String {
    match query {
        None => address.to_string(),
        Some(Query::Text(text)) => format!("{}?{}", address, text),
        Some(Query::Pairs(pairs)) => {
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs)
                .finish();
            format!("{}?{}", address, encoded)
        }
    }
}

/// Resolve `config` into the payload an executor sends.
///
/// Rejects an empty address and a body on GET, HEAD or OPTIONS before any
/// I/O happens.
pub fn build_request(address: &str, config: &RequestConfig) -> Result<HttpRequest, Error> {
    if address.is_empty() {
        return Err(Error::InvalidUrl {
            message: "address is empty".to_string(),
        });
    }

    let method = config.resolved_method();
    if config.body.is_some() && !method.allows_body() {
        return Err(Error::BodyNotAllowed { method });
    }

    let body = config.body.clone().map(|b| b.into_payload()).transpose()?;

    Ok(HttpRequest {
        method,
        url: build_url(address, config.query.as_ref()),
        headers: config.options.headers.clone(),
        body,
        timeout: config.options.timeout,
    })
}

/// The parts of a config still needed once the response is in.
pub(crate) struct Settlement {
    parser: Parser,
    throw_error: bool,
    on_error: Option<ErrorCallback>,
}

impl Settlement {
    pub(crate) fn from_config(config: RequestConfig) -> Self {
        Self {
            parser: config.parser,
            throw_error: config.throw_error,
            on_error: config.on_error,
        }
    }

    /// Turn a response into the call's outcome.
    pub(crate) fn settle(self, response: HttpResponse) -> Result<Option<Parsed>, Error> {
        if !response.ok() {
            tracing::warn!(
                status = response.status,
                suppressed = !self.throw_error,
                "request failed"
            );

            if let Some(on_error) = self.on_error {
                on_error(&response);
            }

            return if self.throw_error {
                Err(Error::Status(Box::new(response)))
            } else {
                Ok(None)
            };
        }

        let parsed = match self.parser {
            Parser::Text => Parsed::Text(response.text()),
            Parser::Json => Parsed::Json(response.json()?),
        };
        Ok(Some(parsed))
    }
}

/// Send one request and decode or signal its outcome.
///
/// Returns `Ok(Some(_))` with the decoded body on a 2xx response. On any
/// other status the `on_error` callback runs first; then the response is
/// returned as [`Error::Status`], or `Ok(None)` when `throw_error` is false.
/// A malformed JSON body is [`Error::Decode`] whatever `throw_error` says.
pub async fn call(
    executor: &dyn HttpExecutor,
    address: &str,
    config: RequestConfig,
) -> Result<Option<Parsed>, Error> {
    let request = build_request(address, &config)?;
    let settlement = Settlement::from_config(config);

    tracing::debug!(method = %request.method, url = %request.url, "sending request");
    let response = executor.execute(&request).await?;
    tracing::debug!(status = response.status, "response received");

    settlement.settle(response)
}
