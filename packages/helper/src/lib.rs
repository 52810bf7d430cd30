//! # reqhelper
//!
//! A thin helper over an HTTP transport that removes the usual boilerplate
//! around a single request:
//!
//! - query strings built from key/value pairs (or appended verbatim)
//! - structured bodies serialized to JSON text
//! - one place to decide whether a non-2xx status is an error
//! - the success body decoded as JSON or text
//!
//! The helper keeps no state between calls. The transport is injected as an
//! [`HttpExecutor`], so tests can substitute their own.
//!
//! ## Example
//!
//! ```ignore
//! use reqhelper::{call, RequestConfig, ReqwestExecutor};
//!
//! let executor = ReqwestExecutor::with_default_timeout()?;
//!
//! // GET https://api.test/items?limit=2&offset=0, decoded as JSON
//! let items = call(
//!     &executor,
//!     "https://api.test/items",
//!     RequestConfig::get()
//!         .with_query_pair("limit", 2)
//!         .with_query_pair("offset", 0),
//! )
//! .await?;
//!
//! // POST with a JSON body; a 4xx/5xx becomes Ok(None) after the callback runs
//! let created = call(
//!     &executor,
//!     "https://api.test/items",
//!     RequestConfig::post()
//!         .with_body(&NewItem { name: "x" })?
//!         .throw_error(false)
//!         .on_error(|response| eprintln!("create failed: {}", response.status)),
//! )
//! .await?;
//! ```
//!
//! ## Blocking
//!
//! With the `blocking` feature (on by default), [`blocking::call`] offers the
//! same contract over `reqwest::blocking`.

pub mod config;
pub mod error;
pub mod executor;
pub mod types;

#[cfg(feature = "blocking")]
pub mod blocking;

mod request;

pub use config::{ErrorCallback, RequestConfig, TransportOptions};
pub use error::Error;
pub use executor::{HttpExecutor, ReqwestExecutor};
pub use request::{build_request, build_url, call};
pub use types::{Body, HttpRequest, HttpResponse, Method, Parsed, Parser, Query};
