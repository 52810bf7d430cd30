use crate::types::{HttpResponse, Method};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The server answered with a non-2xx status. Carries the original response.
    #[error("HTTP status {} {}", .0.status, .0.status_text)]
    Status(Box<HttpResponse>),

    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid URL: {message}")]
    InvalidUrl { message: String },

    #[error("Invalid HTTP method: {method}")]
    InvalidMethod { method: String },

    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    #[error("{method} requests cannot carry a body")]
    BodyNotAllowed { method: Method },
}

impl Error {
    /// The failure response, if this error came from a non-2xx status.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            Error::Status(response) => Some(response),
            _ => None,
        }
    }

    /// Take the failure response out of the error.
    pub fn into_response(self) -> Option<HttpResponse> {
        match self {
            Error::Status(response) => Some(*response),
            _ => None,
        }
    }
}
