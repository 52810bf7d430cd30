use std::time::Duration;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

use reqhelper::{Method, Parser as BodyParser, RequestConfig};

/// reqhelper - send one HTTP request and print the decoded response
#[derive(Parser, Debug)]
#[command(name = "reqhelper")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Target address, absolute or relative to --base-url
    pub url: String,

    /// HTTP method (default GET)
    #[arg(short = 'X', long, value_parser = parse_method)]
    pub method: Option<Method>,

    /// Query parameter, repeatable
    #[arg(short, long = "query", value_name = "KEY=VALUE", value_parser = parse_query_pair)]
    pub query: Vec<(String, String)>,

    /// Pre-formatted query string, appended verbatim
    #[arg(long, value_name = "QUERY", conflicts_with = "query")]
    pub query_string: Option<String>,

    /// Request header, repeatable
    #[arg(short = 'H', long = "header", value_name = "NAME:VALUE", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Text body, sent unchanged
    #[arg(short, long, conflicts_with = "json")]
    pub data: Option<String>,

    /// JSON body, re-serialized before sending
    #[arg(long, value_parser = parse_json)]
    pub json: Option<serde_json::Value>,

    /// Print the body as text instead of decoding JSON
    #[arg(long)]
    pub text: bool,

    /// Treat a non-2xx status as "no value" instead of an error
    #[arg(long)]
    pub no_throw: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Base URL for relative addresses
    #[arg(long)]
    pub base_url: Option<String>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    pub log_level: LevelFilter,
}

impl Args {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Everything but the error callback, which the caller attaches.
    pub fn request_config(&self) -> RequestConfig {
        let mut config = RequestConfig::new();
        config.method = self.method;

        if let Some(query) = &self.query_string {
            config = config.with_query(query.as_str());
        }
        for (name, value) in &self.query {
            config = config.with_query_pair(name.as_str(), value);
        }

        for (name, value) in &self.headers {
            config = config.with_header(name.as_str(), value.as_str());
        }

        if let Some(data) = &self.data {
            config = config.with_text_body(data.as_str());
        }
        if let Some(json) = &self.json {
            config = config.with_json_body(json.clone());
        }

        if self.text {
            config = config.parser(BodyParser::Text);
        }

        config.throw_error(!self.no_throw)
    }
}

fn parse_method(s: &str) -> Result<Method, String> {
    s.parse().map_err(|e: reqhelper::Error| e.to_string())
}

fn parse_query_pair(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    match s.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected NAME:VALUE, got '{}'", s)),
    }
}

fn parse_json(s: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(s).map_err(|e| e.to_string())
}
