// Request options for URL targets
// Builds requests from inline configuration: method, body data and headers

use crate::config::Config;
use crate::error::TemplateError;
use crate::request::Request;
use tracing::info;

pub const DEFAULT_USER_AGENT: &str = concat!("templar/", env!("CARGO_PKG_VERSION"));

/// Overrides applied on top of the default request for every URL target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    method: Option<String>,
    data: Option<Vec<u8>>,
    headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the overrides configured inline. Fails on the first header that
    /// is not `Key: Value`.
    pub fn from_config(cfg: &Config) -> Result<Self, TemplateError> {
        let mut options = RequestOptions::new();

        if let Some(method) = cfg.method.as_deref().filter(|m| !m.trim().is_empty()) {
            info!("HTTP method inherited from config: {}", method);
            options = options.method(method);
        }

        if !cfg.data.is_empty() {
            let data = cfg.data.join("&");
            info!("Payload data inherited from config: {}", data);
            options = options.data(data.into_bytes());
        }

        if !cfg.headers.is_empty() {
            info!("HTTP headers inherited from config: {}", cfg.headers.join(", "));
            for raw in &cfg.headers {
                let (key, value) = parse_header(raw)?;
                options = options.header(&key, &value);
            }
        }

        Ok(options)
    }

    pub fn method(mut self, method: &str) -> Self {
        self.method = Some(method.trim().to_uppercase());
        self
    }

    pub fn data(mut self, data: Vec<u8>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// Build the request for an already validated `url`.
    ///
    /// Defaults: `GET`, empty body, and `Host`, `User-Agent`, `Accept`,
    /// `Connection` headers. Data adds form `Content-Type` and `Content-Length`.
    /// A configured header replaces a default of the same name, otherwise it is
    /// appended, in configuration order.
    pub fn build(&self, url: &str) -> Request {
        let mut request = Request::new(self.method.as_deref().unwrap_or("GET"), url);

        let host = request.authority().to_string();
        request.set_header("Host", &host);
        request.set_header("User-Agent", DEFAULT_USER_AGENT);
        request.set_header("Accept", "*/*");
        request.set_header("Connection", "close");

        if let Some(data) = &self.data {
            request.set_header("Content-Type", "application/x-www-form-urlencoded");
            request.set_header("Content-Length", "0");
            request.set_body(data.clone());
        }

        for (key, value) in &self.headers {
            request.set_header(key, value);
        }
        request
    }
}

/// Split a `Key: Value` header on its first colon, trimming both halves.
pub fn parse_header(raw: &str) -> Result<(String, String), TemplateError> {
    match raw.split_once(':') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(TemplateError::InvalidHeader(raw.to_string())),
    }
}
