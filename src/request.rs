// HTTP request model for Templar
// Owns method, target URL, ordered headers and body bytes; parses and renders raw HTTP text

use crate::error::ParseError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref REQUEST_LINE: Regex =
        Regex::new(r"^([A-Za-z][A-Za-z0-9_-]*)\s+(\S+)(?:\s+(HTTP/\d+(?:\.\d+)?))?\s*$").unwrap();
}

const DEFAULT_PROTO: &str = "HTTP/1.1";

/// A single header line; order in [`Request::headers`] is the emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An HTTP request as captured or built, ready to be replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    /// Absolute target URL (`scheme://authority/path?query`).
    pub url: String,
    pub proto: String,
    pub headers: Vec<Header>,
    #[serde(with = "base64_bytes")]
    pub body: Vec<u8>,
}

impl Request {
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_uppercase(),
            url: url.to_string(),
            proto: DEFAULT_PROTO.to_string(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Parse one raw HTTP request.
    ///
    /// Origin-form targets (`/path?q`) are resolved against `base` when given
    /// (e.g. `https://example.com:8443`), otherwise against `http://` plus the
    /// `Host` header.
    pub fn from_raw(bytes: &[u8], base: Option<&str>) -> Result<Self, ParseError> {
        let (head, body) = split_head(bytes);
        let head = std::str::from_utf8(head)
            .map_err(|e| ParseError::RawRequest(format!("request head is not UTF-8: {}", e)))?;

        let mut lines = head
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .skip_while(|l| l.trim().is_empty());

        let request_line = lines
            .next()
            .ok_or_else(|| ParseError::RawRequest("empty request".to_string()))?;
        let caps = REQUEST_LINE
            .captures(request_line)
            .ok_or_else(|| ParseError::RawRequest(format!("invalid request line: {}", request_line)))?;

        let method = &caps[1];
        let target = &caps[2];
        let proto = caps.get(3).map_or(DEFAULT_PROTO, |m| m.as_str());

        let mut headers = Vec::new();
        for line in lines {
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| ParseError::RawRequest(format!("invalid header line: {}", line)))?;
            headers.push(Header::new(name.trim(), value.trim()));
        }

        let url = if target.starts_with("http://") || target.starts_with("https://") {
            target.to_string()
        } else if target.starts_with('/') {
            let origin = match base {
                Some(base) => base.trim_end_matches('/').to_string(),
                None => {
                    let host = headers
                        .iter()
                        .find(|h| h.name.eq_ignore_ascii_case("host"))
                        .map(|h| h.value.as_str())
                        .filter(|h| !h.is_empty())
                        .ok_or_else(|| ParseError::RawRequest("missing Host header".to_string()))?;
                    format!("http://{}", host)
                }
            };
            format!("{}{}", origin, target)
        } else {
            return Err(ParseError::RawRequest(format!("unsupported request target: {}", target)));
        };

        Ok(Self {
            method: method.to_uppercase(),
            url,
            proto: proto.to_string(),
            headers,
            body: body.to_vec(),
        })
    }

    /// Render the request as raw HTTP bytes, headers in stored order.
    pub fn to_raw(&self) -> Vec<u8> {
        let mut raw = format!("{} {} {}\r\n", self.method, self.path_and_query(), self.proto);
        for h in &self.headers {
            raw.push_str(&format!("{}: {}\r\n", h.name, h.value));
        }
        raw.push_str("\r\n");

        let mut bytes = raw.into_bytes();
        bytes.extend_from_slice(&self.body);
        bytes
    }

    /// First header value matching `name`, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Replace the first header named `name`, or append it.
    pub fn set_header(&mut self, name: &str, value: &str) {
        match self.headers.iter_mut().find(|h| h.name.eq_ignore_ascii_case(name)) {
            Some(h) => h.value = value.to_string(),
            None => self.headers.push(Header::new(name, value)),
        }
    }

    /// Replace the body, keeping an existing `Content-Length` in sync.
    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = body;
        if self.header("Content-Length").is_some() {
            let len = self.body.len().to_string();
            self.set_header("Content-Length", &len);
        }
    }

    /// `scheme://authority` part of the URL.
    pub fn origin(&self) -> &str {
        split_url(&self.url).0
    }

    /// Authority (host and optional port) of the URL.
    pub fn authority(&self) -> &str {
        let origin = self.origin();
        origin.split_once("://").map_or(origin, |(_, authority)| authority)
    }

    /// Path and query as sent on the request line; never empty.
    pub fn path_and_query(&self) -> String {
        let rest = split_url(&self.url).1;
        let rest = rest.split_once('#').map_or(rest, |(before, _)| before);
        if rest.starts_with('/') {
            rest.to_string()
        } else {
            format!("/{}", rest)
        }
    }

    /// Raw query string (without `?` and fragment), if the URL has one.
    pub fn query(&self) -> Option<&str> {
        let rest = split_url(&self.url).1;
        let rest = rest.split_once('#').map_or(rest, |(before, _)| before);
        rest.split_once('?').map(|(_, query)| query)
    }

    /// Append already-encoded `pairs` to the query string, before any fragment.
    pub fn append_query(&mut self, pairs: &str) {
        if pairs.is_empty() {
            return;
        }
        let (base, fragment) = match self.url.split_once('#') {
            Some((base, fragment)) => (base.to_string(), Some(fragment.to_string())),
            None => (self.url.clone(), None),
        };

        let mut url = base;
        match self.query() {
            None => url.push('?'),
            Some(q) if !q.is_empty() && !q.ends_with('&') => url.push('&'),
            Some(_) => {}
        }
        url.push_str(pairs);

        if let Some(fragment) = fragment {
            url.push('#');
            url.push_str(&fragment);
        }
        self.url = url;
    }
}

/// Split `scheme://authority` from the remainder of a URL.
fn split_url(url: &str) -> (&str, &str) {
    let after_scheme = url.find("://").map_or(0, |i| i + 3);
    let end = url[after_scheme..]
        .find(|c: char| c == '/' || c == '?' || c == '#')
        .map_or(url.len(), |i| after_scheme + i);
    url.split_at(end)
}

/// Split a raw request into head and body at the first empty line.
fn split_head(bytes: &[u8]) -> (&[u8], &[u8]) {
    let crlf = find(bytes, b"\r\n\r\n").map(|i| (i, 4));
    let lf = find(bytes, b"\n\n").map(|i| (i, 2));
    let sep = match (crlf, lf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    };
    match sep {
        Some((i, len)) => (&bytes[..i], &bytes[i + len..]),
        None => (bytes, &[]),
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Serde adapter storing byte buffers as base64 strings.
pub(crate) mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(d)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
            match bytes {
                Some(b) => s.serialize_some(&STANDARD.encode(b)),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
            Option::<String>::deserialize(d)?
                .map(|encoded| STANDARD.decode(encoded).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}
