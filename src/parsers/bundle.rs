// Captured-requests bundle parser
// Uses serde_json and base64 to read a bundle of previously captured requests
//
// Format:
//   {"entries": [{"url": "https://host:port", "request": "<base64>", "response": "<base64>"}]}
//
// `url` and `response` are optional. `url` supplies scheme and authority for
// requests whose request line only carries a path.

use super::{Capture, CaptureParser};
use crate::error::ParseError;
use crate::request::Request;
use crate::urls::validate_url;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(default)]
    pub entries: Vec<BundleEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub request: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

impl BundleEntry {
    pub fn new(raw_request: &[u8]) -> Self {
        Self {
            url: None,
            request: STANDARD.encode(raw_request),
            response: None,
        }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn with_response(mut self, raw_response: &[u8]) -> Self {
        self.response = Some(STANDARD.encode(raw_response));
        self
    }
}

impl Bundle {
    pub fn push(&mut self, entry: BundleEntry) {
        self.entries.push(entry);
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

pub struct BundleParser;

impl CaptureParser for BundleParser {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<Capture>, ParseError> {
        let bundle: Bundle = serde_json::from_slice(bytes)?;

        bundle
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                parse_entry(i, entry).map_err(|e| ParseError::Entry {
                    entry: i,
                    source: Box::new(e),
                })
            })
            .collect()
    }
}

fn parse_entry(i: usize, entry: &BundleEntry) -> Result<Capture, ParseError> {
    let decode = |encoded: &str| {
        STANDARD
            .decode(encoded.trim())
            .map_err(|source| ParseError::Encoding { entry: i, source })
    };

    let base = match &entry.url {
        Some(url) => Some(validate_url(url).map_err(|source| ParseError::Url {
            url: url.clone(),
            source,
        })?),
        None => None,
    };

    let raw = decode(&entry.request)?;
    let request = Request::from_raw(&raw, base.as_deref())?;
    let response = entry.response.as_deref().map(decode).transpose()?;

    Ok(Capture { request, response })
}
