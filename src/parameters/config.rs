// Parameter splitting configuration
//
// Holds the parameter names read from the params file and how they are sent:
// how many per request (batch size), with which method, and encoded how.

use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// How a parameter batch is written into a request body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamsEncoding {
    /// `application/x-www-form-urlencoded`
    #[default]
    Url,
    /// `application/json`
    Json,
}

impl ParamsEncoding {
    /// Parse a lower-cased selector; `None` for unknown values.
    pub fn from_selector(selector: &str) -> Option<Self> {
        match selector {
            "" | "url" | "form" => Some(ParamsEncoding::Url),
            "json" => Some(ParamsEncoding::Json),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ParamsEncoding::Url => "application/x-www-form-urlencoded",
            ParamsEncoding::Json => "application/json",
        }
    }
}

impl fmt::Display for ParamsEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamsEncoding::Url => write!(f, "url"),
            ParamsEncoding::Json => write!(f, "json"),
        }
    }
}

/// Parameter splitting settings. With no params, alteration is the identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamsCfg {
    pub params: Vec<String>,
    /// Parameters per template; 0 puts every parameter in a single template.
    pub size: usize,
    /// Upper-cased method override; empty keeps the template's method.
    pub method: String,
    pub encoding: ParamsEncoding,
}

impl ParamsCfg {
    /// Build a config, normalizing method (upper) and encoding (lower) case.
    pub fn new(params: Vec<String>, size: usize, method: &str, encoding: &str) -> Self {
        let selector = encoding.trim().to_lowercase();
        let encoding = ParamsEncoding::from_selector(&selector).unwrap_or_else(|| {
            warn!("Unknown params encoding ({}), falling back to url", selector);
            ParamsEncoding::Url
        });

        Self {
            params,
            size,
            method: method.trim().to_uppercase(),
            encoding,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Consecutive batches of at most `size` parameters, in list order.
    pub fn batches(&self) -> std::slice::Chunks<'_, String> {
        let size = if self.size == 0 { self.params.len().max(1) } else { self.size };
        self.params.chunks(size)
    }
}

/// Read parameter names, one per line, trimmed. Order, duplicates and blank
/// names are kept. Bytes that are not UTF-8 are replaced, not rejected.
pub fn read_params_file(path: &Path) -> Result<Vec<String>, std::io::Error> {
    info!("Reading params file from: {}", path.display());

    let reader = BufReader::new(File::open(path)?);
    let mut params = Vec::new();
    for (n, line) in reader.split(b'\n').enumerate() {
        let line = line?;
        let name = String::from_utf8_lossy(&line);
        if let Cow::Owned(_) = name {
            warn!("Params file ({}) line {} is not valid UTF-8", path.display(), n + 1);
        }
        params.push(name.trim().to_string());
    }
    Ok(params)
}
