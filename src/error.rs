// Error types for Templar
// Uses thiserror; every fatal failure carries the source it came from

use thiserror::Error;

/// Failures while turning captured bytes into requests.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed requests bundle: {0}")]
    Bundle(#[from] serde_json::Error),

    #[error("bundle entry {entry} is not valid base64: {source}")]
    Encoding {
        entry: usize,
        #[source]
        source: base64::DecodeError,
    },

    #[error("bundle entry {entry}: {source}")]
    Entry {
        entry: usize,
        #[source]
        source: Box<ParseError>,
    },

    #[error("malformed raw request: {0}")]
    RawRequest(String),

    #[error("invalid url ({url}): {source}")]
    Url {
        url: String,
        #[source]
        source: UrlError,
    },
}

/// URL validation failures.
#[derive(Error, Debug)]
pub enum UrlError {
    #[error("empty url")]
    Empty,

    #[error("{0}")]
    Parse(#[from] url::ParseError),

    #[error("unsupported scheme: {0}")]
    Scheme(String),

    #[error("missing host")]
    MissingHost,

    #[error("not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
}

/// Template store failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{0}")]
    Rejected(String),
}

/// Underlying cause of a requests file failure.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors that abort template preparation.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("could not process request(s) file({path}): {source}")]
    ProcessRequestFile {
        path: String,
        #[source]
        source: SourceError,
    },

    #[error("could not process url(s) file({path}): {source}")]
    ProcessUrlsFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("invalid url ({url}): {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: UrlError,
    },

    #[error("could not store template for {target}: {source}")]
    Store {
        target: String,
        #[source]
        source: StoreError,
    },
}

impl TemplateError {
    pub(crate) fn request_file(path: &str, source: impl Into<SourceError>) -> Self {
        TemplateError::ProcessRequestFile {
            path: path.to_string(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TemplateError>;
