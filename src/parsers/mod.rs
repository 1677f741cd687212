// Capture parsers for Templar
// Each parser turns the bytes of one source file into captured requests

pub mod bundle;
pub mod raw;

pub use bundle::{Bundle, BundleEntry, BundleParser};
pub use raw::RawRequestParser;

use crate::error::ParseError;
use crate::request::Request;

/// A request read from a source, with its response when one was captured.
#[derive(Debug, Clone)]
pub struct Capture {
    pub request: Request,
    pub response: Option<Vec<u8>>,
}

/// Trait for parsing request sources (bundles, raw request text, ...)
pub trait CaptureParser {
    /// Parse source bytes and return the captured requests in source order
    fn parse(&self, bytes: &[u8]) -> Result<Vec<Capture>, ParseError>;
}
