// Raw request parser
// A raw request file holds exactly one plain-text HTTP request

use super::{Capture, CaptureParser};
use crate::error::ParseError;
use crate::request::Request;

pub struct RawRequestParser;

impl CaptureParser for RawRequestParser {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<Capture>, ParseError> {
        let request = Request::from_raw(bytes, None)?;
        Ok(vec![Capture {
            request,
            response: None,
        }])
    }
}
