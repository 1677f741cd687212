// Core data models for Templar

use crate::entrypoint::{EntrypointFinder, InsertionPoint, QueryFinder};
use crate::request::{base64_bytes, Request};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Location of an insertion point in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    Path,
    Query,
    Body,
    Header,
}

/// Which half of a `name=value` parameter an insertion point covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamPart {
    Name,
    Value,
}

impl fmt::Display for ParamPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamPart::Name => write!(f, "name"),
            ParamPart::Value => write!(f, "value"),
        }
    }
}

/// A unit of scan work: one request, its index in the run, and the captured
/// response when the source had one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub idx: usize,
    pub request: Request,
    #[serde(default, with = "base64_bytes::option", skip_serializing_if = "Option::is_none")]
    pub response: Option<Vec<u8>>,
}

impl Template {
    pub fn new(idx: usize, request: Request, response: Option<Vec<u8>>) -> Self {
        Self {
            idx,
            request,
            response,
        }
    }

    /// Query insertion points of the request, recomputed on every call.
    pub fn query_entrypoints(&self) -> Vec<InsertionPoint<'_>> {
        QueryFinder.find(&self.request)
    }
}
