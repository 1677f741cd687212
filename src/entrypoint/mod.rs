// Entrypoint discovery
//
// An entrypoint (insertion point) is a mutable location inside a request where a
// scanner injects payloads. Finders derive them from the request's current state;
// nothing here is stored, and every point borrows its bytes from the request.
//
//   query.rs   query-string names and values
//
// Header, body, path and cookie finders implement the same `EntrypointFinder`
// contract outside this crate.

pub mod query;

pub use query::QueryFinder;

use crate::models::{ParamPart, ParameterLocation};
use crate::request::Request;

/// A located insertion point and the bytes currently occupying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionPoint<'r> {
    location: ParameterLocation,
    part: ParamPart,
    value: &'r [u8],
}

impl<'r> InsertionPoint<'r> {
    pub fn new(location: ParameterLocation, part: ParamPart, value: &'r [u8]) -> Self {
        Self {
            location,
            part,
            value,
        }
    }

    pub fn location(&self) -> ParameterLocation {
        self.location
    }

    pub fn part(&self) -> ParamPart {
        self.part
    }

    pub fn value(&self) -> &'r [u8] {
        self.value
    }
}

/// Locates insertion points of one kind inside a request, in request order.
pub trait EntrypointFinder {
    fn find<'r>(&self, request: &'r Request) -> Vec<InsertionPoint<'r>>;
}
