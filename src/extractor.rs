// Query byte extraction for match rules
// Concatenates, in finder order, the bytes of every query insertion point of one part

use crate::entrypoint::{EntrypointFinder, QueryFinder};
use crate::models::{ParamPart, ParameterLocation};
use crate::request::Request;

/// All query parameter names, concatenated.
pub fn query_name_bytes(request: &Request) -> Vec<u8> {
    query_bytes(request, ParamPart::Name)
}

/// All query parameter values, concatenated.
pub fn query_value_bytes(request: &Request) -> Vec<u8> {
    query_bytes(request, ParamPart::Value)
}

/// An empty buffer means the request has no query parameters of that part.
pub fn query_bytes(request: &Request, part: ParamPart) -> Vec<u8> {
    let mut buf = Vec::new();
    for point in QueryFinder.find(request) {
        if point.location() == ParameterLocation::Query && point.part() == part {
            buf.extend_from_slice(point.value());
        }
    }
    buf
}
