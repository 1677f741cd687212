// Query-string entrypoint finder
// Yields a name point and a value point for every `key=value` pair, in URL order

use super::{EntrypointFinder, InsertionPoint};
use crate::models::{ParamPart, ParameterLocation};
use crate::request::Request;

pub struct QueryFinder;

impl EntrypointFinder for QueryFinder {
    fn find<'r>(&self, request: &'r Request) -> Vec<InsertionPoint<'r>> {
        let query = match request.query() {
            Some(q) => q,
            None => return Vec::new(),
        };

        let mut points = Vec::new();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            // A bare key still has an (empty) value slot
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            points.push(InsertionPoint::new(ParameterLocation::Query, ParamPart::Name, name.as_bytes()));
            points.push(InsertionPoint::new(ParameterLocation::Query, ParamPart::Value, value.as_bytes()));
        }
        points
    }
}
