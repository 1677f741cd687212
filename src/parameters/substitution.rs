// Parameter Batch Encoding
//
// Writes a batch of parameter names into a query string or request body.
// Values are left empty; the scanner fills them in later through the
// insertion points they create.
//
// Example:
//   Batch:  ["id", "debug"]
//   Query:  "id=&debug="
//   Form:   b"x=1" -> b"x=1&id=&debug="
//   JSON:   b"{\"x\":1}" -> b"{\"x\":1,\"id\":\"\",\"debug\":\"\"}"
//
// Used by: alteration.rs

use serde_json::{Map, Value};
use url::form_urlencoded;

/// Form-encode the batch as `name=` pairs joined with `&`.
pub fn form_pairs(params: &[String]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|p| (p.as_str(), "")))
        .finish()
}

/// Append the batch to a form body.
pub fn append_form_body(body: &[u8], params: &[String]) -> Vec<u8> {
    let mut out = body.to_vec();
    if !out.is_empty() && !out.ends_with(b"&") {
        out.push(b'&');
    }
    out.extend_from_slice(form_pairs(params).as_bytes());
    out
}

/// Merge the batch into a JSON object body. Existing keys keep their values;
/// a body that is not a JSON object is replaced by a fresh object.
pub fn merge_json_body(body: &[u8], params: &[String]) -> Vec<u8> {
    let mut json = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    for p in params {
        json.entry(p.clone()).or_insert_with(|| Value::String(String::new()));
    }
    Value::Object(json).to_string().into_bytes()
}
