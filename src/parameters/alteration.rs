// Template alteration
//
// Splits one template into one template per parameter batch. The input is
// never modified; each output is a fresh copy carrying exactly one batch.

use super::config::{ParamsCfg, ParamsEncoding};
use super::substitution::{append_form_body, form_pairs, merge_json_body};
use crate::models::Template;
use crate::request::Request;
use tracing::debug;

/// Methods that carry parameters in the query string rather than the body.
const QUERY_METHODS: [&str; 5] = ["GET", "HEAD", "DELETE", "OPTIONS", "TRACE"];

impl ParamsCfg {
    /// Split `template` into one template per parameter batch.
    ///
    /// Without configured params this returns `[template]` unchanged. Output
    /// indices run from `template.idx` upwards, in batch order.
    pub fn alter(&self, template: Template) -> Vec<Template> {
        if self.is_empty() {
            return vec![template];
        }

        let altered: Vec<Template> = self
            .batches()
            .enumerate()
            .map(|(i, batch)| {
                let mut request = template.request.clone();
                if !self.method.is_empty() {
                    request.method = self.method.clone();
                }
                inject_batch(&mut request, batch, self.encoding);
                Template::new(template.idx + i, request, template.response.clone())
            })
            .collect();

        debug!(
            "Template {} split into {} template(s) for {} param(s)",
            template.idx,
            altered.len(),
            self.params.len()
        );
        altered
    }
}

fn inject_batch(request: &mut Request, batch: &[String], encoding: ParamsEncoding) {
    if QUERY_METHODS.contains(&request.method.as_str()) {
        request.append_query(&form_pairs(batch));
        return;
    }

    if request.body.is_empty() {
        request.set_header("Content-Type", encoding.content_type());
    }
    let body = match encoding {
        ParamsEncoding::Url => append_form_body(&request.body, batch),
        ParamsEncoding::Json => merge_json_body(&request.body, batch),
    };
    request.set_body(body);
}
