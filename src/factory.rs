// Template factory for Templar
// Parses source bytes into base templates and splits each one by parameter batches

use crate::error::ParseError;
use crate::models::Template;
use crate::parameters::ParamsCfg;
use crate::parsers::{BundleParser, CaptureParser, RawRequestParser};
use tracing::debug;

/// How the bytes of a source file are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    /// A bundle of zero or more captured requests
    Bundle,
    /// Exactly one plain-text HTTP request
    Raw,
}

impl SourceMode {
    fn parser(self) -> &'static dyn CaptureParser {
        match self {
            SourceMode::Bundle => &BundleParser,
            SourceMode::Raw => &RawRequestParser,
        }
    }
}

pub struct TemplateFactory<'a> {
    params: &'a ParamsCfg,
}

impl<'a> TemplateFactory<'a> {
    pub fn new(params: &'a ParamsCfg) -> Self {
        Self { params }
    }

    /// Parse `bytes` and return the altered templates, indexed densely from
    /// `start_idx` in source order.
    pub fn parse(&self, mode: SourceMode, start_idx: usize, bytes: &[u8]) -> Result<Vec<Template>, ParseError> {
        let captures = mode.parser().parse(bytes)?;
        debug!("Parsed {} capture(s) in {:?} mode", captures.len(), mode);

        let mut templates = Vec::new();
        for capture in captures {
            let base = Template::new(start_idx + templates.len(), capture.request, capture.response);
            templates.extend(self.params.alter(base));
        }
        Ok(templates)
    }
}
