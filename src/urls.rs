// URL validation and URL list files for Templar
// One validation primitive shared by the strict (inline) and lenient (file) paths

use crate::error::UrlError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use url::Url;

/// Validate a target URL and return its normalized form.
///
/// Scheme-less inputs get `http://`; the result must be http(s) with a host.
/// The original text is kept otherwise, so raw query bytes survive untouched.
pub fn validate_url(raw: &str) -> Result<String, UrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let candidate = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let parsed = Url::parse(&candidate)?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::Scheme(other.to_string())),
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(candidate)
}

/// Whether the input starts with `scheme://`. A `://` later in the path or
/// query (redirect parameters) does not count.
fn has_scheme(input: &str) -> bool {
    match input.find("://") {
        Some(0) | None => false,
        Some(end) => input[..end]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
    }
}

/// A line of a URLs file that failed validation.
#[derive(Debug)]
pub struct SkippedLine {
    pub line: usize,
    pub text: String,
    pub reason: UrlError,
}

/// URLs read from a file, plus the lines that were left out.
#[derive(Debug, Default)]
pub struct UrlList {
    pub urls: Vec<String>,
    pub skipped: Vec<SkippedLine>,
}

/// Read one URL per line. Invalid lines (including ones that are not UTF-8) are
/// collected in `skipped`, not returned as errors; only failing to read the file
/// is an error. Blank lines are ignored.
pub fn read_urls_file(path: &Path) -> Result<UrlList, std::io::Error> {
    let reader = BufReader::new(File::open(path)?);

    let mut list = UrlList::default();
    for (n, line) in reader.split(b'\n').enumerate() {
        let line = line?;
        let line = line.strip_suffix(b"\r").unwrap_or(&line);

        let checked = std::str::from_utf8(line)
            .map_err(UrlError::from)
            .and_then(|text| {
                if text.trim().is_empty() {
                    return Ok(None);
                }
                validate_url(text).map(Some)
            });

        match checked {
            Ok(Some(url)) => list.urls.push(url),
            Ok(None) => {}
            Err(reason) => list.skipped.push(SkippedLine {
                line: n + 1,
                text: String::from_utf8_lossy(line).into_owned(),
                reason,
            }),
        }
    }
    Ok(list)
}
