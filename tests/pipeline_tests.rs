/// Integration tests for the template preparation pipeline
/// Covers source selection, index numbering, and fatal vs skippable failures
use std::fs;
use std::path::{Path, PathBuf};
use templar::config::Config;
use templar::error::{SourceError, StoreError, TemplateError};
use templar::models::Template;
use templar::parsers::{Bundle, BundleEntry};
use templar::pipeline::prepare_templates;
use templar::store::{MemoryStore, TemplateStore};
use tempfile::TempDir;

/// Store that accepts `limit` templates and rejects the next one
struct FailingStore {
    inner: MemoryStore,
    limit: usize,
}

impl TemplateStore for FailingStore {
    fn store(&mut self, template: &Template) -> Result<(), StoreError> {
        if self.inner.templates().len() >= self.limit {
            return Err(StoreError::Rejected("disk full".to_string()));
        }
        self.inner.store(template)
    }
}

fn write(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("Should write test file");
    path
}

fn raw_request(path: &str) -> Vec<u8> {
    format!("GET {} HTTP/1.1\r\nHost: target.test\r\nAccept: */*\r\n\r\n", path).into_bytes()
}

fn run(cfg: Config) -> (Result<usize, TemplateError>, Vec<Template>) {
    let mut store = MemoryStore::new();
    let result = prepare_templates(&mut store, cfg);
    (result, store.into_templates())
}

fn indices(templates: &[Template]) -> Vec<usize> {
    templates.iter().map(|t| t.idx).collect()
}

#[test]
fn test_inline_url_without_overrides_yields_one_template() {
    let cfg = Config {
        urls: vec!["http://target.test/search?q=1".to_string()],
        ..Config::default()
    };

    let (result, templates) = run(cfg);
    assert_eq!(result.unwrap(), 1);
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].idx, 0);
    assert_eq!(templates[0].request.method, "GET");
    assert_eq!(templates[0].request.url, "http://target.test/search?q=1");
    assert!(templates[0].response.is_none());
}

#[test]
fn test_inline_overrides_are_applied() {
    let cfg = Config {
        urls: vec!["target.test/login".to_string()],
        method: Some("post".to_string()),
        data: vec!["user=a".to_string(), "pass=b".to_string()],
        headers: vec!["X-Api-Key: secret".to_string()],
        ..Config::default()
    };

    let (result, templates) = run(cfg);
    assert!(result.is_ok());
    let req = &templates[0].request;
    assert_eq!(req.url, "http://target.test/login", "Scheme-less url should get http://");
    assert_eq!(req.method, "POST");
    assert_eq!(req.body, b"user=a&pass=b");
    assert_eq!(req.header("X-Api-Key"), Some("secret"));
}

#[test]
fn test_invalid_inline_url_aborts_before_storing_it() {
    let cfg = Config {
        urls: vec![
            "http://first.test/".to_string(),
            "not a url".to_string(),
            "http://third.test/".to_string(),
        ],
        ..Config::default()
    };

    let (result, templates) = run(cfg);
    match result {
        Err(TemplateError::InvalidUrl { url, .. }) => assert_eq!(url, "not a url"),
        other => panic!("Expected invalid url error, got {:?}", other),
    }
    // Only the template built before the invalid url was stored
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].request.url, "http://first.test/");
}

#[test]
fn test_header_without_colon_aborts_before_any_template() {
    let cfg = Config {
        urls: vec!["http://target.test/".to_string()],
        headers: vec!["X-Test".to_string()],
        ..Config::default()
    };

    let (result, templates) = run(cfg);
    assert!(matches!(result, Err(TemplateError::InvalidHeader(ref h)) if h == "X-Test"));
    assert!(templates.is_empty(), "No template should be persisted");
}

#[test]
fn test_urls_file_skips_invalid_lines() {
    let dir = TempDir::new().unwrap();
    let urls = write(&dir, "urls.txt", b"http://good.test/a?x=1\nnot a url\n");

    let cfg = Config {
        urls_file: Some(urls),
        ..Config::default()
    };

    let (result, templates) = run(cfg);
    assert_eq!(result.unwrap(), 1, "Invalid line should be skipped, not fatal");
    assert_eq!(templates[0].request.url, "http://good.test/a?x=1");
}

#[test]
fn test_urls_file_skips_non_utf8_lines() {
    let dir = TempDir::new().unwrap();
    let urls = write(&dir, "urls.txt", b"http://good.test/\n\xff\xfe garbage\n");

    let cfg = Config {
        urls_file: Some(urls),
        ..Config::default()
    };

    let (result, templates) = run(cfg);
    assert_eq!(result.unwrap(), 1, "A non UTF-8 line is skipped like any invalid line");
    assert_eq!(templates[0].request.url, "http://good.test/");
}

#[test]
fn test_inline_url_with_redirect_parameter() {
    let cfg = Config {
        urls: vec!["example.com/login?next=http://other.test/".to_string()],
        ..Config::default()
    };

    let (result, templates) = run(cfg);
    assert_eq!(result.unwrap(), 1);
    assert_eq!(templates[0].request.url, "http://example.com/login?next=http://other.test/");
}

#[test]
fn test_urls_file_merges_with_inline_urls() {
    let dir = TempDir::new().unwrap();
    let urls = write(&dir, "urls.txt", b"http://from-file.test/\n");

    let cfg = Config {
        urls: vec!["http://inline.test/".to_string()],
        urls_file: Some(urls),
        ..Config::default()
    };

    let (result, templates) = run(cfg);
    assert_eq!(result.unwrap(), 2);
    assert_eq!(templates[0].request.url, "http://inline.test/");
    assert_eq!(templates[1].request.url, "http://from-file.test/");
    assert_eq!(indices(&templates), vec![0, 1]);
}

#[test]
fn test_missing_urls_file_is_fatal() {
    let cfg = Config {
        urls_file: Some(PathBuf::from("/nonexistent/urls.txt")),
        urls: vec!["http://target.test/".to_string()],
        ..Config::default()
    };

    let (result, templates) = run(cfg);
    match result {
        Err(TemplateError::ProcessUrlsFile { path, .. }) => assert_eq!(path, "/nonexistent/urls.txt"),
        other => panic!("Expected urls file error, got {:?}", other),
    }
    assert!(templates.is_empty());
}

#[test]
fn test_raw_request_indices_continue_across_files() {
    let dir = TempDir::new().unwrap();
    let first = write(&dir, "first.req", &raw_request("/one"));
    let second = write(&dir, "second.req", &raw_request("/two"));
    let params = write(&dir, "params.txt", b"a\nb\nc\n");

    let cfg = Config {
        raw_requests: vec![first, second],
        params_file: Some(params),
        params_split: 2,
        ..Config::default()
    };

    let (result, templates) = run(cfg);
    assert_eq!(result.unwrap(), 4);
    assert_eq!(indices(&templates), vec![0, 1, 2, 3], "Indices must be dense across files");
    assert_eq!(templates[0].request.url, "http://target.test/one?a=&b=");
    assert_eq!(templates[1].request.url, "http://target.test/one?c=");
    assert_eq!(templates[2].request.url, "http://target.test/two?a=&b=");
    assert_eq!(templates[3].request.url, "http://target.test/two?c=");
}

#[test]
fn test_raw_request_directory_is_expanded_in_name_order() {
    let dir = TempDir::new().unwrap();
    let reqs = dir.path().join("reqs");
    fs::create_dir(&reqs).unwrap();
    fs::write(reqs.join("b.req"), raw_request("/b")).unwrap();
    fs::write(reqs.join("a.req"), raw_request("/a")).unwrap();

    let cfg = Config {
        raw_requests: vec![reqs],
        ..Config::default()
    };

    let (result, templates) = run(cfg);
    assert_eq!(result.unwrap(), 2);
    assert_eq!(templates[0].request.url, "http://target.test/a");
    assert_eq!(templates[1].request.url, "http://target.test/b");
}

#[test]
fn test_missing_raw_request_file_names_the_path() {
    let dir = TempDir::new().unwrap();
    let good = write(&dir, "good.req", &raw_request("/ok"));
    let missing = dir.path().join("missing.req");

    let cfg = Config {
        raw_requests: vec![good, missing.clone()],
        ..Config::default()
    };

    let (result, templates) = run(cfg);
    match result {
        Err(TemplateError::ProcessRequestFile { path, source: SourceError::Io(_) }) => {
            assert_eq!(Path::new(&path), missing.as_path())
        }
        other => panic!("Expected request file I/O error, got {:?}", other),
    }
    assert_eq!(templates.len(), 1, "Templates from earlier files stay stored");
}

#[test]
fn test_malformed_raw_request_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let bad = write(&dir, "bad.req", b"GET / HTTP/1.1\r\nAccept: */*\r\n\r\n");

    let cfg = Config {
        raw_requests: vec![bad],
        ..Config::default()
    };

    let (result, _) = run(cfg);
    assert!(matches!(
        result,
        Err(TemplateError::ProcessRequestFile { source: SourceError::Parse(_), .. })
    ));
}

#[test]
fn test_requests_file_wins_over_other_sources() {
    let dir = TempDir::new().unwrap();
    let mut bundle = Bundle::default();
    bundle.push(BundleEntry::new(&raw_request("/captured")).with_response(b"HTTP/1.1 200 OK\r\n\r\nhi"));
    let bundle_path = write(&dir, "scan.json", &bundle.to_bytes().unwrap());
    let raw = write(&dir, "ignored.req", &raw_request("/ignored"));

    let cfg = Config {
        requests_file: Some(bundle_path),
        raw_requests: vec![raw],
        urls: vec!["http://ignored.test/".to_string()],
        ..Config::default()
    };

    let (result, templates) = run(cfg);
    assert_eq!(result.unwrap(), 1);
    assert_eq!(templates[0].request.url, "http://target.test/captured");
    assert_eq!(templates[0].response.as_deref(), Some(&b"HTTP/1.1 200 OK\r\n\r\nhi"[..]));
}

#[test]
fn test_missing_requests_file_is_fatal() {
    let cfg = Config {
        requests_file: Some(PathBuf::from("/nonexistent/scan.json")),
        ..Config::default()
    };

    let (result, _) = run(cfg);
    let err = result.expect_err("Missing bundle must abort the run");
    assert!(err.to_string().starts_with("could not process request(s) file(/nonexistent/scan.json)"));
}

#[test]
fn test_unreadable_params_file_is_not_fatal() {
    let cfg = Config {
        urls: vec!["http://target.test/".to_string()],
        params_file: Some(PathBuf::from("/nonexistent/params.txt")),
        params_split: 1,
        ..Config::default()
    };

    let (result, templates) = run(cfg);
    assert_eq!(result.unwrap(), 1, "Run proceeds without splitting");
    assert_eq!(templates[0].request.url, "http://target.test/");
}

#[test]
fn test_params_file_with_invalid_utf8_still_splits() {
    let dir = TempDir::new().unwrap();
    let params = write(&dir, "params.txt", b"id\n\xffname\n");

    let cfg = Config {
        urls: vec!["http://target.test/".to_string()],
        params_file: Some(params),
        params_split: 1,
        ..Config::default()
    };

    let (result, templates) = run(cfg);
    assert_eq!(result.unwrap(), 2, "Every params line yields its own template");
    assert_eq!(templates[0].request.url, "http://target.test/?id=");
}

#[test]
fn test_blank_params_lines_count_towards_batches() {
    let dir = TempDir::new().unwrap();
    let params = write(&dir, "params.txt", b"a\n\nb\n");

    let cfg = Config {
        urls: vec!["http://target.test/".to_string()],
        params_file: Some(params),
        params_split: 2,
        ..Config::default()
    };

    let (result, templates) = run(cfg);
    assert_eq!(result.unwrap(), 2, "Three names in batches of two");
    assert_eq!(templates[1].request.url, "http://target.test/?b=");
}

#[test]
fn test_params_file_applies_to_inline_urls() {
    let dir = TempDir::new().unwrap();
    let params = write(&dir, "params.txt", b"id\nrole\nadmin\n");

    let cfg = Config {
        urls: vec!["http://a.test/".to_string(), "http://b.test/".to_string()],
        params_file: Some(params),
        params_split: 2,
        params_method: "post".to_string(),
        params_encoding: "json".to_string(),
        ..Config::default()
    };

    let (result, templates) = run(cfg);
    assert_eq!(result.unwrap(), 4);
    assert_eq!(indices(&templates), vec![0, 1, 2, 3]);
    assert!(templates.iter().all(|t| t.request.method == "POST"));
    assert_eq!(templates[0].request.header("Content-Type"), Some("application/json"));
    let body: serde_json::Value = serde_json::from_slice(&templates[3].request.body).unwrap();
    assert_eq!(body, serde_json::json!({ "admin": "" }));
}

#[test]
fn test_store_failure_aborts_without_rollback() {
    let mut store = FailingStore {
        inner: MemoryStore::new(),
        limit: 1,
    };
    let cfg = Config {
        urls: vec!["http://a.test/".to_string(), "http://b.test/".to_string()],
        ..Config::default()
    };

    let result = prepare_templates(&mut store, cfg);
    match result {
        Err(TemplateError::Store { target, .. }) => assert_eq!(target, "http://b.test/"),
        other => panic!("Expected store error, got {:?}", other),
    }
    assert_eq!(store.inner.templates().len(), 1);
}
