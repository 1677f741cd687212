// Template preparation pipeline for Templar
//
// Picks the source that drives the scan (first match wins):
//   1. captured-requests bundle
//   2. raw request files
//   3. URLs file, merged into the inline URL list, then 4
//   4. inline URLs with method/data/header overrides
// and stores every template it builds, in construction order.

use crate::config::Config;
use crate::error::{Result, SourceError, TemplateError};
use crate::factory::{SourceMode, TemplateFactory};
use crate::models::Template;
use crate::options::RequestOptions;
use crate::parameters::{read_params_file, ParamsCfg};
use crate::store::TemplateStore;
use crate::urls::{read_urls_file, validate_url};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// The input that drives one run, resolved once from the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Bundle(PathBuf),
    RawFiles(Vec<PathBuf>),
    UrlsFile(PathBuf),
    Inline,
}

impl TemplateSource {
    pub fn resolve(cfg: &Config) -> Self {
        if let Some(path) = &cfg.requests_file {
            TemplateSource::Bundle(path.clone())
        } else if !cfg.raw_requests.is_empty() {
            TemplateSource::RawFiles(cfg.raw_requests.clone())
        } else if let Some(path) = &cfg.urls_file {
            TemplateSource::UrlsFile(path.clone())
        } else {
            TemplateSource::Inline
        }
    }

    /// Configured sources that lose to this one.
    pub fn shadowed(&self, cfg: &Config) -> Vec<&'static str> {
        let mut ignored = Vec::new();
        let rank = match self {
            TemplateSource::Bundle(_) => 0,
            TemplateSource::RawFiles(_) => 1,
            TemplateSource::UrlsFile(_) | TemplateSource::Inline => return ignored,
        };
        if rank < 1 && !cfg.raw_requests.is_empty() {
            ignored.push("raw request files");
        }
        if cfg.urls_file.is_some() {
            ignored.push("urls file");
        }
        if !cfg.urls.is_empty() {
            ignored.push("urls");
        }
        if cfg.method.is_some() || !cfg.data.is_empty() || !cfg.headers.is_empty() {
            ignored.push("method/data/header options");
        }
        ignored
    }
}

/// Build the parameter splitting config. A params file that cannot be read is
/// logged and splitting is disabled.
pub fn params_config(cfg: &Config) -> ParamsCfg {
    let path = match &cfg.params_file {
        Some(path) => path,
        None => return ParamsCfg::default(),
    };

    match read_params_file(path) {
        Ok(params) => ParamsCfg::new(params, cfg.params_split, &cfg.params_method, &cfg.params_encoding),
        Err(e) => {
            error!("Error while reading params file: {}", e);
            ParamsCfg::default()
        }
    }
}

/// Build every template described by `cfg` and store each one as soon as it
/// is built. Returns how many templates were stored.
///
/// Stops at the first fatal error; templates already stored stay stored.
pub fn prepare_templates<S: TemplateStore + ?Sized>(store: &mut S, cfg: Config) -> Result<usize> {
    let params = params_config(&cfg);
    create_templates(store, cfg, &params)
}

fn create_templates<S: TemplateStore + ?Sized>(store: &mut S, mut cfg: Config, params: &ParamsCfg) -> Result<usize> {
    info!("Preparing templates for scan");

    let source = TemplateSource::resolve(&cfg);
    let ignored = source.shadowed(&cfg);
    if !ignored.is_empty() {
        warn!("Ignoring configured {} in favor of {:?}", ignored.join(", "), source);
    }

    match source {
        TemplateSource::Bundle(path) => {
            info!("Scan templates from requests file: {}", path.display());
            create_from_requests_file(store, &path, params)
        }
        TemplateSource::RawFiles(paths) => {
            info!("Scan templates from raw requests: {:?}", paths);
            create_from_raw_request_files(store, &paths, params)
        }
        TemplateSource::UrlsFile(path) => {
            info!("Updating config with urls file");
            update_config_with_urls(&mut cfg, &path).map_err(|e| {
                error!("Error while updating config with urls file: {}", e);
                e
            })?;
            info!("Scan templates from config");
            create_from_config(store, &cfg, params)
        }
        TemplateSource::Inline => {
            info!("Scan templates from config");
            create_from_config(store, &cfg, params)
        }
    }
}

fn create_from_requests_file<S: TemplateStore + ?Sized>(store: &mut S, path: &Path, params: &ParamsCfg) -> Result<usize> {
    let shown = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|e| TemplateError::request_file(&shown, e))?;

    let templates = TemplateFactory::new(params)
        .parse(SourceMode::Bundle, 0, &bytes)
        .map_err(|e| TemplateError::request_file(&shown, e))?;

    store_all(store, &templates, &shown)?;
    Ok(templates.len())
}

fn create_from_raw_request_files<S: TemplateStore + ?Sized>(store: &mut S, paths: &[PathBuf], params: &ParamsCfg) -> Result<usize> {
    let factory = TemplateFactory::new(params);
    let mut idx = 0;

    for path in expand_raw_paths(paths)? {
        let shown = path.display().to_string();
        let bytes = std::fs::read(&path).map_err(|e| TemplateError::request_file(&shown, e))?;

        let templates = factory
            .parse(SourceMode::Raw, idx, &bytes)
            .map_err(|e| TemplateError::request_file(&shown, e))?;

        store_all(store, &templates, &shown)?;
        idx += templates.len();
    }

    Ok(idx)
}

/// Replace directories by the regular files below them, sorted by name.
fn expand_raw_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let shown = path.display().to_string();
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|e| TemplateError::request_file(&shown, std::io::Error::from(e)))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        debug!("Expanded raw request directory {}", shown);
    }
    Ok(files)
}

fn create_from_config<S: TemplateStore + ?Sized>(store: &mut S, cfg: &Config, params: &ParamsCfg) -> Result<usize> {
    let options = RequestOptions::from_config(cfg)?;
    if cfg.urls.is_empty() {
        warn!("No urls configured, no templates to build");
    }

    let mut idx = 0;
    for cfg_url in &cfg.urls {
        let url = validate_url(cfg_url).map_err(|source| {
            error!("Error while validating url ({}): {}", cfg_url, source);
            TemplateError::InvalidUrl {
                url: cfg_url.clone(),
                source,
            }
        })?;

        let templates = params.alter(Template::new(idx, options.build(&url), None));
        for template in &templates {
            store.store(template).map_err(|source| {
                error!("Error while building scan template: {}", source);
                TemplateError::Store {
                    target: url.clone(),
                    source,
                }
            })?;
            idx += 1;
        }
    }

    Ok(idx)
}

fn update_config_with_urls(cfg: &mut Config, path: &Path) -> Result<()> {
    let list = read_urls_file(path).map_err(|source| TemplateError::ProcessUrlsFile {
        path: path.display().to_string(),
        source,
    })?;

    for skipped in &list.skipped {
        warn!(
            "Skipping url(s) file ({}) line {} ({}) - not a valid url: {}",
            path.display(),
            skipped.line,
            skipped.text,
            skipped.reason
        );
    }

    cfg.urls.extend(list.urls);
    Ok(())
}

fn store_all<S: TemplateStore + ?Sized>(store: &mut S, templates: &[Template], path: &str) -> Result<()> {
    for template in templates {
        store
            .store(template)
            .map_err(|e| TemplateError::request_file(path, SourceError::Store(e)))?;
    }
    Ok(())
}
