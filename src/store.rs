// Template storage for Templar
// Templates are persisted one at a time, as soon as they are built

use crate::error::StoreError;
use crate::models::Template;
use chrono::Local;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Destination for prepared scan templates.
pub trait TemplateStore {
    fn store(&mut self, template: &Template) -> Result<(), StoreError>;
}

/// Keeps templates in memory, in the order they were stored.
#[derive(Debug, Default)]
pub struct MemoryStore {
    templates: Vec<Template>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn into_templates(self) -> Vec<Template> {
        self.templates
    }
}

impl TemplateStore for MemoryStore {
    fn store(&mut self, template: &Template) -> Result<(), StoreError> {
        self.templates.push(template.clone());
        Ok(())
    }
}

/// Writes one JSON document per line, flushed after every template.
pub struct JsonlStore {
    path: PathBuf,
    writer: BufWriter<File>,
    count: usize,
}

impl JsonlStore {
    pub fn create(path: &Path) -> Result<Self, StoreError> {
        let file = File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            count: 0,
        })
    }

    /// `templar_templates_<timestamp>.jsonl` in the working directory.
    pub fn default_path() -> PathBuf {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        PathBuf::from(format!("templar_templates_{}.jsonl", timestamp))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl TemplateStore for JsonlStore {
    fn store(&mut self, template: &Template) -> Result<(), StoreError> {
        serde_json::to_writer(&mut self.writer, template)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;

    #[test]
    fn jsonl_store_writes_one_line_per_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let mut store = JsonlStore::create(&path).unwrap();

        let mut req = Request::new("POST", "http://h.test/p?a=1");
        req.body = vec![0, 159, 146, 150];
        let first = Template::new(0, req, Some(b"HTTP/1.1 200 OK\r\n\r\n".to_vec()));
        let second = Template::new(1, Request::new("GET", "http://h.test/"), None);
        store.store(&first).unwrap();
        store.store(&second).unwrap();
        assert_eq!(store.count(), 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let decoded: Template = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(decoded, first);
        let decoded: Template = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(decoded, second);
    }

    #[test]
    fn default_path_is_timestamped() {
        let name = JsonlStore::default_path().to_string_lossy().into_owned();
        assert!(name.starts_with("templar_templates_"));
        assert!(name.ends_with(".jsonl"));
    }
}
