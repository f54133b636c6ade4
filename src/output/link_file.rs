//! Appends discovered links to a text file, one URL per line

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use url::Url;

/// File sink for newly admitted links
///
/// The file is opened in append mode, so links from earlier runs are kept.
#[derive(Debug)]
pub struct LinkFileSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl LinkFileSink {
    /// Opens (or creates) the file, creating parent directories as needed
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Appends the URLs and flushes
    pub fn record(&self, urls: &[Url]) -> std::io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        for url in urls {
            writeln!(writer, "{}", url)?;
        }
        writer.flush()
    }

    /// Records URLs, logging instead of failing
    ///
    /// Used from crawl callbacks, where there is no caller to return an error to.
    pub fn record_or_warn(&self, urls: &[Url]) {
        if let Err(e) = self.record(urls) {
            tracing::warn!(
                "Failed to append {} links to {}: {}",
                urls.len(),
                self.path.display(),
                e
            );
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn urls(list: &[&str]) -> Vec<Url> {
        list.iter().map(|s| Url::parse(s).unwrap()).collect()
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("links.txt");

        let sink = LinkFileSink::open(&path).unwrap();
        sink.record(&urls(&["https://example.com/a"])).unwrap();

        assert_eq!(sink.path(), path.as_path());
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "https://example.com/a\n");
    }

    #[test]
    fn test_appends_across_opens() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links.txt");

        LinkFileSink::open(&path)
            .unwrap()
            .record(&urls(&["https://example.com/a", "https://example.com/b"]))
            .unwrap();
        LinkFileSink::open(&path)
            .unwrap()
            .record(&urls(&["https://example.com/c"]))
            .unwrap();

        let lines: Vec<String> = std::fs::read_to_string(&path)
            .unwrap()
            .lines()
            .map(String::from)
            .collect();
        assert_eq!(
            lines,
            vec![
                "https://example.com/a",
                "https://example.com/b",
                "https://example.com/c"
            ]
        );
    }
}
