use crate::record::QueryLog;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name used when no store path is configured
pub const DEFAULT_STORE_FILE: &str = "search_results.json";

/// Store-related errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Log store {path} is unreadable or malformed: {reason}")]
    ReadCorrupt { path: PathBuf, reason: String },

    #[error("I/O error on log store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize log store: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Full history of query logs, persisted as one pretty-printed JSON array
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogStore {
    entries: Vec<QueryLog>,
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[QueryLog] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn append(&mut self, log: QueryLog) {
        self.entries.push(log);
    }

    /// Load the store from `path`.
    ///
    /// A missing or blank file is an empty store. Anything that does not
    /// parse, or that holds a record breaking the category/trust pairing,
    /// is reported as corrupt rather than discarded.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no existing log store");
                return Ok(Self::new());
            }
            Err(e) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Self::new());
        }

        let entries: Vec<QueryLog> =
            serde_json::from_str(&content).map_err(|e| StoreError::ReadCorrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        for (idx, entry) in entries.iter().enumerate() {
            if let Some(bad) = entry.results.iter().find(|r| !r.is_consistent()) {
                return Err(StoreError::ReadCorrupt {
                    path: path.to_path_buf(),
                    reason: format!(
                        "entry {} ({:?}): {} is {} but trusted is {:?}",
                        idx, entry.query, bad.url, bad.category, bad.trusted
                    ),
                });
            }
        }

        tracing::debug!(path = %path.display(), entries = entries.len(), "loaded log store");

        Ok(Self { entries })
    }

    /// Rewrite the whole store at `path`.
    ///
    /// The JSON is written to a temporary file next to the target and then
    /// renamed over it, so readers see either the old or the new file.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(io_err)?;

        let content = serde_json::to_string_pretty(&self.entries)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(io_err)?;
        tmp.write_all(content.as_bytes()).map_err(io_err)?;
        tmp.write_all(b"\n").map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;

        tracing::debug!(path = %path.display(), entries = self.entries.len(), "wrote log store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{SearchRecord, Trusted};
    use tempfile::TempDir;

    fn sample(query: &str) -> QueryLog {
        QueryLog::new(
            query,
            vec![
                SearchRecord::shopping("https://shop.test", Trusted::Yes),
                SearchRecord::information("https://wiki.test"),
            ],
        )
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = LogStore::load(&dir.path().join("none.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_blank_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blank.json");
        fs::write(&path, "  \n").unwrap();
        assert!(LogStore::load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_garbage_file_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            LogStore::load(&path),
            Err(StoreError::ReadCorrupt { .. })
        ));
    }

    #[test]
    fn test_inconsistent_record_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(
            &path,
            r#"[{"query":"q","results":[{"URL":"u","Category":"Information","Trusted":"Yes"}]}]"#,
        )
        .unwrap();
        assert!(matches!(
            LogStore::load(&path),
            Err(StoreError::ReadCorrupt { .. })
        ));
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/log.json");
        let mut store = LogStore::new();
        store.append(sample("shoes"));
        store.save(&path).unwrap();
        assert_eq!(LogStore::load(&path).unwrap(), store);
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.json");
        let mut store = LogStore::new();
        store.append(sample("a"));
        store.save(&path).unwrap();
        store.append(sample("b"));
        store.save(&path).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("log.json")]);
    }
}
