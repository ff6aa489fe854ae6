//! Common test utilities: temp-dir fixture and stub collaborators

#![allow(dead_code)]

use shopsafe::classify::{Category, CategoryClassifier, ClassifyError};
use shopsafe::search::{SearchError, SearchOptions, SearchProvider};
use shopsafe::trust::{TrustChecker, TrustError, TrustVerdict};
use shopsafe::Pipeline;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Test fixture for store files
pub struct TestFixture {
    /// Temporary directory that gets cleaned up automatically
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    pub fn store_path(&self) -> PathBuf {
        self.path().join("search_results.json")
    }

    /// Create a test file with given content
    pub fn create_file(&self, name: &str, content: &str) -> PathBuf {
        let filepath = self.path().join(name);
        std::fs::write(&filepath, content).expect("Failed to write test file");
        filepath
    }

    pub fn read_bytes(&self, name: &str) -> Vec<u8> {
        std::fs::read(self.path().join(name)).expect("Failed to read test file")
    }
}

/// URL source returning a fixed list, or failing
pub struct StubSource {
    pub urls: Vec<String>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl StubSource {
    pub fn with_urls(urls: &[&str]) -> Self {
        Self {
            urls: urls.iter().map(|u| u.to_string()).collect(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            urls: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl SearchProvider for StubSource {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn search(&self, _query: &str, _options: &SearchOptions) -> Result<Vec<String>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SearchError::ApiError("HTTP 503: unavailable".to_string()));
        }
        Ok(self.urls.clone())
    }
}

/// Shopping iff the URL contains "shop"
#[derive(Default)]
pub struct KeywordClassifier {
    pub seen: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl CategoryClassifier for KeywordClassifier {
    async fn classify(&self, url: &str) -> Result<Category, ClassifyError> {
        self.seen.lock().unwrap().push(url.to_string());
        if url.contains("shop") {
            Ok(Category::Shopping)
        } else {
            Ok(Category::Information)
        }
    }
}

/// Trusted iff the URL contains "good"; fails for URLs containing `fail_on`
#[derive(Default)]
pub struct KeywordChecker {
    pub fail_on: Option<&'static str>,
    pub seen: Mutex<Vec<String>>,
}

impl KeywordChecker {
    pub fn failing_on(needle: &'static str) -> Self {
        Self {
            fail_on: Some(needle),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl TrustChecker for KeywordChecker {
    async fn check_trust(&self, url: &str) -> Result<TrustVerdict, TrustError> {
        self.seen.lock().unwrap().push(url.to_string());
        if self.fail_on.is_some_and(|needle| url.contains(needle)) {
            return Err(TrustError::RateLimited);
        }
        if url.contains("good") {
            Ok(TrustVerdict::Trusted)
        } else {
            Ok(TrustVerdict::NotTrusted)
        }
    }
}

/// Pipeline over keyword stubs writing into the fixture's store
pub fn keyword_pipeline(fixture: &TestFixture, source: StubSource) -> Pipeline {
    Pipeline::new(
        Arc::new(source),
        Arc::new(KeywordClassifier::default()),
        Arc::new(KeywordChecker::default()),
        fixture.store_path(),
    )
}
