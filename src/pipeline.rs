use crate::classify::{Category, CategoryClassifier};
use crate::record::{QueryLog, SearchRecord, Trusted};
use crate::search::{SearchError, SearchOptions, SearchProvider};
use crate::store::{LogStore, StoreError};
use crate::trust::TrustChecker;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Number of search results classified per query unless configured otherwise
pub const DEFAULT_RESULT_COUNT: usize = 10;

/// Progress of a pipeline run, delivered as it happens
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// The run passed the empty-query check and owns the store.
    Started { query: String },
    /// The search engine returned `count` URLs.
    Sourced { count: usize },
    /// About to classify URL `index` (0-based) of `total`.
    Classifying { index: usize, total: usize, url: String },
    /// A collaborator failed for this URL; the record carries the fallback.
    Degraded { url: String, reason: String },
    /// One finished record, in search order.
    Record { index: usize, record: SearchRecord },
    /// Records are done; the store is being rewritten.
    Persisting,
    /// The query log was written to the store.
    Finished(QueryLog),
    /// The whole run failed.
    Failed(String),
}

/// Whole-run failures
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Search source unavailable: {0}")]
    SourceUnavailable(#[from] SearchError),

    #[error("Refusing to overwrite unreadable log store: {0}")]
    PersistenceReadCorrupt(#[source] StoreError),

    #[error("Failed to write log store: {0}")]
    PersistenceWriteFailure(#[source] StoreError),

    #[error("Another search is already running")]
    Busy,
}

/// Classification-and-logging pipeline.
///
/// Runs are sequential: one URL at a time, and at most one run per
/// pipeline at a time since each run rewrites the whole store.
#[derive(Clone)]
pub struct Pipeline {
    source: Arc<dyn SearchProvider>,
    classifier: Arc<dyn CategoryClassifier>,
    checker: Arc<dyn TrustChecker>,
    store_path: PathBuf,
    result_count: usize,
    writer: Arc<Mutex<()>>,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn SearchProvider>,
        classifier: Arc<dyn CategoryClassifier>,
        checker: Arc<dyn TrustChecker>,
        store_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source,
            classifier,
            checker,
            store_path: store_path.into(),
            result_count: DEFAULT_RESULT_COUNT,
            writer: Arc::new(Mutex::new(())),
        }
    }

    pub fn with_result_count(mut self, count: usize) -> Self {
        self.result_count = count;
        self
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Run the pipeline on a spawned task and stream its events.
    ///
    /// The channel closes after `Finished` or `Failed` (or immediately for
    /// a blank query).
    pub fn start(&self, query: String) -> mpsc::UnboundedReceiver<PipelineEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let pipeline = self.clone();

        tokio::spawn(async move {
            let _ = pipeline
                .run(&query, |event| {
                    let _ = tx.send(event);
                })
                .await;
        });

        rx
    }

    /// Classify the results for `query` and append them to the store.
    ///
    /// Returns `Ok(None)` without touching anything when the query is blank.
    /// Each record is passed to `on_event` as soon as it is built.
    pub async fn run<F>(&self, query: &str, mut on_event: F) -> Result<Option<QueryLog>, PipelineError>
    where
        F: FnMut(PipelineEvent) + Send,
    {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let result = self.run_query(query, &mut on_event).await;
        match &result {
            Ok(log) => {
                tracing::info!(
                    query = %query,
                    results = log.results.len(),
                    shopping = log.shopping_count(),
                    untrusted = log.untrusted_count(),
                    "search finished"
                );
                on_event(PipelineEvent::Finished(log.clone()));
            }
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "search failed");
                on_event(PipelineEvent::Failed(e.to_string()));
            }
        }
        result.map(Some)
    }

    async fn run_query<F>(&self, query: &str, on_event: &mut F) -> Result<QueryLog, PipelineError>
    where
        F: FnMut(PipelineEvent) + Send,
    {
        let _guard = self.writer.try_lock().map_err(|_| PipelineError::Busy)?;
        on_event(PipelineEvent::Started {
            query: query.to_string(),
        });

        let mut store =
            LogStore::load(&self.store_path).map_err(PipelineError::PersistenceReadCorrupt)?;

        let urls = self
            .source
            .search(query, &SearchOptions::with_max_results(self.result_count))
            .await?;
        // Providers are asked for `result_count`; never classify more.
        let urls: Vec<String> = urls.into_iter().take(self.result_count).collect();

        tracing::debug!(query = %query, source = self.source.name(), count = urls.len(), "sourced urls");
        on_event(PipelineEvent::Sourced { count: urls.len() });

        let total = urls.len();
        let mut results = Vec::with_capacity(total);
        for (index, url) in urls.into_iter().enumerate() {
            on_event(PipelineEvent::Classifying {
                index,
                total,
                url: url.clone(),
            });

            let record = self.classify_url(url, on_event).await;
            results.push(record.clone());
            on_event(PipelineEvent::Record { index, record });

            // Let the host (e.g. a UI render loop) run between URLs.
            tokio::task::yield_now().await;
        }

        on_event(PipelineEvent::Persisting);
        let log = QueryLog::new(query, results);
        store.append(log.clone());
        store
            .save(&self.store_path)
            .map_err(PipelineError::PersistenceWriteFailure)?;

        Ok(log)
    }

    /// Classify one URL, falling back instead of failing.
    ///
    /// Classifier failure → `Information`; trust lookup failure → `Unknown`.
    async fn classify_url<F>(&self, url: String, on_event: &mut F) -> SearchRecord
    where
        F: FnMut(PipelineEvent) + Send,
    {
        let category = match self.classifier.classify(&url).await {
            Ok(category) => category,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "classification failed, treating as information");
                on_event(PipelineEvent::Degraded {
                    url: url.clone(),
                    reason: e.to_string(),
                });
                Category::Information
            }
        };

        if category == Category::Information {
            return SearchRecord::information(url);
        }

        let trusted = match self.checker.check_trust(&url).await {
            Ok(verdict) => Trusted::from(verdict),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "trust lookup failed");
                on_event(PipelineEvent::Degraded {
                    url: url.clone(),
                    reason: e.to_string(),
                });
                Trusted::Unknown
            }
        };

        SearchRecord::shopping(url, trusted)
    }
}
