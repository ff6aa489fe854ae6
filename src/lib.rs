//! shopsafe library
//!
//! Looks up search results for a query, classifies each URL as shopping or
//! informational with a language model, checks shopping URLs against a
//! malicious-URL reputation service, and appends every run to a JSON log.

pub mod classify;
pub mod cli;
pub mod config;
pub mod event;
pub mod llm;
pub mod logging;
pub mod pipeline;
pub mod record;
pub mod search;
pub mod store;
pub mod trust;
pub mod tui;

pub use pipeline::{Pipeline, PipelineError, PipelineEvent};
pub use record::{Category, QueryLog, SearchRecord, Trusted};
pub use store::LogStore;
