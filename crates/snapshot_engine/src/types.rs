use std::fmt;

use bytes::Bytes;
use snapshot_core::{map_to_output_path, route_of, FALLBACK_OUTPUT_PATH, FALLBACK_ROUTE};

/// One page as returned by a crawler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub url: String,
    pub markup: Bytes,
    pub lint_warnings: Vec<String>,
}

impl PageResult {
    pub fn new(url: impl Into<String>, markup: impl Into<Bytes>) -> Self {
        Self {
            url: url.into(),
            markup: markup.into(),
            lint_warnings: Vec::new(),
        }
    }

    pub fn with_lint_warnings(mut self, warnings: Vec<String>) -> Self {
        self.lint_warnings = warnings;
        self
    }
}

/// A page paired with where its snapshot goes and how the report names it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub page: PageResult,
    pub route: String,
    pub output_path: String,
}

impl SnapshotEntry {
    pub fn crawled(root: &str, page: PageResult) -> Self {
        Self {
            route: route_of(root, &page.url).to_string(),
            output_path: map_to_output_path(root, &page.url),
            page,
        }
    }

    /// The served-as-is `index.html`; its output path is fixed rather than mapped.
    pub fn fallback(url: String, markup: Bytes) -> Self {
        Self {
            page: PageResult::new(url, markup),
            route: FALLBACK_ROUTE.to_string(),
            output_path: FALLBACK_OUTPUT_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{url}: {kind} ({message})")]
pub struct CrawlError {
    pub url: String,
    pub kind: FailureKind,
    pub message: String,
}

impl CrawlError {
    pub fn new(url: impl Into<String>, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
    /// Failure reported by an external rendering engine.
    Renderer,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Renderer => write!(f, "renderer error"),
        }
    }
}
