//! Snapshot engine: collaborators, file output, reporting and run orchestration.
mod config;
mod crawl;
mod decode;
mod links;
mod lint;
mod orchestrator;
mod report;
mod server;
mod types;
mod writer;

pub use config::{ConfigError, SnapshotConfig, DEFAULT_CONFIG_FILE};
pub use crawl::{CrawlRequest, CrawlSettings, Crawler, HttpCrawler};
pub use decode::decode_for_parsing;
pub use links::discover_links;
pub use lint::lint_document;
pub use orchestrator::{Orchestrator, OrchestratorSettings, RunSummary};
pub use report::{compress_rows, gzipped_len, render_report, ReportError, ReportRow, ReportStyle};
pub use server::{AxumStaticServer, ServerError, StaticServer};
pub use types::{CrawlError, FailureKind, PageResult, SnapshotEntry};
pub use writer::{SnapshotWriter, WriteError, WriteFailure};
