use std::collections::{HashMap, VecDeque};
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use bytes::Bytes;
use snapshot_core::{
    server_root, update, Effect, Msg, RunOutcome, RunState, DEFAULT_PORT, FALLBACK_OUTPUT_PATH,
    FALLBACK_ROUTE, OUTPUT_DIR,
};
use snapshot_logging::{snap_error, snap_info, snap_warn};

use crate::config::SnapshotConfig;
use crate::crawl::{CrawlRequest, Crawler};
use crate::report::{compress_rows, render_report, ReportRow, ReportStyle};
use crate::server::StaticServer;
use crate::writer::{SnapshotWriter, WriteFailure};
use crate::SnapshotEntry;

#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub port: u16,
    /// Directory that contains `build/`; snapshots are written relative to it.
    pub work_dir: PathBuf,
    pub report_style: ReportStyle,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            work_dir: PathBuf::from("."),
            report_style: ReportStyle::Plain,
        }
    }
}

#[derive(Debug)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub entries: Vec<SnapshotEntry>,
    pub rows: Vec<ReportRow>,
    pub write_failures: Vec<WriteFailure>,
    pub elapsed: Duration,
}

/// Drives one snapshot run: serve, crawl, stop, write, report.
///
/// Sequencing comes from [`snapshot_core::update`]; this type only performs the
/// effects it asks for and reports back what happened.
pub struct Orchestrator<S, C> {
    server: S,
    crawler: C,
    config: SnapshotConfig,
    settings: OrchestratorSettings,
    writer: SnapshotWriter,
}

#[derive(Default)]
struct RunData {
    entries: Vec<SnapshotEntry>,
    rows: Vec<ReportRow>,
    write_failures: Vec<WriteFailure>,
}

impl<S: StaticServer, C: Crawler> Orchestrator<S, C> {
    pub fn new(server: S, crawler: C, config: SnapshotConfig, settings: OrchestratorSettings) -> Self {
        let writer = SnapshotWriter::new(settings.work_dir.clone());
        Self {
            server,
            crawler,
            config,
            settings,
            writer,
        }
    }

    pub fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    /// Runs to completion, printing progress and the report to `out`.
    pub async fn run<W: Write>(&mut self, out: &mut W) -> RunSummary {
        let started = Instant::now();
        if let Err(err) = writeln!(out, "Snapshotifying...") {
            snap_warn!("Could not write to output: {}", err);
        }

        let mut data = RunData::default();
        let (mut state, effects) = update(RunState::new(self.config.dry_run), Msg::Start);
        let mut queue: VecDeque<Effect> = effects.into();

        while let Some(effect) = queue.pop_front() {
            let msg = match effect {
                Effect::Exit(outcome) => return finish(outcome, data, started),
                Effect::StartServer => self.start_server().await,
                Effect::Crawl { root, seeds } => self.crawl(&root, &seeds, &mut data).await,
                Effect::StopServer => self.stop_server().await,
                Effect::InjectFallback { url } => self.inject_fallback(url, &mut data).await,
                Effect::WritePages => self.write_pages(&mut data).await,
                Effect::RenderReport => self.report(&mut data, out, started).await,
            };
            let (next, effects) = update(state, msg);
            state = next;
            queue.extend(effects);
        }

        let reason = format!("run stopped in {:?} without an exit", state.phase());
        snap_error!("{}", reason);
        finish(
            RunOutcome::Aborted {
                phase: state.phase(),
                reason,
            },
            data,
            started,
        )
    }

    async fn start_server(&mut self) -> Msg {
        match self.server.listen(self.settings.port).await {
            Ok(addr) => Msg::ServerReady {
                root: server_root(addr.port()),
            },
            Err(err) => {
                snap_error!("[server] {}", err);
                Msg::ServerFailed {
                    reason: err.to_string(),
                }
            }
        }
    }

    async fn crawl(&mut self, root: &str, seeds: &[String], data: &mut RunData) -> Msg {
        let request = CrawlRequest {
            paths: seeds,
            root,
            config: &self.config,
        };
        match self.crawler.crawl(request).await {
            Ok(pages) => {
                let entries = pages
                    .into_iter()
                    .map(|page| SnapshotEntry::crawled(root, page))
                    .collect();
                data.entries = drop_colliding(entries);
                let count = data.entries.len();
                snap_info!("Crawl finished with {} page(s)", count);
                Msg::CrawlFinished { pages: count }
            }
            Err(err) => {
                snap_error!("[crawl] {}", err);
                Msg::CrawlFailed {
                    reason: err.to_string(),
                }
            }
        }
    }

    async fn stop_server(&mut self) -> Msg {
        if let Err(err) = self.server.close().await {
            snap_error!("[server] failed to stop cleanly: {}", err);
        }
        Msg::ServerStopped
    }

    async fn inject_fallback(&self, url: String, data: &mut RunData) -> Msg {
        let index = self.settings.work_dir.join(OUTPUT_DIR).join("index.html");
        match tokio::fs::read(&index).await {
            Ok(markup) => {
                data.entries.push(SnapshotEntry::fallback(url, Bytes::from(markup)));
                Msg::FallbackInjected
            }
            Err(err) => {
                snap_error!("[fallback] could not read {:?}: {}", index, err);
                Msg::FallbackFailed {
                    reason: format!("{}: {}", index.display(), err),
                }
            }
        }
    }

    async fn write_pages(&self, data: &mut RunData) -> Msg {
        let failures = self.writer.write_all(&data.entries).await;
        let failed = failures.len();
        data.write_failures = failures;
        Msg::WritesSettled { failed }
    }

    async fn report<W: Write>(&self, data: &mut RunData, out: &mut W, started: Instant) -> Msg {
        let rows = match compress_rows(&data.entries).await {
            Ok(rows) => rows,
            Err(err) => {
                snap_error!("[report] {}", err);
                return Msg::ReportFailed {
                    reason: err.to_string(),
                };
            }
        };
        let report = render_report(&rows, started.elapsed(), self.settings.report_style);
        data.rows = rows;
        match out.write_all(report.as_bytes()).and_then(|_| out.flush()) {
            Ok(()) => Msg::ReportRendered,
            Err(err) => {
                snap_error!("[report] {}", err);
                Msg::ReportFailed {
                    reason: err.to_string(),
                }
            }
        }
    }
}

/// Keeps the first crawled entry for each output path.
///
/// `build/200.html` is reserved for the fallback entry, so a crawled `/200`
/// is dropped as well.
fn drop_colliding(entries: Vec<SnapshotEntry>) -> Vec<SnapshotEntry> {
    let mut claimed: HashMap<String, String> = HashMap::new();
    claimed.insert(FALLBACK_OUTPUT_PATH.to_string(), FALLBACK_ROUTE.to_string());
    entries
        .into_iter()
        .filter(|entry| {
            if let Some(owner) = claimed.get(&entry.output_path) {
                snap_warn!(
                    "[crawl] skipping {}: {} is already written for {}",
                    entry.route,
                    entry.output_path,
                    owner
                );
                return false;
            }
            claimed.insert(entry.output_path.clone(), entry.route.clone());
            true
        })
        .collect()
}

fn finish(outcome: RunOutcome, data: RunData, started: Instant) -> RunSummary {
    RunSummary {
        outcome,
        entries: data.entries,
        rows: data.rows,
        write_failures: data.write_failures,
        elapsed: started.elapsed(),
    }
}
