use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use snapshot_core::{RunOutcome, DEFAULT_PORT, OUTPUT_DIR};
use snapshot_engine::{
    AxumStaticServer, HttpCrawler, Orchestrator, OrchestratorSettings, ReportStyle,
    SnapshotConfig, DEFAULT_CONFIG_FILE,
};
use snapshot_logging::snap_warn;

#[derive(Parser, Debug)]
#[command(name = "snapshot")]
#[command(
    version,
    about = "Pre-render a single-page application build into static HTML snapshots"
)]
pub struct Args {
    /// Configuration file (defaults to ./snapshot.json)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run the whole pipeline without writing snapshots
    #[arg(long)]
    pub dry_run: bool,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// The `--config` path when it names a readable file, otherwise
    /// `snapshot.json` in `work_dir`.
    pub fn config_path(&self, work_dir: &Path) -> PathBuf {
        let default_path = work_dir.join(DEFAULT_CONFIG_FILE);
        match &self.config {
            Some(path) if path.is_file() => path.clone(),
            Some(path) => {
                snap_warn!(
                    "Config file {:?} is not readable, trying {:?}",
                    path,
                    default_path
                );
                default_path
            }
            None => default_path,
        }
    }

    /// Loads the file configuration and applies command-line overrides.
    pub fn resolve_config(&self, work_dir: &Path) -> SnapshotConfig {
        let mut config = SnapshotConfig::load(&self.config_path(work_dir));
        if self.dry_run {
            config.dry_run = true;
        }
        config
    }
}

pub async fn run(args: Args) -> anyhow::Result<RunOutcome> {
    let work_dir = std::env::current_dir().context("could not determine the working directory")?;
    let config = args.resolve_config(&work_dir);

    let report_style = if io::stdout().is_terminal() {
        ReportStyle::Ansi
    } else {
        ReportStyle::Plain
    };
    let settings = OrchestratorSettings {
        port: DEFAULT_PORT,
        work_dir: work_dir.clone(),
        report_style,
    };

    let server = AxumStaticServer::new(work_dir.join(OUTPUT_DIR));
    let mut orchestrator = Orchestrator::new(server, HttpCrawler::default(), config, settings);
    let summary = orchestrator.run(&mut io::stdout()).await;
    Ok(summary.outcome)
}
