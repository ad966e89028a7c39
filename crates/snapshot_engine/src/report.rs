use std::fmt::Write as _;
use std::io::{self, Write};
use std::time::Duration;

use flate2::write::GzEncoder;
use flate2::Compression;
use futures_util::future::join_all;
use thiserror::Error;

use crate::SnapshotEntry;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("could not compress {route}: {source}")]
    Compress { route: String, source: io::Error },
    #[error("compression task for {route} did not complete: {message}")]
    Task { route: String, message: String },
}

/// One line of the size report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub route: String,
    pub output_path: String,
    pub gzipped_bytes: usize,
    pub lint_warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportStyle {
    #[default]
    Plain,
    /// Colors the route, path, warnings and summary for a terminal.
    Ansi,
}

impl ReportStyle {
    fn paint(self, code: &str, text: &str) -> String {
        match self {
            ReportStyle::Plain => text.to_string(),
            ReportStyle::Ansi => format!("\x1b[{code}m{text}\x1b[0m"),
        }
    }
}

const CYAN: &str = "36";
const DIM: &str = "2";
const YELLOW: &str = "33";

pub fn gzipped_len(markup: &[u8]) -> io::Result<usize> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(markup)?;
    Ok(encoder.finish()?.len())
}

/// Compresses every entry concurrently; rows come back in entry order.
pub async fn compress_rows(entries: &[SnapshotEntry]) -> Result<Vec<ReportRow>, ReportError> {
    let jobs = entries.iter().map(|entry| {
        let markup = entry.page.markup.clone();
        let route = entry.route.clone();
        async move {
            let size = tokio::task::spawn_blocking(move || gzipped_len(&markup))
                .await
                .map_err(|err| ReportError::Task {
                    route: route.clone(),
                    message: err.to_string(),
                })?
                .map_err(|source| ReportError::Compress {
                    route: route.clone(),
                    source,
                })?;
            Ok::<_, ReportError>(ReportRow {
                route,
                output_path: entry.output_path.clone(),
                gzipped_bytes: size,
                lint_warnings: entry.page.lint_warnings.clone(),
            })
        }
    });

    join_all(jobs).await.into_iter().collect()
}

/// Renders the size report. Rows are printed in the order given.
pub fn render_report(rows: &[ReportRow], elapsed: Duration, style: ReportStyle) -> String {
    let mut out = String::from("\nFile sizes after gzip:\n\n");

    for row in rows {
        let size = format!("{:.2}", row.gzipped_bytes as f64 / 1024.0);
        let _ = write!(
            out,
            "{size:>8} KB  {} → {}",
            style.paint(CYAN, &row.route),
            style.paint(DIM, &row.output_path)
        );
        if !row.lint_warnings.is_empty() {
            let warning = format!("Warning: {}", row.lint_warnings.join(", "));
            let _ = write!(out, "  {}", style.paint(YELLOW, &warning));
        }
        out.push('\n');
    }

    let summary = format!(
        "Snapshotted {} pages in {:.2}s.",
        rows.len(),
        elapsed.as_secs_f64()
    );
    let _ = write!(out, "\n\n{}\n\n", style.paint(DIM, &summary));
    out
}
