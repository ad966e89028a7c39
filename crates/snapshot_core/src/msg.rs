#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Kick off a run from `Idle`.
    Start,
    /// The static server is accepting connections under `root`.
    ServerReady { root: String },
    /// The static server could not bind its port.
    ServerFailed { reason: String },
    /// The crawler returned `pages` results.
    CrawlFinished { pages: usize },
    /// The crawler rejected the run.
    CrawlFailed { reason: String },
    /// The static server has fully shut down.
    ServerStopped,
    /// The synthetic fallback entry was appended.
    FallbackInjected,
    /// The raw index document could not be read.
    FallbackFailed { reason: String },
    /// Every page write has settled; `failed` of them returned an error.
    WritesSettled { failed: usize },
    /// The report was printed.
    ReportRendered,
    /// Compressing or printing the report failed.
    ReportFailed { reason: String },
}
