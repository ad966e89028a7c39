use crate::Phase;

/// Work the orchestrator must perform before feeding the next [`crate::Msg`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartServer,
    Crawl { root: String, seeds: Vec<String> },
    StopServer,
    /// Append the raw `index.html` as the synthetic entry at `url`.
    InjectFallback { url: String },
    WritePages,
    RenderReport,
    Exit(RunOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { pages: usize },
    CompletedWithWriteFailures { pages: usize, failed: usize },
    Aborted { phase: Phase, reason: String },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }
}
