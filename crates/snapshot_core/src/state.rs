#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    ServerStarting,
    Crawling,
    ServerStopping,
    Writing,
    Reporting,
    Done,
}

/// Progress of a single snapshot run.
///
/// Only [`crate::update`] moves a run between phases.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunState {
    phase: Phase,
    dry_run: bool,
    root: Option<String>,
    crawled_pages: usize,
    fallback_injected: bool,
    crawl_failure: Option<String>,
    write_failures: usize,
}

impl RunState {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Crawled pages plus the synthetic fallback entry once it is in place.
    pub fn page_count(&self) -> usize {
        self.crawled_pages + usize::from(self.fallback_injected)
    }

    pub fn crawl_failure(&self) -> Option<&str> {
        self.crawl_failure.as_deref()
    }

    pub fn write_failures(&self) -> usize {
        self.write_failures
    }

    pub(crate) fn enter(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn set_root(&mut self, root: String) {
        self.root = Some(root);
    }

    pub(crate) fn set_crawled_pages(&mut self, pages: usize) {
        self.crawled_pages = pages;
    }

    pub(crate) fn mark_fallback_injected(&mut self) {
        self.fallback_injected = true;
    }

    pub(crate) fn record_crawl_failure(&mut self, reason: String) {
        self.crawl_failure = Some(reason);
    }

    pub(crate) fn set_write_failures(&mut self, failed: usize) {
        self.write_failures = failed;
    }
}
