use crate::{seed_paths, Effect, Msg, Phase, RunOutcome, RunState, FALLBACK_ROUTE};

/// Pure update function: applies a message to a run and returns the effects to execute.
///
/// Messages that do not belong to the current phase leave the state untouched.
pub fn update(mut state: RunState, msg: Msg) -> (RunState, Vec<Effect>) {
    let effects = match (state.phase(), msg) {
        (Phase::Idle, Msg::Start) => {
            state.enter(Phase::ServerStarting);
            vec![Effect::StartServer]
        }
        (Phase::ServerStarting, Msg::ServerReady { root }) => {
            state.enter(Phase::Crawling);
            let seeds = seed_paths(&root);
            state.set_root(root.clone());
            vec![Effect::Crawl { root, seeds }]
        }
        (Phase::ServerStarting, Msg::ServerFailed { reason }) => {
            abort(&mut state, Phase::ServerStarting, reason)
        }
        (Phase::Crawling, Msg::CrawlFinished { pages }) => {
            state.set_crawled_pages(pages);
            state.enter(Phase::ServerStopping);
            vec![Effect::StopServer]
        }
        (Phase::Crawling, Msg::CrawlFailed { reason }) => {
            // Teardown never depends on crawl success.
            state.record_crawl_failure(reason);
            state.enter(Phase::ServerStopping);
            vec![Effect::StopServer]
        }
        (Phase::ServerStopping, Msg::ServerStopped) => match state.crawl_failure().map(str::to_owned) {
            Some(reason) => abort(&mut state, Phase::Crawling, reason),
            None => {
                let root = state.root().unwrap_or_default();
                vec![Effect::InjectFallback {
                    url: format!("{root}{FALLBACK_ROUTE}"),
                }]
            }
        },
        (Phase::ServerStopping, Msg::FallbackInjected) => {
            state.mark_fallback_injected();
            if state.dry_run() {
                state.enter(Phase::Reporting);
                vec![Effect::RenderReport]
            } else {
                state.enter(Phase::Writing);
                vec![Effect::WritePages]
            }
        }
        (Phase::ServerStopping, Msg::FallbackFailed { reason }) => {
            abort(&mut state, Phase::ServerStopping, reason)
        }
        (Phase::Writing, Msg::WritesSettled { failed }) => {
            state.set_write_failures(failed);
            state.enter(Phase::Reporting);
            vec![Effect::RenderReport]
        }
        (Phase::Reporting, Msg::ReportRendered) => {
            state.enter(Phase::Done);
            let pages = state.page_count();
            let outcome = match state.write_failures() {
                0 => RunOutcome::Completed { pages },
                failed => RunOutcome::CompletedWithWriteFailures { pages, failed },
            };
            vec![Effect::Exit(outcome)]
        }
        (Phase::Reporting, Msg::ReportFailed { reason }) => {
            abort(&mut state, Phase::Reporting, reason)
        }
        _ => Vec::new(),
    };

    (state, effects)
}

fn abort(state: &mut RunState, phase: Phase, reason: String) -> Vec<Effect> {
    state.enter(Phase::Done);
    vec![Effect::Exit(RunOutcome::Aborted { phase, reason })]
}
