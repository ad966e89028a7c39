use std::sync::Once;

use pretty_assertions::assert_eq;
use snapshot_core::{update, Effect, Msg, Phase, RunOutcome, RunState};

const ROOT: &str = "http://localhost:9000";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(snapshot_logging::initialize_for_tests);
}

fn feed(state: RunState, msgs: Vec<Msg>) -> (RunState, Vec<Effect>) {
    let mut state = state;
    let mut last = Vec::new();
    for msg in msgs {
        let (next, effects) = update(state, msg);
        state = next;
        last = effects;
    }
    (state, last)
}

fn crawled(dry_run: bool, pages: usize) -> (RunState, Vec<Effect>) {
    feed(
        RunState::new(dry_run),
        vec![
            Msg::Start,
            Msg::ServerReady {
                root: ROOT.to_string(),
            },
            Msg::CrawlFinished { pages },
        ],
    )
}

#[test]
fn start_requests_the_server() {
    init_logging();
    let (state, effects) = update(RunState::new(false), Msg::Start);
    assert_eq!(state.phase(), Phase::ServerStarting);
    assert_eq!(effects, vec![Effect::StartServer]);
}

#[test]
fn server_ready_crawls_the_seed_paths() {
    init_logging();
    let (state, effects) = feed(
        RunState::new(false),
        vec![
            Msg::Start,
            Msg::ServerReady {
                root: ROOT.to_string(),
            },
        ],
    );
    assert_eq!(state.phase(), Phase::Crawling);
    assert_eq!(state.root(), Some(ROOT));
    assert_eq!(
        effects,
        vec![Effect::Crawl {
            root: ROOT.to_string(),
            seeds: vec![
                "http://localhost:9000/".to_string(),
                "http://localhost:9000/404".to_string(),
            ],
        }]
    );
}

#[test]
fn bind_failure_aborts_before_crawling() {
    init_logging();
    let (state, effects) = feed(
        RunState::new(false),
        vec![
            Msg::Start,
            Msg::ServerFailed {
                reason: "address in use".to_string(),
            },
        ],
    );
    assert_eq!(state.phase(), Phase::Done);
    assert_eq!(
        effects,
        vec![Effect::Exit(RunOutcome::Aborted {
            phase: Phase::ServerStarting,
            reason: "address in use".to_string(),
        })]
    );
}

#[test]
fn crawl_completion_stops_the_server_then_injects_fallback() {
    init_logging();
    let (state, effects) = crawled(false, 2);
    assert_eq!(state.phase(), Phase::ServerStopping);
    assert_eq!(effects, vec![Effect::StopServer]);

    let (state, effects) = update(state, Msg::ServerStopped);
    assert_eq!(state.phase(), Phase::ServerStopping);
    assert_eq!(
        effects,
        vec![Effect::InjectFallback {
            url: "http://localhost:9000/200".to_string(),
        }]
    );
}

#[test]
fn crawl_failure_still_stops_the_server_and_then_aborts() {
    init_logging();
    let (state, effects) = feed(
        RunState::new(false),
        vec![
            Msg::Start,
            Msg::ServerReady {
                root: ROOT.to_string(),
            },
            Msg::CrawlFailed {
                reason: "navigation timeout".to_string(),
            },
        ],
    );
    assert_eq!(state.phase(), Phase::ServerStopping);
    assert_eq!(state.crawl_failure(), Some("navigation timeout"));
    assert_eq!(effects, vec![Effect::StopServer]);

    let (state, effects) = update(state, Msg::ServerStopped);
    assert_eq!(state.phase(), Phase::Done);
    assert_eq!(
        effects,
        vec![Effect::Exit(RunOutcome::Aborted {
            phase: Phase::Crawling,
            reason: "navigation timeout".to_string(),
        })]
    );
}

#[test]
fn fallback_leads_to_writing_unless_dry_run() {
    init_logging();
    let (state, _) = crawled(false, 2);
    let (state, effects) = feed(state, vec![Msg::ServerStopped, Msg::FallbackInjected]);
    assert_eq!(state.phase(), Phase::Writing);
    assert_eq!(state.page_count(), 3);
    assert_eq!(effects, vec![Effect::WritePages]);

    let (state, _) = crawled(true, 2);
    let (state, effects) = feed(state, vec![Msg::ServerStopped, Msg::FallbackInjected]);
    assert_eq!(state.phase(), Phase::Reporting);
    assert_eq!(effects, vec![Effect::RenderReport]);
}

#[test]
fn fallback_read_failure_aborts() {
    init_logging();
    let (state, _) = crawled(false, 1);
    let (state, effects) = feed(
        state,
        vec![
            Msg::ServerStopped,
            Msg::FallbackFailed {
                reason: "build/index.html: not found".to_string(),
            },
        ],
    );
    assert_eq!(state.phase(), Phase::Done);
    assert!(matches!(
        effects.as_slice(),
        [Effect::Exit(RunOutcome::Aborted {
            phase: Phase::ServerStopping,
            ..
        })]
    ));
}

#[test]
fn full_run_completes_with_page_count() {
    init_logging();
    let (state, _) = crawled(false, 2);
    let (state, effects) = feed(
        state,
        vec![
            Msg::ServerStopped,
            Msg::FallbackInjected,
            Msg::WritesSettled { failed: 0 },
        ],
    );
    assert_eq!(state.phase(), Phase::Reporting);
    assert_eq!(effects, vec![Effect::RenderReport]);

    let (state, effects) = update(state, Msg::ReportRendered);
    assert_eq!(state.phase(), Phase::Done);
    assert_eq!(effects, vec![Effect::Exit(RunOutcome::Completed { pages: 3 })]);
}

#[test]
fn write_failures_are_reported_in_the_outcome() {
    init_logging();
    let (state, _) = crawled(false, 4);
    let (_, effects) = feed(
        state,
        vec![
            Msg::ServerStopped,
            Msg::FallbackInjected,
            Msg::WritesSettled { failed: 2 },
            Msg::ReportRendered,
        ],
    );
    let outcome = RunOutcome::CompletedWithWriteFailures {
        pages: 5,
        failed: 2,
    };
    assert!(!outcome.is_success());
    assert_eq!(effects, vec![Effect::Exit(outcome)]);
}

#[test]
fn dry_run_never_passes_through_writing() {
    init_logging();
    let (state, _) = crawled(true, 0);
    let (state, effects) = feed(state, vec![Msg::ServerStopped, Msg::FallbackInjected]);
    assert_eq!(effects, vec![Effect::RenderReport]);

    // A stray write notification is ignored once reporting has begun.
    let (state, effects) = update(state, Msg::WritesSettled { failed: 3 });
    assert_eq!(state.phase(), Phase::Reporting);
    assert!(effects.is_empty());

    let (_, effects) = update(state, Msg::ReportRendered);
    assert_eq!(effects, vec![Effect::Exit(RunOutcome::Completed { pages: 1 })]);
}

#[test]
fn report_failure_aborts_in_reporting() {
    init_logging();
    let (state, _) = crawled(true, 1);
    let (state, effects) = feed(
        state,
        vec![
            Msg::ServerStopped,
            Msg::FallbackInjected,
            Msg::ReportFailed {
                reason: "broken pipe".to_string(),
            },
        ],
    );
    assert_eq!(state.phase(), Phase::Done);
    assert_eq!(
        effects,
        vec![Effect::Exit(RunOutcome::Aborted {
            phase: Phase::Reporting,
            reason: "broken pipe".to_string(),
        })]
    );
}
