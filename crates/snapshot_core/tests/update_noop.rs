use snapshot_core::{update, Msg, Phase, RunState};

#[test]
fn messages_outside_their_phase_are_noops() {
    let state = RunState::new(false);
    for msg in [
        Msg::ServerStopped,
        Msg::CrawlFinished { pages: 3 },
        Msg::WritesSettled { failed: 0 },
        Msg::ReportRendered,
    ] {
        let (next, effects) = update(state.clone(), msg);
        assert_eq!(state, next);
        assert!(effects.is_empty());
    }
}

#[test]
fn done_run_ignores_restart() {
    let (state, _) = update(RunState::new(false), Msg::Start);
    let (state, _) = update(
        state,
        Msg::ServerFailed {
            reason: "busy".to_string(),
        },
    );
    assert_eq!(state.phase(), Phase::Done);

    let (next, effects) = update(state.clone(), Msg::Start);
    assert_eq!(state, next);
    assert!(effects.is_empty());
}
