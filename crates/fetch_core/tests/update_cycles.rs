use std::sync::Once;

use fetch_core::{
    update, CycleId, CycleOutcome, Effect, FetchPhase, Msg, ObserverConfig, ObserverState,
    RequestSnapshot,
};
use pretty_assertions::assert_eq;

type Users = Vec<u32>;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn observe(state: ObserverState<Users>, key: &str) -> (ObserverState<Users>, CycleId) {
    let (state, effects) = update(state, Msg::Observe(key.to_string()));
    let cycle = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::StartFetch { cycle, .. } => Some(*cycle),
            _ => None,
        })
        .expect("start fetch effect");
    (state, cycle)
}

fn settle(
    state: ObserverState<Users>,
    cycle: CycleId,
    outcome: CycleOutcome<Users>,
) -> (ObserverState<Users>, Vec<Effect>) {
    update(state, Msg::CycleSettled { cycle, outcome })
}

#[test]
fn first_observe_publishes_initial_and_starts_fetch() {
    init_logging();
    let (state, effects) = update(
        ObserverState::<Users>::default(),
        Msg::Observe("/api/users".to_string()),
    );

    assert_eq!(
        effects,
        vec![
            Effect::Publish,
            Effect::StartFetch {
                cycle: 1,
                key: "/api/users".to_string(),
            },
        ]
    );
    assert_eq!(state.snapshot(), &RequestSnapshot::initial());
    assert_eq!(state.key(), Some("/api/users"));
    assert_eq!(state.outstanding_cycle(), Some(1));
}

#[test]
fn data_settle_sets_data_and_clears_loading() {
    init_logging();
    let (state, cycle) = observe(ObserverState::default(), "/api/users");
    let (state, effects) = settle(state, cycle, CycleOutcome::Data(vec![1]));

    assert_eq!(effects, vec![Effect::Publish]);
    assert_eq!(
        state.snapshot(),
        &RequestSnapshot {
            loading: false,
            error_message: None,
            data: Some(vec![1]),
        }
    );
    assert_eq!(state.phase(), FetchPhase::Ready);
    assert_eq!(state.outstanding_cycle(), None);
}

#[test]
fn not_found_settle_is_classified() {
    init_logging();
    let (state, cycle) = observe(ObserverState::default(), "/api/users");
    let (state, _) = settle(state, cycle, CycleOutcome::HttpStatus(404));

    assert_eq!(
        state.snapshot(),
        &RequestSnapshot {
            loading: false,
            error_message: Some("Source not found!".to_string()),
            data: None,
        }
    );
}

#[test]
fn unmapped_status_uses_fallback_message() {
    init_logging();
    let (state, cycle) = observe(ObserverState::default(), "/api/users");
    let (state, _) = settle(state, cycle, CycleOutcome::HttpStatus(500));
    assert_eq!(state.snapshot().error_message.as_deref(), Some("Error!"));

    let config = ObserverConfig {
        fallback_message: "Something broke".to_string(),
        ..ObserverConfig::default()
    };
    let (state, cycle) = observe(ObserverState::new(config), "/api/users");
    let (state, _) = settle(state, cycle, CycleOutcome::HttpStatus(503));
    assert_eq!(
        state.snapshot().error_message.as_deref(),
        Some("Something broke")
    );
}

#[test]
fn transport_failure_uses_fallback_status() {
    init_logging();
    let (state, cycle) = observe(ObserverState::default(), "/api/users");
    let (state, _) = settle(
        state,
        cycle,
        CycleOutcome::Transport {
            reason: "connection refused".to_string(),
        },
    );

    assert_eq!(
        state.snapshot(),
        &RequestSnapshot {
            loading: false,
            error_message: Some("Bad request!".to_string()),
            data: None,
        }
    );
}

#[test]
fn key_change_cancels_outstanding_cycle_and_resets_snapshot() {
    init_logging();
    let (state, first) = observe(ObserverState::default(), "/a");
    let (state, effects) = update(state, Msg::Observe("/b".to_string()));

    assert_eq!(
        effects,
        vec![
            Effect::CancelFetch { cycle: first },
            Effect::Publish,
            Effect::StartFetch {
                cycle: first + 1,
                key: "/b".to_string(),
            },
        ]
    );
    assert_eq!(state.key(), Some("/b"));
    assert_eq!(state.snapshot(), &RequestSnapshot::initial());
}

#[test]
fn stale_settlement_is_discarded() {
    init_logging();
    let (state, stale) = observe(ObserverState::default(), "/a");
    let (state, current) = observe(state, "/b");
    let before = state.clone();

    let (state, effects) = settle(state, stale, CycleOutcome::Data(vec![1]));
    assert!(effects.is_empty());
    assert_eq!(state, before);
    assert!(state.snapshot().loading);

    let (state, _) = settle(state, current, CycleOutcome::Data(vec![2]));
    assert_eq!(state.snapshot().data, Some(vec![2]));
    assert!(!state.snapshot().loading);
}

#[test]
fn stale_failure_is_discarded_too() {
    init_logging();
    let (state, stale) = observe(ObserverState::default(), "/a");
    let (state, _current) = observe(state, "/b");

    let (state, effects) = settle(state, stale, CycleOutcome::HttpStatus(404));
    assert!(effects.is_empty());
    assert_eq!(state.snapshot(), &RequestSnapshot::initial());
}

#[test]
fn second_settlement_of_same_cycle_is_ignored() {
    init_logging();
    let (state, cycle) = observe(ObserverState::default(), "/a");
    let (state, _) = settle(state, cycle, CycleOutcome::Data(vec![1]));
    let (state, effects) = settle(state, cycle, CycleOutcome::HttpStatus(401));

    assert!(effects.is_empty());
    assert_eq!(state.snapshot().data, Some(vec![1]));
    assert_eq!(state.snapshot().error_message, None);
}

#[test]
fn observing_current_key_again_is_noop() {
    init_logging();
    let (state, cycle) = observe(ObserverState::default(), "/a");
    let (state, effects) = update(state, Msg::Observe("/a".to_string()));
    assert!(effects.is_empty());
    assert_eq!(state.outstanding_cycle(), Some(cycle));

    let (state, _) = settle(state, cycle, CycleOutcome::Data(vec![5]));
    let (state, effects) = update(state, Msg::Observe("/a".to_string()));
    assert!(effects.is_empty());
    assert_eq!(state.snapshot().data, Some(vec![5]));
}

#[test]
fn new_key_after_error_starts_from_clean_snapshot() {
    init_logging();
    let (state, cycle) = observe(ObserverState::default(), "/a");
    let (state, _) = settle(state, cycle, CycleOutcome::HttpStatus(403));
    assert_eq!(state.phase(), FetchPhase::Failed);

    let (state, cycle) = observe(state, "/b");
    assert_eq!(state.snapshot(), &RequestSnapshot::initial());
    let (state, _) = settle(state, cycle, CycleOutcome::Data(vec![3]));

    assert_eq!(state.snapshot().error_message, None);
    assert_eq!(state.snapshot().data, Some(vec![3]));
}

#[test]
fn detach_cancels_and_resets() {
    init_logging();
    let (state, cycle) = observe(ObserverState::default(), "/a");
    let (state, effects) = update(state, Msg::Detach);

    assert_eq!(effects, vec![Effect::CancelFetch { cycle }, Effect::Publish]);
    assert!(state.is_detached());
    assert_eq!(state.snapshot(), &RequestSnapshot::initial());
    assert_eq!(state.key(), None);
}

#[test]
fn detach_after_settle_resets_without_cancel() {
    init_logging();
    let (state, cycle) = observe(ObserverState::default(), "/a");
    let (state, _) = settle(state, cycle, CycleOutcome::Data(vec![1]));
    let (state, effects) = update(state, Msg::Detach);

    assert_eq!(effects, vec![Effect::Publish]);
    assert_eq!(state.snapshot(), &RequestSnapshot::initial());
}

#[test]
fn nothing_is_dispatched_after_detach() {
    init_logging();
    let (state, cycle) = observe(ObserverState::default(), "/a");
    let (state, _) = update(state, Msg::Detach);
    let detached = state.clone();

    let (state, effects) = settle(state, cycle, CycleOutcome::Data(vec![1]));
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::Observe("/b".to_string()));
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::Detach);
    assert!(effects.is_empty());

    assert_eq!(state, detached);
}

#[test]
fn settled_snapshots_never_hold_data_and_error() {
    init_logging();
    let outcomes = vec![
        CycleOutcome::Data(vec![1]),
        CycleOutcome::HttpStatus(400),
        CycleOutcome::HttpStatus(418),
        CycleOutcome::Transport {
            reason: "reset".to_string(),
        },
        CycleOutcome::Data(vec![]),
    ];

    let mut state = ObserverState::default();
    for (index, outcome) in outcomes.into_iter().enumerate() {
        let (next, cycle) = observe(state, &format!("/k{index}"));
        let (next, _) = settle(next, cycle, outcome);
        let snapshot = next.snapshot();
        assert!(!snapshot.loading);
        assert!(snapshot.data.is_none() || snapshot.error_message.is_none());
        state = next;
    }
}
