use crate::{Effect, Msg, ObserverState};

/// Pure update function: applies a message to observer state and returns any effects.
///
/// Effects are ordered: a cancelled cycle is signalled before the new snapshot
/// is published, and the new snapshot is published before its fetch starts.
pub fn update<T>(mut state: ObserverState<T>, msg: Msg<T>) -> (ObserverState<T>, Vec<Effect>) {
    if state.is_detached() {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::Observe(key) => {
            if state.key() == Some(key.as_str()) {
                return (state, Vec::new());
            }
            let mut effects = Vec::with_capacity(3);
            if let Some(cycle) = state.take_outstanding() {
                effects.push(Effect::CancelFetch { cycle });
            }
            let cycle = state.adopt_key(key.clone());
            effects.push(Effect::Publish);
            effects.push(Effect::StartFetch { cycle, key });
            effects
        }
        Msg::CycleSettled { cycle, outcome } => {
            // Superseded or already settled: the result must not reach the reducer.
            if !state.is_outstanding(cycle) {
                return (state, Vec::new());
            }
            state.settle(outcome);
            vec![Effect::Publish]
        }
        Msg::Detach => {
            let mut effects = Vec::with_capacity(2);
            if let Some(cycle) = state.take_outstanding() {
                effects.push(Effect::CancelFetch { cycle });
            }
            state.detach();
            effects.push(Effect::Publish);
            effects
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
