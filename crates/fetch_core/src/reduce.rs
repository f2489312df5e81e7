use crate::{Action, RequestSnapshot};

/// Pure reducer: applies one action to a snapshot and returns the next snapshot.
///
/// `SetError` and `SetData` only touch their own field. Keeping the two
/// exclusive is the job of the cycle protocol, which starts every cycle from
/// [`RequestSnapshot::initial`].
pub fn reduce<T>(snapshot: RequestSnapshot<T>, action: Action<T>) -> RequestSnapshot<T> {
    match action {
        Action::SetLoading(loading) => RequestSnapshot {
            loading,
            ..snapshot
        },
        Action::SetError(message) => RequestSnapshot {
            error_message: Some(message),
            ..snapshot
        },
        Action::SetData(value) => RequestSnapshot {
            data: Some(value),
            ..snapshot
        },
        Action::Reset(initial) => initial,
        Action::NoOp => snapshot,
    }
}
