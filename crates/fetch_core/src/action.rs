use crate::RequestSnapshot;

/// The only permitted ways to change a [`RequestSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action<T> {
    SetLoading(bool),
    SetError(String),
    SetData(T),
    /// Replace the whole snapshot, discarding every prior field.
    Reset(RequestSnapshot<T>),
    /// Unrecognized action; leaves the snapshot untouched.
    NoOp,
}
