use crate::RequestSnapshot;

/// Coarse rendering state derived from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Loading,
    Failed,
    Ready,
    /// Not loading, no data and no error. Only reachable by feeding the
    /// reducer actions outside the cycle protocol.
    Idle,
}

impl<T> RequestSnapshot<T> {
    pub fn phase(&self) -> FetchPhase {
        if self.loading {
            FetchPhase::Loading
        } else if self.error_message.is_some() {
            FetchPhase::Failed
        } else if self.data.is_some() {
            FetchPhase::Ready
        } else {
            FetchPhase::Idle
        }
    }
}
