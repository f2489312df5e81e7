use crate::{CycleId, RequestKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue `GET key` and report back with `Msg::CycleSettled { cycle, .. }`.
    StartFetch { cycle: CycleId, key: RequestKey },
    /// Signal the transport of a superseded cycle to stop.
    CancelFetch { cycle: CycleId },
    /// The snapshot changed and should be handed to subscribers.
    Publish,
}
