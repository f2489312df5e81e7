use crate::{CycleId, RequestKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg<T> {
    /// Consumer wants data for this key. A different key restarts the cycle.
    Observe(RequestKey),
    /// The network operation of a cycle finished, successfully or not.
    CycleSettled {
        cycle: CycleId,
        outcome: CycleOutcome<T>,
    },
    /// Consumer stopped observing for good.
    Detach,
    /// Fallback for placeholder wiring.
    NoOp,
}

/// How a cycle's network operation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome<T> {
    /// 2xx response whose body parsed into `T`.
    Data(T),
    /// Response arrived with a non-success status.
    HttpStatus(u16),
    /// No usable response: connection failure, timeout, unparsable body.
    Transport { reason: String },
}
