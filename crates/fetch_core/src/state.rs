use crate::{
    classify_or, reduce, Action, CycleOutcome, FetchPhase, ObserverConfig, RequestSnapshot,
};

pub type CycleId = u64;
pub type RequestKey = String;

/// State owned by one observer: the published snapshot plus cycle bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserverState<T> {
    config: ObserverConfig,
    snapshot: RequestSnapshot<T>,
    key: Option<RequestKey>,
    next_cycle: CycleId,
    outstanding: Option<CycleId>,
    detached: bool,
}

impl<T> Default for ObserverState<T> {
    fn default() -> Self {
        Self::new(ObserverConfig::default())
    }
}

impl<T> ObserverState<T> {
    pub fn new(config: ObserverConfig) -> Self {
        Self {
            config,
            snapshot: RequestSnapshot::initial(),
            key: None,
            next_cycle: 1,
            outstanding: None,
            detached: false,
        }
    }

    pub fn snapshot(&self) -> &RequestSnapshot<T> {
        &self.snapshot
    }

    pub fn phase(&self) -> FetchPhase {
        self.snapshot.phase()
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Cycle whose settlement is still allowed to reach the reducer.
    pub fn outstanding_cycle(&self) -> Option<CycleId> {
        self.outstanding
    }

    pub fn is_outstanding(&self, cycle: CycleId) -> bool {
        self.outstanding == Some(cycle)
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Forget the outstanding cycle, returning it so its transport can be cancelled.
    pub(crate) fn take_outstanding(&mut self) -> Option<CycleId> {
        self.outstanding.take()
    }

    /// Switch to `key` with a fresh snapshot and a new authoritative cycle.
    pub(crate) fn adopt_key(&mut self, key: RequestKey) -> CycleId {
        let cycle = self.next_cycle;
        self.next_cycle += 1;
        self.key = Some(key);
        self.outstanding = Some(cycle);
        self.snapshot = RequestSnapshot::initial();
        cycle
    }

    /// Apply the terminal actions of the outstanding cycle.
    pub(crate) fn settle(&mut self, outcome: CycleOutcome<T>) {
        let terminal = match outcome {
            CycleOutcome::Data(value) => Action::SetData(value),
            CycleOutcome::HttpStatus(status) => Action::SetError(self.message_for(status)),
            CycleOutcome::Transport { .. } => {
                Action::SetError(self.message_for(self.config.transport_fallback_status))
            }
        };
        self.dispatch(terminal);
        self.dispatch(Action::SetLoading(false));
        self.outstanding = None;
    }

    pub(crate) fn detach(&mut self) {
        self.dispatch(Action::Reset(RequestSnapshot::initial()));
        self.key = None;
        self.detached = true;
    }

    fn dispatch(&mut self, action: Action<T>) {
        let current = std::mem::take(&mut self.snapshot);
        self.snapshot = reduce(current, action);
    }

    fn message_for(&self, status: u16) -> String {
        classify_or(status, &self.config.fallback_message).to_string()
    }
}
