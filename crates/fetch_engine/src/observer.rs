use std::collections::HashMap;
use std::sync::Arc;

use engine_logging::{engine_debug, engine_info, engine_warn};
use fetch_core::{
    update, CycleId, CycleOutcome, Effect, Msg, ObserverConfig, ObserverState, RequestKey,
    RequestSnapshot,
};
use serde::de::DeserializeOwned;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::decode::decode_json;
use crate::{FetchError, FetchOutput, Fetcher, SnapshotSink};

enum ObserverCommand {
    Observe(RequestKey),
    Detach,
}

type Settlement<T> = (CycleId, CycleOutcome<T>);

/// Consumer side of one observer.
///
/// The observer runs as a tokio task that owns the snapshot; this handle only
/// sends it keys and reads what it publishes. Dropping the handle detaches the
/// observer the same way [`ObserverHandle::detach`] does.
pub struct ObserverHandle<T> {
    cmd_tx: mpsc::UnboundedSender<ObserverCommand>,
    snapshot_rx: watch::Receiver<RequestSnapshot<T>>,
    task: JoinHandle<()>,
}

impl<T> ObserverHandle<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Spawn an observer on the current tokio runtime.
    pub fn spawn(fetcher: Arc<dyn Fetcher>, config: ObserverConfig) -> Self {
        Self::start(fetcher, config, None)
    }

    /// Like [`ObserverHandle::spawn`], additionally handing every published
    /// snapshot to `sink`.
    pub fn spawn_with_sink(
        fetcher: Arc<dyn Fetcher>,
        config: ObserverConfig,
        sink: Arc<dyn SnapshotSink<T>>,
    ) -> Self {
        Self::start(fetcher, config, Some(sink))
    }

    fn start(
        fetcher: Arc<dyn Fetcher>,
        config: ObserverConfig,
        sink: Option<Arc<dyn SnapshotSink<T>>>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(RequestSnapshot::initial());

        let task = ObserverTask {
            fetcher,
            state: ObserverState::new(config),
            cycles: HashMap::new(),
            settled_tx,
            snapshot_tx,
            sink,
        };
        let task = tokio::spawn(task.run(cmd_rx, settled_rx));

        Self {
            cmd_tx,
            snapshot_rx,
            task,
        }
    }

    /// Request data for `key`. A key different from the current one cancels the
    /// outstanding cycle and starts a new one.
    pub fn observe(&self, key: impl Into<RequestKey>) {
        let _ = self.cmd_tx.send(ObserverCommand::Observe(key.into()));
    }

    pub fn subscribe(&self) -> watch::Receiver<RequestSnapshot<T>> {
        self.snapshot_rx.clone()
    }

    /// Most recently published snapshot.
    pub fn snapshot(&self) -> RequestSnapshot<T> {
        self.snapshot_rx.borrow().clone()
    }

    /// Stop observing: cancels any outstanding cycle, resets the snapshot and
    /// waits for the observer task to finish. Returns the final snapshot.
    pub async fn detach(self) -> RequestSnapshot<T> {
        let Self {
            cmd_tx,
            snapshot_rx,
            task,
        } = self;
        let _ = cmd_tx.send(ObserverCommand::Detach);
        drop(cmd_tx);
        if let Err(err) = task.await {
            engine_warn!("Observer task ended abnormally: {}", err);
        }
        let last = snapshot_rx.borrow().clone();
        last
    }
}

struct ObserverTask<T> {
    fetcher: Arc<dyn Fetcher>,
    state: ObserverState<T>,
    cycles: HashMap<CycleId, CancellationToken>,
    settled_tx: mpsc::UnboundedSender<Settlement<T>>,
    snapshot_tx: watch::Sender<RequestSnapshot<T>>,
    sink: Option<Arc<dyn SnapshotSink<T>>>,
}

impl<T> ObserverTask<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    async fn run(
        mut self,
        mut cmd_rx: mpsc::UnboundedReceiver<ObserverCommand>,
        mut settled_rx: mpsc::UnboundedReceiver<Settlement<T>>,
    ) {
        loop {
            let msg = tokio::select! {
                // A queued key change must be applied before any settlement it supersedes.
                biased;
                command = cmd_rx.recv() => match command {
                    Some(ObserverCommand::Observe(key)) => Msg::Observe(key),
                    // A dropped handle counts as detachment.
                    Some(ObserverCommand::Detach) | None => Msg::Detach,
                },
                Some((cycle, outcome)) = settled_rx.recv() => {
                    Msg::CycleSettled { cycle, outcome }
                }
            };

            let detaching = matches!(msg, Msg::Detach);
            self.apply(msg);
            if detaching {
                break;
            }
        }
        engine_debug!("Observer detached");
    }

    fn apply(&mut self, msg: Msg<T>) {
        if let Msg::CycleSettled { cycle, .. } = &msg {
            self.cycles.remove(cycle);
            if !self.state.is_outstanding(*cycle) {
                engine_debug!("Discarding settlement of superseded cycle {}", cycle);
            }
        }

        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::StartFetch { cycle, key } => self.start_cycle(cycle, key),
            Effect::CancelFetch { cycle } => {
                if let Some(token) = self.cycles.remove(&cycle) {
                    engine_debug!("Cancelling cycle {}", cycle);
                    token.cancel();
                }
            }
            Effect::Publish => self.publish(),
        }
    }

    fn start_cycle(&mut self, cycle: CycleId, key: RequestKey) {
        engine_info!("Cycle {} started key={}", cycle, key);
        let token = CancellationToken::new();
        self.cycles.insert(cycle, token.clone());

        let fetcher = self.fetcher.clone();
        let settled_tx = self.settled_tx.clone();
        tokio::spawn(async move {
            let outcome = tokio::select! {
                // Dropping the fetch future closes the underlying request.
                _ = token.cancelled() => {
                    engine_debug!("Cycle {} transport abandoned", cycle);
                    return;
                }
                result = fetcher.fetch(&key) => into_outcome::<T>(cycle, result),
            };
            let _ = settled_tx.send((cycle, outcome));
        });
    }

    fn publish(&self) {
        let snapshot = self.state.snapshot().clone();
        if let Some(sink) = &self.sink {
            sink.publish(self.state.key(), &snapshot);
        }
        self.snapshot_tx.send_replace(snapshot);
    }
}

fn into_outcome<T: DeserializeOwned>(
    cycle: CycleId,
    result: Result<FetchOutput, FetchError>,
) -> CycleOutcome<T> {
    let decoded = result.and_then(|output| {
        let meta = &output.metadata;
        engine_info!(
            "Cycle {} fetched {} -> {} status={} redirects={} content_type={} bytes={}",
            cycle,
            meta.original_url,
            meta.final_url,
            meta.status,
            meta.redirect_count,
            meta.content_type.as_deref().unwrap_or("-"),
            meta.byte_len
        );
        decode_json(&output)
    });
    match decoded {
        Ok(value) => CycleOutcome::Data(value),
        Err(err) => {
            engine_warn!("Cycle {} failed: {}", cycle, err);
            match err.status_code() {
                Some(status) => CycleOutcome::HttpStatus(status),
                None => CycleOutcome::Transport {
                    reason: err.to_string(),
                },
            }
        }
    }
}
